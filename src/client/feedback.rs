use std::io::{self, IsTerminal, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::FeedbackError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackEvent {
    Busy,
    Reward,
    AmbientStart,
}

impl FeedbackEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackEvent::Busy => "busy",
            FeedbackEvent::Reward => "reward",
            FeedbackEvent::AmbientStart => "ambient-start",
        }
    }
}

/// Fire-and-forget cue sink (sound, haptics, ...).
pub trait Notifier: Send + Sync {
    fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
        (**self).emit(event)
    }
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn emit(&self, _event: FeedbackEvent) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Writes each cue to the log; used where no audio device exists.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
        log::info!("feedback cue: {}", event.as_str());
        Ok(())
    }
}

/// Rings the terminal bell: once when a run starts, twice on a reward.
pub struct TerminalBell<W> {
    out: Mutex<W>,
    interactive: bool,
}

impl TerminalBell<io::Stderr> {
    pub fn stderr() -> Self {
        let out = io::stderr();
        let interactive = out.is_terminal();
        Self::new(out, interactive)
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out: Mutex::new(out),
            interactive,
        }
    }
}

impl<W: Write + Send> Notifier for TerminalBell<W> {
    fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
        let rings = match event {
            FeedbackEvent::Busy => 1,
            FeedbackEvent::Reward => 2,
            FeedbackEvent::AmbientStart => return Ok(()),
        };
        if !self.interactive {
            return Err(FeedbackError::Blocked("output is not a terminal".to_string()));
        }
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all("\x07".repeat(rings).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| FeedbackError::Unavailable(e.to_string()))
    }
}

/// Process-wide on/off switch in front of a notifier.
pub struct FeedbackSwitch<N> {
    inner: N,
    enabled: AtomicBool,
}

impl<N: Notifier> FeedbackSwitch<N> {
    pub fn new(inner: N, enabled: bool) -> Self {
        Self {
            inner,
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }
}

impl<N: Notifier> Notifier for FeedbackSwitch<N> {
    fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.emit(event)
    }
}

/// Emits `event`, swallowing errors and panics from the notifier.
pub fn emit_best_effort<N: Notifier + ?Sized>(notifier: &N, event: FeedbackEvent) {
    match catch_unwind(AssertUnwindSafe(|| notifier.emit(event))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("feedback {} dropped: {err}", event.as_str()),
        Err(_) => log::warn!("feedback {} dropped: notifier panicked", event.as_str()),
    }
}
