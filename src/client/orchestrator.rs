use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::feedback::{FeedbackEvent, Notifier, emit_best_effort};
use super::{RunSettings, SimulationError, SimulationTransport};
use crate::core::{
    AllocationInput, FieldInput, RiskInputs, RunReport, RunState, SimulationRequest, build_report,
    normalize, resolve,
};

pub const TRIGGER_LABEL: &str = "Run simulation";
pub const BUSY_LABEL: &str = "Simulating...";
pub const RUNNING_STATUS: &str = "Running simulation...";
pub const DONE_STATUS: &str = "Done! Charts updated.";

/// Raw values read from the controls at trigger time.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Controls {
    #[serde(flatten)]
    pub allocation: AllocationInput,
    #[serde(flatten)]
    pub risk: RiskInputs,
    pub years: Option<FieldInput>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriggerAffordance {
    pub enabled: bool,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlSnapshot {
    pub state: RunState,
    pub status: String,
    pub trigger: TriggerAffordance,
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            status: String::new(),
            trigger: TriggerAffordance {
                enabled: true,
                label: TRIGGER_LABEL.to_string(),
            },
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Ignored,
    Completed(RunReport),
    Failed(SimulationError),
}

pub fn resolve_years(field: Option<&FieldInput>) -> u32 {
    field
        .and_then(FieldInput::as_int)
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

pub fn build_request(controls: &Controls, settings: &RunSettings) -> SimulationRequest {
    SimulationRequest {
        wealth: settings.wealth,
        weights: normalize(controls.allocation),
        risk: resolve(&controls.risk),
        years: resolve_years(controls.years.as_ref()),
        sims: settings.sims,
        shock: settings.shock,
        seed: settings.seed,
    }
}

pub struct Orchestrator<T, N> {
    transport: T,
    notifier: N,
    settings: RunSettings,
    snapshot: watch::Sender<ControlSnapshot>,
    ambient_started: AtomicBool,
}

impl<T: SimulationTransport, N: Notifier> Orchestrator<T, N> {
    pub fn new(transport: T, notifier: N, settings: RunSettings) -> Self {
        let (snapshot, _) = watch::channel(ControlSnapshot::default());
        Self {
            transport,
            notifier,
            settings,
            snapshot,
            ambient_started: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlSnapshot> {
        self.snapshot.subscribe()
    }

    /// Runs one simulation unless another is already in flight, in which
    /// case the trigger is dropped and `RunOutcome::Ignored` returned.
    pub async fn run(&self, controls: &Controls) -> RunOutcome {
        self.run_with(controls, |_| {}).await.0
    }

    /// Like `run`, but hands a successful report to `present` while this run
    /// still holds the single-flight slot. Also returns the snapshot this run
    /// settled on, which a later run cannot have overwritten.
    pub async fn run_with<F>(
        &self,
        controls: &Controls,
        present: F,
    ) -> (RunOutcome, ControlSnapshot)
    where
        F: FnOnce(&RunReport) + Send,
    {
        if !self.ambient_started.swap(true, Ordering::SeqCst) {
            emit_best_effort(&self.notifier, FeedbackEvent::AmbientStart);
        }

        let Some(guard) = self.begin() else {
            log::debug!("run trigger ignored: simulation already running");
            return (RunOutcome::Ignored, self.snapshot());
        };
        emit_best_effort(&self.notifier, FeedbackEvent::Busy);

        let request = build_request(controls, &self.settings);
        log::info!(
            "simulation started: years={} sims={} weights=({:.3}, {:.3}, {:.3})",
            request.years,
            request.sims,
            request.weights.w_low,
            request.weights.w_med,
            request.weights.w_high
        );

        match self.transport.simulate(&request).await {
            Ok(result) => {
                let reward = result.expected > request.wealth;
                let report = build_report(result, request.years);
                log::info!(
                    "simulation finished: expected={:.2} paths={} bins={}",
                    report.expected,
                    report.paths.len(),
                    report.histogram.len()
                );
                if reward {
                    emit_best_effort(&self.notifier, FeedbackEvent::Reward);
                }
                present(&report);
                let settled = guard.finish(RunState::Success, DONE_STATUS.to_string());
                (RunOutcome::Completed(report), settled)
            }
            Err(err) => {
                log::warn!("simulation failed: {err}");
                let settled = guard.finish(RunState::Error, format!("Error: {err}"));
                (RunOutcome::Failed(err), settled)
            }
        }
    }

    fn begin(&self) -> Option<RunGuard<'_>> {
        let mut prior_label = None;
        self.snapshot.send_if_modified(|snap| {
            if snap.state.is_running() {
                return false;
            }
            prior_label = Some(std::mem::replace(
                &mut snap.trigger.label,
                BUSY_LABEL.to_string(),
            ));
            snap.trigger.enabled = false;
            snap.state = RunState::Running;
            snap.status = RUNNING_STATUS.to_string();
            true
        });
        prior_label.map(|label| RunGuard {
            cell: &self.snapshot,
            prior_label: Some(label),
        })
    }
}

/// Leaves `Running` exactly once, restoring the trigger even when the run
/// future is dropped mid-flight.
struct RunGuard<'a> {
    cell: &'a watch::Sender<ControlSnapshot>,
    prior_label: Option<String>,
}

impl RunGuard<'_> {
    fn finish(mut self, state: RunState, status: String) -> ControlSnapshot {
        let fallback = ControlSnapshot {
            state,
            status: status.clone(),
            ..ControlSnapshot::default()
        };
        self.settle(state, status).unwrap_or(fallback)
    }

    fn settle(&mut self, state: RunState, status: String) -> Option<ControlSnapshot> {
        let label = self.prior_label.take()?;
        let settled = ControlSnapshot {
            state,
            status,
            trigger: TriggerAffordance {
                enabled: true,
                label,
            },
        };
        self.cell.send_replace(settled.clone());
        Some(settled)
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.prior_label.is_some() {
            log::warn!("simulation run dropped before completion");
            self.settle(
                RunState::Error,
                format!("Error: {}", SimulationError::Interrupted),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FeedbackError, NoopNotifier};
    use crate::core::SimulationResult;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    struct FakeTransport {
        calls: AtomicUsize,
        response: Result<SimulationResult, SimulationError>,
        gate: Option<Arc<Notify>>,
        seen: Mutex<Vec<SimulationRequest>>,
    }

    impl FakeTransport {
        fn replying(response: Result<SimulationResult, SimulationError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
                gate: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn gated(response: Result<SimulationResult, SimulationError>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::replying(response)
            }
        }
    }

    #[async_trait]
    impl SimulationTransport for FakeTransport {
        async fn simulate(
            &self,
            request: &SimulationRequest,
        ) -> Result<SimulationResult, SimulationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.response.clone()
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<FeedbackEvent>>,
    }

    impl Recorder {
        fn count(&self, event: FeedbackEvent) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| **e == event)
                .count()
        }
    }

    impl Notifier for Recorder {
        fn emit(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn emit(&self, _event: FeedbackEvent) -> Result<(), FeedbackError> {
            Err(FeedbackError::Unavailable("no audio device".to_string()))
        }
    }

    fn result(expected: f64) -> SimulationResult {
        SimulationResult {
            expected,
            prob_loss: 0.3,
            prob_ruin: 0.02,
            var_5: 8_000.0,
            sample_paths: vec![vec![100.0, 103.0, 99.0]],
            final_wealth_samples: vec![9_000.0, 10_000.0, 11_000.0, 12_000.0],
            shock_summary: None,
            weights: None,
        }
    }

    #[test]
    fn years_fall_back_to_one() {
        assert_eq!(resolve_years(None), 1);
        assert_eq!(resolve_years(Some(&"abc".into())), 1);
        assert_eq!(resolve_years(Some(&"0".into())), 1);
        assert_eq!(resolve_years(Some(&"-5".into())), 1);
        assert_eq!(resolve_years(Some(&"10".into())), 10);
        assert_eq!(resolve_years(Some(&FieldInput::Number(5.0))), 5);
    }

    #[test]
    fn request_combines_controls_and_settings() {
        let controls: Controls = serde_json::from_str(
            r#"{"low": 0, "medium": 30, "high": 10, "muHigh": "20", "sigmaLow": "0", "years": "5"}"#,
        )
        .expect("valid controls");
        let request = build_request(&controls, &RunSettings::default());

        assert_eq!(request.wealth, 10_000.0);
        assert_eq!(request.sims, 3_000);
        assert_eq!(request.years, 5);
        assert_eq!(request.weights.w_low, 0.0);
        assert!((request.weights.w_med - 0.75).abs() < 1e-12);
        assert!((request.risk.mu_high - 0.20).abs() < 1e-12);
        assert!((request.risk.sigma_low - 0.06).abs() < 1e-12);
        assert!(request.shock.auto_shock);
        assert_eq!(request.shock.shock, None);
    }

    #[tokio::test]
    async fn success_updates_state_and_rewards_once() {
        let notifier = Arc::new(Recorder::default());
        let orch = Orchestrator::new(
            FakeTransport::replying(Ok(result(10_500.0))),
            notifier.clone(),
            RunSettings::default(),
        );

        let report = match orch.run(&Controls::default()).await {
            RunOutcome::Completed(report) => report,
            other => panic!("expected completed run, got {other:?}"),
        };
        assert_eq!(report.paths.len(), 1);

        let snap = orch.snapshot();
        assert_eq!(snap.state, RunState::Success);
        assert_eq!(snap.status, DONE_STATUS);
        assert!(snap.trigger.enabled);
        assert_eq!(snap.trigger.label, TRIGGER_LABEL);

        assert_eq!(notifier.count(FeedbackEvent::Reward), 1);
        assert_eq!(notifier.count(FeedbackEvent::Busy), 1);
        assert_eq!(notifier.count(FeedbackEvent::AmbientStart), 1);
    }

    #[tokio::test]
    async fn no_reward_when_expected_does_not_beat_wealth() {
        let notifier = Arc::new(Recorder::default());
        let orch = Orchestrator::new(
            FakeTransport::replying(Ok(result(10_000.0))),
            notifier.clone(),
            RunSettings::default(),
        );
        orch.run(&Controls::default()).await;
        orch.run(&Controls::default()).await;

        assert_eq!(notifier.count(FeedbackEvent::Reward), 0);
        assert_eq!(notifier.count(FeedbackEvent::Busy), 2);
        assert_eq!(notifier.count(FeedbackEvent::AmbientStart), 1);
    }

    #[tokio::test]
    async fn status_failure_surfaces_code() {
        let orch = Orchestrator::new(
            FakeTransport::replying(Err(SimulationError::Status(500))),
            NoopNotifier,
            RunSettings::default(),
        );

        let outcome = orch.run(&Controls::default()).await;
        assert!(matches!(outcome, RunOutcome::Failed(SimulationError::Status(500))));

        let snap = orch.snapshot();
        assert_eq!(snap.state, RunState::Error);
        assert_eq!(snap.status, "Error: Simulation failed (500)");
        assert!(snap.trigger.enabled);
        assert_eq!(snap.trigger.label, TRIGGER_LABEL);
    }

    #[tokio::test]
    async fn failing_notifier_does_not_affect_run() {
        let orch = Orchestrator::new(
            FakeTransport::replying(Ok(result(12_000.0))),
            Failing,
            RunSettings::default(),
        );
        let outcome = orch.run(&Controls::default()).await;
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(orch.snapshot().state, RunState::Success);
    }

    #[tokio::test]
    async fn second_trigger_while_running_is_dropped() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(FakeTransport::gated(Ok(result(10_500.0)), gate.clone()));
        let orch = Arc::new(Orchestrator::new(
            transport.clone(),
            NoopNotifier,
            RunSettings::default(),
        ));
        let mut rx = orch.subscribe();

        let first = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run(&Controls::default()).await }
        });
        rx.wait_for(|s| s.state == RunState::Running)
            .await
            .expect("orchestrator alive");

        let busy = orch.snapshot();
        assert!(!busy.trigger.enabled);
        assert_eq!(busy.trigger.label, BUSY_LABEL);
        assert_eq!(busy.status, RUNNING_STATUS);

        let second = orch.run(&Controls::default()).await;
        assert!(matches!(second, RunOutcome::Ignored));

        gate.notify_one();
        let first = first.await.expect("run task");
        assert!(matches!(first, RunOutcome::Completed(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orch.snapshot().state, RunState::Success);
    }

    #[tokio::test]
    async fn dropped_run_restores_trigger() {
        let gate = Arc::new(Notify::new());
        let orch = Arc::new(Orchestrator::new(
            FakeTransport::gated(Ok(result(10_500.0)), gate),
            NoopNotifier,
            RunSettings::default(),
        ));
        let mut rx = orch.subscribe();

        let handle = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run(&Controls::default()).await }
        });
        rx.wait_for(|s| s.state == RunState::Running)
            .await
            .expect("orchestrator alive");
        handle.abort();
        assert!(handle.await.is_err());

        let snap = orch.snapshot();
        assert_eq!(snap.state, RunState::Error);
        assert!(snap.trigger.enabled);
        assert_eq!(snap.trigger.label, TRIGGER_LABEL);
    }

    #[tokio::test]
    async fn present_sees_report_before_the_slot_is_released() {
        let orch = Orchestrator::new(
            FakeTransport::replying(Ok(result(10_500.0))),
            NoopNotifier,
            RunSettings::default(),
        );

        let mut state_while_presenting = None;
        let (outcome, settled) = orch
            .run_with(&Controls::default(), |report| {
                assert_eq!(report.histogram.len(), crate::core::HISTOGRAM_BINS);
                state_while_presenting = Some(orch.snapshot().state);
            })
            .await;

        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(state_while_presenting, Some(RunState::Running));
        assert_eq!(settled, orch.snapshot());
        assert_eq!(settled.state, RunState::Success);
        assert_eq!(settled.trigger.label, TRIGGER_LABEL);
    }

    #[tokio::test]
    async fn present_is_skipped_on_failure() {
        let orch = Orchestrator::new(
            FakeTransport::replying(Err(SimulationError::Status(503))),
            NoopNotifier,
            RunSettings::default(),
        );

        let mut presented = false;
        let (outcome, settled) = orch
            .run_with(&Controls::default(), |_| presented = true)
            .await;

        assert!(matches!(outcome, RunOutcome::Failed(SimulationError::Status(503))));
        assert!(!presented);
        assert_eq!(settled.status, "Error: Simulation failed (503)");
    }

    #[tokio::test]
    async fn new_trigger_after_error_runs_again() {
        let transport = Arc::new(FakeTransport::replying(Err(SimulationError::Transport(
            "connection refused".to_string(),
        ))));
        let orch = Orchestrator::new(transport.clone(), NoopNotifier, RunSettings::default());

        orch.run(&Controls::default()).await;
        orch.run(&Controls::default()).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(transport.seen.lock().unwrap()[1].years, 1);
        assert!(orch.snapshot().status.starts_with("Error: Simulation request failed"));
    }
}
