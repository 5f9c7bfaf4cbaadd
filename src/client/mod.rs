mod config;
mod error;
pub mod feedback;
pub mod orchestrator;
mod transport;

pub use config::{ClientConfig, DEFAULT_ENDPOINT, RunSettings};
pub use error::{FeedbackError, SimulationError};
pub use feedback::{
    FeedbackEvent, FeedbackSwitch, LogNotifier, NoopNotifier, Notifier, TerminalBell,
    emit_best_effort,
};
pub use orchestrator::{
    ControlSnapshot, Controls, Orchestrator, RunOutcome, TriggerAffordance, build_request,
    resolve_years,
};
pub use transport::{HttpTransport, SimulationTransport};
