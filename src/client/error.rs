use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Simulation failed ({0})")]
    Status(u16),

    #[error("Simulation request failed: {0}")]
    Transport(String),

    #[error("Simulation response could not be read: {0}")]
    Decode(String),

    #[error("Simulation interrupted before a response arrived")]
    Interrupted,
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Decode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Feedback blocked: {0}")]
    Blocked(String),

    #[error("Feedback resource unavailable: {0}")]
    Unavailable(String),
}
