use crate::core::{DEFAULT_SIMS, STARTING_WEALTH, ShockConfig};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/simulate";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub feedback_enabled: bool,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("RISKDECK_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            feedback_enabled: !matches!(
                std::env::var("RISKDECK_FEEDBACK").as_deref(),
                Ok("off") | Ok("0") | Ok("false")
            ),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            feedback_enabled: true,
        }
    }
}

/// Fixed parts of every request; only the controls vary between runs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunSettings {
    pub wealth: f64,
    pub sims: u32,
    pub shock: ShockConfig,
    pub seed: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            wealth: STARTING_WEALTH,
            sims: DEFAULT_SIMS,
            shock: ShockConfig::automatic(),
            seed: None,
        }
    }
}
