use serde::{Deserialize, Serialize};

pub const STARTING_WEALTH: f64 = 10_000.0;
pub const DEFAULT_SIMS: u32 = 3_000;
pub const AUTO_SHOCK_PROB: f64 = 0.05;
pub const HISTOGRAM_BINS: usize = 30;
pub const HORIZON_CHOICES: [u32; 3] = [1, 5, 10];

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AllocationInput {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationWeights {
    pub w_low: f64,
    pub w_med: f64,
    pub w_high: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub mu_low: f64,
    pub mu_med: f64,
    pub mu_high: f64,
    pub sigma_low: f64,
    pub sigma_med: f64,
    pub sigma_high: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShockKind {
    Crash,
    Boom,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ShockConfig {
    pub auto_shock: bool,
    pub shock_prob: f64,
    pub shock: Option<ShockKind>,
}

impl ShockConfig {
    pub fn automatic() -> Self {
        Self {
            auto_shock: true,
            shock_prob: AUTO_SHOCK_PROB,
            shock: None,
        }
    }

    /// Forces `kind` on every path; random shocks are switched off.
    pub fn manual(kind: ShockKind) -> Self {
        Self {
            auto_shock: false,
            shock_prob: AUTO_SHOCK_PROB,
            shock: Some(kind),
        }
    }
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self::automatic()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub wealth: f64,
    #[serde(flatten)]
    pub weights: AllocationWeights,
    #[serde(flatten)]
    pub risk: RiskParameters,
    pub years: u32,
    pub sims: u32,
    #[serde(flatten)]
    pub shock: ShockConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockSummary {
    pub auto_shock: bool,
    pub applied_to_all: bool,
    pub total_shocked: u64,
    pub count_crash: u64,
    pub count_boom: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoedWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimulationResult {
    pub expected: f64,
    pub prob_loss: f64,
    pub prob_ruin: f64,
    #[serde(rename = "VaR_5")]
    pub var_5: f64,
    #[serde(default)]
    pub sample_paths: Vec<Vec<f64>>,
    #[serde(default)]
    pub final_wealth_samples: Vec<f64>,
    #[serde(default)]
    pub shock_summary: Option<ShockSummary>,
    #[serde(default)]
    pub weights: Option<EchoedWeights>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}
