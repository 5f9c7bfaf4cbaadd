pub mod allocation;
pub mod chart;
pub mod format;
pub mod histogram;
pub mod input;
pub mod present;
pub mod risk;
pub mod shock;
mod types;

pub use allocation::{allocation_labels, normalize};
pub use chart::{Chart, ChartSeries, ChartSeriesSet, ChartSlot, ChartSurface, render, to_series};
pub use histogram::{HistogramBin, bin};
pub use input::FieldInput;
pub use present::{MetricsText, Presenter, RunReport, build_report};
pub use risk::{RiskInputs, resolve};
pub use shock::{ShockLabel, classify};
pub use types::{
    AUTO_SHOCK_PROB, AllocationInput, AllocationWeights, DEFAULT_SIMS, EchoedWeights,
    HISTOGRAM_BINS, HORIZON_CHOICES, RiskParameters, RunState, STARTING_WEALTH, ShockConfig,
    ShockKind, ShockSummary, SimulationRequest, SimulationResult,
};
