use serde::Deserialize;

use super::{FieldInput, RiskParameters};

pub const DEFAULT_RISK_PERCENT: RiskParameters = RiskParameters {
    mu_low: 4.0,
    mu_med: 8.0,
    mu_high: 14.0,
    sigma_low: 6.0,
    sigma_med: 15.0,
    sigma_high: 30.0,
};

/// Drift and volatility inputs as entered, in percent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskInputs {
    pub mu_low: Option<FieldInput>,
    pub mu_med: Option<FieldInput>,
    pub mu_high: Option<FieldInput>,
    pub sigma_low: Option<FieldInput>,
    pub sigma_med: Option<FieldInput>,
    pub sigma_high: Option<FieldInput>,
}

pub fn resolve(inputs: &RiskInputs) -> RiskParameters {
    let d = DEFAULT_RISK_PERCENT;
    RiskParameters {
        mu_low: percent_or_default(inputs.mu_low.as_ref(), d.mu_low) / 100.0,
        mu_med: percent_or_default(inputs.mu_med.as_ref(), d.mu_med) / 100.0,
        mu_high: percent_or_default(inputs.mu_high.as_ref(), d.mu_high) / 100.0,
        sigma_low: percent_or_default(inputs.sigma_low.as_ref(), d.sigma_low) / 100.0,
        sigma_med: percent_or_default(inputs.sigma_med.as_ref(), d.sigma_med) / 100.0,
        sigma_high: percent_or_default(inputs.sigma_high.as_ref(), d.sigma_high) / 100.0,
    }
}

// Zero counts as "not entered", so an explicit 0% falls back to the default.
fn percent_or_default(field: Option<&FieldInput>, default: f64) -> f64 {
    field
        .and_then(FieldInput::as_float)
        .filter(|v| *v != 0.0 && !v.is_nan())
        .unwrap_or(default)
}
