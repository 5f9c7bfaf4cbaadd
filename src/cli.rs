use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{ClientConfig, Controls, RunSettings};
use crate::core::{AllocationInput, FieldInput, RiskInputs, ShockConfig, ShockKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliShock {
    Crash,
    Boom,
}

impl From<CliShock> for ShockKind {
    fn from(value: CliShock) -> Self {
        match value {
            CliShock::Crash => ShockKind::Crash,
            CliShock::Boom => ShockKind::Boom,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "riskdeck",
    about = "Front end for a Monte Carlo portfolio risk simulator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON presentation API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, help = "Simulation service URL, overrides RISKDECK_ENDPOINT")]
        endpoint: Option<String>,
        #[arg(long, help = "Start with feedback cues muted")]
        mute: bool,
    },
    /// Run one simulation and print the results.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long, default_value_t = 0.0, help = "Low risk slider value")]
    pub low: f64,
    #[arg(long, default_value_t = 0.0, help = "Medium risk slider value")]
    pub medium: f64,
    #[arg(long, default_value_t = 0.0, help = "High risk slider value")]
    pub high: f64,
    #[arg(long, help = "Horizon in years, e.g. 1, 5 or 10")]
    pub years: Option<String>,
    #[arg(long, help = "Expected annual return of the low bucket in percent")]
    pub mu_low: Option<String>,
    #[arg(long)]
    pub mu_med: Option<String>,
    #[arg(long)]
    pub mu_high: Option<String>,
    #[arg(long, help = "Annual volatility of the low bucket in percent")]
    pub sigma_low: Option<String>,
    #[arg(long)]
    pub sigma_med: Option<String>,
    #[arg(long)]
    pub sigma_high: Option<String>,
    #[arg(
        long,
        value_enum,
        help = "Force a shock on every path instead of random shocks"
    )]
    pub shock: Option<CliShock>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, help = "Simulation service URL, overrides RISKDECK_ENDPOINT")]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub mute: bool,
}

impl RunArgs {
    pub fn controls(&self) -> Controls {
        let field = |raw: &Option<String>| raw.as_deref().map(FieldInput::from);
        Controls {
            allocation: AllocationInput {
                low: self.low,
                medium: self.medium,
                high: self.high,
            },
            risk: RiskInputs {
                mu_low: field(&self.mu_low),
                mu_med: field(&self.mu_med),
                mu_high: field(&self.mu_high),
                sigma_low: field(&self.sigma_low),
                sigma_med: field(&self.sigma_med),
                sigma_high: field(&self.sigma_high),
            },
            years: field(&self.years),
        }
    }

    pub fn settings(&self) -> RunSettings {
        RunSettings {
            shock: self
                .shock
                .map(|kind| ShockConfig::manual(kind.into()))
                .unwrap_or_else(ShockConfig::automatic),
            seed: self.seed,
            ..RunSettings::default()
        }
    }
}

/// Applies command-line overrides on top of the environment config.
pub fn apply_overrides(mut config: ClientConfig, endpoint: Option<&str>, mute: bool) -> ClientConfig {
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint.to_string();
    }
    if mute {
        config.feedback_enabled = false;
    }
    config
}
