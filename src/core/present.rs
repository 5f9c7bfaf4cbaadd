use serde::Serialize;

use super::chart::{Chart, ChartSeriesSet, ChartSlot, ChartSurface, to_series};
use super::format::{format_money, format_pct};
use super::histogram::{HistogramBin, bin};
use super::shock::{ShockLabel, classify};
use super::{EchoedWeights, HISTOGRAM_BINS, SimulationResult};

pub const HISTOGRAM_TITLE: &str = "Distribution of Final Portfolio Values";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsText {
    pub expected: String,
    pub prob_loss: String,
    pub prob_ruin: String,
    pub var_5: String,
}

impl MetricsText {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            expected: format!("${}", format_money(result.expected)),
            prob_loss: format_pct(result.prob_loss),
            prob_ruin: format_pct(result.prob_ruin),
            var_5: format!("${}", format_money(result.var_5)),
        }
    }
}

/// Everything the presentation needs from one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub years: u32,
    pub expected: f64,
    pub metrics: MetricsText,
    pub shock_label: Option<ShockLabel>,
    pub paths: ChartSeriesSet,
    pub histogram: Vec<HistogramBin>,
    pub weights: Option<EchoedWeights>,
}

pub fn path_chart_title(years: u32) -> String {
    let plural = if years > 1 { "s" } else { "" };
    format!("Simulated Portfolio Paths ({years} Year{plural})")
}

pub fn build_report(result: SimulationResult, years: u32) -> RunReport {
    if let Some(first) = result.sample_paths.first() {
        let ragged = result
            .sample_paths
            .iter()
            .filter(|p| p.len() != first.len())
            .count();
        if ragged > 0 {
            log::warn!(
                "{ragged} of {} sample paths differ in length from the first ({} points)",
                result.sample_paths.len(),
                first.len()
            );
        }
    }

    RunReport {
        years,
        expected: result.expected,
        metrics: MetricsText::from_result(&result),
        shock_label: classify(result.shock_summary.as_ref()),
        paths: to_series(&result.sample_paths),
        histogram: bin(&result.final_wealth_samples, HISTOGRAM_BINS),
        weights: result.weights,
    }
}

impl RunReport {
    pub fn path_chart(&self) -> Option<Chart> {
        if self.paths.is_empty() {
            return None;
        }
        Some(Chart::Paths {
            title: path_chart_title(self.years),
            data: self.paths.clone(),
        })
    }

    pub fn histogram_chart(&self) -> Option<Chart> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(Chart::Histogram {
            title: HISTOGRAM_TITLE.to_string(),
            bins: self.histogram.clone(),
        })
    }
}

/// Owns a surface and the two chart slots drawn on it.
pub struct Presenter<S: ChartSurface> {
    surface: S,
    paths: ChartSlot<S::Handle>,
    histogram: ChartSlot<S::Handle>,
}

impl<S: ChartSurface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            paths: ChartSlot::default(),
            histogram: ChartSlot::default(),
        }
    }

    pub fn show(&mut self, report: &RunReport) {
        self.paths.redraw(&mut self.surface, report.path_chart());
        self.histogram.redraw(&mut self.surface, report.histogram_chart());
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
