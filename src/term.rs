use std::fmt::Write;

use crate::core::format::format_money;
use crate::core::{Chart, ChartSeriesSet, ChartSurface, HistogramBin};

const BAR_WIDTH: usize = 40;

/// Draws charts as plain text for the `run` subcommand.
#[derive(Default)]
pub struct TextSurface {
    charts: Vec<Option<String>>,
}

impl TextSurface {
    pub fn live_charts(&self) -> usize {
        self.charts.iter().flatten().count()
    }

    pub fn render_text(&self) -> String {
        self.charts
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChartSurface for TextSurface {
    type Handle = usize;

    fn create(&mut self, chart: Chart) -> usize {
        let text = match chart {
            Chart::Paths { title, data } => draw_paths(&title, &data),
            Chart::Histogram { title, bins } => draw_histogram(&title, &bins),
        };
        self.charts.push(Some(text));
        self.charts.len() - 1
    }

    fn destroy(&mut self, handle: usize) {
        if let Some(slot) = self.charts.get_mut(handle) {
            *slot = None;
        }
    }
}

fn draw_paths(title: &str, data: &ChartSeriesSet) -> String {
    let mut out = format!("{title}\n");
    let last_step = data.steps.last().copied().unwrap_or(0);
    for (i, series) in data.series.iter().enumerate() {
        let start = series.points.first().copied().unwrap_or(f64::NAN);
        let end = series.points.last().copied().unwrap_or(f64::NAN);
        let low = series.points.iter().copied().fold(f64::INFINITY, f64::min);
        let high = series.points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(
            out,
            "  path {:>2} [{}] step 0..{last_step}: {} -> {} (low {}, high {})",
            i + 1,
            series.color,
            format_money(start),
            format_money(end),
            format_money(low),
            format_money(high)
        );
    }
    out
}

fn draw_histogram(title: &str, bins: &[HistogramBin]) -> String {
    let mut out = format!("{title}\n");
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let label_width = bins.iter().map(|b| b.range_label.chars().count()).max().unwrap_or(0);
    for b in bins {
        let len = (b.count as usize * BAR_WIDTH).div_ceil(peak as usize);
        let _ = writeln!(
            out,
            "  {:>label_width$} | {:<bar_width$} {}",
            b.range_label,
            "#".repeat(len),
            b.count,
            bar_width = BAR_WIDTH
        );
    }
    out
}
