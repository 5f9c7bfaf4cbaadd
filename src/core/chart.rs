use serde::Serialize;

use super::HistogramBin;

pub const PALETTE: [&str; 8] = [
    "#3B82F6", "#60A5FA", "#93C5FD", "#2563EB", "#0EA5E9", "#38BDF8", "#7DD3FC", "#0284C7",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub points: Vec<f64>,
    pub color_index: usize,
    pub color: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeriesSet {
    pub steps: Vec<usize>,
    pub series: Vec<ChartSeries>,
}

impl ChartSeriesSet {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }
}

/// Every path is expected to have the length of `paths[0]`; the simulation
/// service guarantees this and it is not re-checked here.
pub fn to_series(paths: &[Vec<f64>]) -> ChartSeriesSet {
    let Some(first) = paths.first() else {
        return ChartSeriesSet::default();
    };

    ChartSeriesSet {
        steps: (0..first.len()).collect(),
        series: paths
            .iter()
            .enumerate()
            .map(|(i, path)| ChartSeries {
                points: path.clone(),
                color_index: i % PALETTE.len(),
                color: palette_color(i),
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Chart {
    Paths {
        title: String,
        data: ChartSeriesSet,
    },
    Histogram {
        title: String,
        bins: Vec<HistogramBin>,
    },
}

/// A presentation surface that can draw charts and release them again.
pub trait ChartSurface {
    type Handle;

    fn create(&mut self, chart: Chart) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

/// Releases `prior` before anything new is created. `None` for `chart` leaves
/// the surface empty.
pub fn render<S: ChartSurface>(
    surface: &mut S,
    chart: Option<Chart>,
    prior: Option<S::Handle>,
) -> Option<S::Handle> {
    if let Some(handle) = prior {
        surface.destroy(handle);
    }
    chart.map(|chart| surface.create(chart))
}

/// Exclusive owner of one chart's handle across repeated runs.
pub struct ChartSlot<H> {
    handle: Option<H>,
}

impl<H> Default for ChartSlot<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H> ChartSlot<H> {
    pub fn redraw<S>(&mut self, surface: &mut S, chart: Option<Chart>)
    where
        S: ChartSurface<Handle = H>,
    {
        self.handle = render(surface, chart, self.handle.take());
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }
}
