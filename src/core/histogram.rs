use serde::Serialize;

use super::format::format_whole;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub range_label: String,
    pub count: u64,
}

pub fn bin(samples: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let step = range / bin_count as f64;

    let mut counts = vec![0u64; bin_count];
    for &v in samples {
        // The maximum lands exactly on `bin_count`; fold it into the last bin.
        let idx = ((v - min) / step).floor() as usize;
        counts[idx.min(bin_count - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = format_whole(min + i as f64 * step);
            let upper = format_whole(min + (i + 1) as f64 * step);
            HistogramBin {
                range_label: format!("{lower} – {upper}"),
                count,
            }
        })
        .collect()
}
