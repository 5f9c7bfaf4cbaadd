use super::format::round_half_up;
use super::{AllocationInput, AllocationWeights};

pub fn normalize(raw: AllocationInput) -> AllocationWeights {
    let total = raw.low + raw.medium + raw.high;
    if total <= 0.0 {
        return AllocationWeights {
            w_low: 1.0,
            w_med: 0.0,
            w_high: 0.0,
        };
    }

    AllocationWeights {
        w_low: raw.low / total,
        w_med: raw.medium / total,
        w_high: raw.high / total,
    }
}

/// Whole-percent labels shown next to each slider. Unlike `normalize`, an
/// all-zero allocation reads as 0% everywhere.
pub fn allocation_labels(raw: AllocationInput) -> [String; 3] {
    let total = raw.low + raw.medium + raw.high;
    let total = if total == 0.0 || total.is_nan() { 1.0 } else { total };
    [raw.low, raw.medium, raw.high]
        .map(|v| format!("{}%", round_half_up(v / total * 100.0) as i64))
}
