use serde::Serialize;

use super::ShockSummary;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShockLabel {
    Crash,
    Boom,
    Mixed,
}

impl ShockLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ShockLabel::Crash => "crash",
            ShockLabel::Boom => "boom",
            ShockLabel::Mixed => "mixed",
        }
    }
}

pub fn classify(summary: Option<&ShockSummary>) -> Option<ShockLabel> {
    let summary = summary?;
    let crash = summary.count_crash;
    let boom = summary.count_boom;

    if summary.applied_to_all {
        return Some(if crash == summary.total_shocked {
            ShockLabel::Crash
        } else if boom == summary.total_shocked {
            ShockLabel::Boom
        } else {
            ShockLabel::Mixed
        });
    }

    if summary.auto_shock && summary.total_shocked > 0 {
        return Some(if crash > 0 && boom == 0 {
            ShockLabel::Crash
        } else if boom > 0 && crash == 0 {
            ShockLabel::Boom
        } else {
            ShockLabel::Mixed
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ShockSummary {
        ShockSummary::default()
    }

    #[test]
    fn missing_summary_has_no_label() {
        assert_eq!(classify(None), None);
    }

    #[test]
    fn applied_to_all_compares_against_total() {
        let crash = ShockSummary {
            applied_to_all: true,
            count_crash: 10,
            total_shocked: 10,
            ..summary()
        };
        let boom = ShockSummary {
            applied_to_all: true,
            count_boom: 3_000,
            total_shocked: 3_000,
            ..summary()
        };
        let mixed = ShockSummary {
            applied_to_all: true,
            count_crash: 4,
            count_boom: 6,
            total_shocked: 10,
            ..summary()
        };
        assert_eq!(classify(Some(&crash)), Some(ShockLabel::Crash));
        assert_eq!(classify(Some(&boom)), Some(ShockLabel::Boom));
        assert_eq!(classify(Some(&mixed)), Some(ShockLabel::Mixed));
    }

    #[test]
    fn auto_shock_without_events_has_no_label() {
        let quiet = ShockSummary {
            auto_shock: true,
            total_shocked: 0,
            ..summary()
        };
        assert_eq!(classify(Some(&quiet)), None);
    }

    #[test]
    fn auto_shock_reports_one_sided_or_mixed_events() {
        let base = ShockSummary {
            auto_shock: true,
            ..summary()
        };
        let crash = ShockSummary {
            count_crash: 7,
            total_shocked: 7,
            ..base
        };
        let boom = ShockSummary {
            count_boom: 2,
            total_shocked: 2,
            ..base
        };
        let mixed = ShockSummary {
            count_crash: 80,
            count_boom: 71,
            total_shocked: 151,
            ..base
        };
        assert_eq!(classify(Some(&crash)), Some(ShockLabel::Crash));
        assert_eq!(classify(Some(&boom)), Some(ShockLabel::Boom));
        assert_eq!(classify(Some(&mixed)), Some(ShockLabel::Mixed));
    }

    #[test]
    fn shocks_disabled_have_no_label() {
        let off = ShockSummary {
            total_shocked: 5,
            count_crash: 5,
            ..summary()
        };
        assert_eq!(classify(Some(&off)), None);
    }

    #[test]
    fn summary_fields_default_when_missing() {
        let parsed: ShockSummary =
            serde_json::from_str(r#"{"applied_to_all": true, "count_crash": 10, "total_shocked": 10}"#)
                .expect("valid json");
        assert_eq!(classify(Some(&parsed)), Some(ShockLabel::Crash));
    }
}
