use serde::{Deserialize, Serialize};

use crate::config::ThresholdTable;
use crate::data::model::MetricName;
use crate::error::{AnalyticsError, Result};

/// Derived classification of a raw value; recomputed on demand, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Good,
    Warning,
    Bad,
}

impl SeverityTier {
    pub fn label(self) -> &'static str {
        match self {
            SeverityTier::Good => "good",
            SeverityTier::Warning => "warning",
            SeverityTier::Bad => "bad",
        }
    }
}

/// Cutoffs and direction for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricThresholds {
    pub good: f64,
    pub warning: f64,
    #[serde(default)]
    pub lower_is_better: bool,
}

impl MetricThresholds {
    pub fn higher_is_better(good: f64, warning: f64) -> Self {
        Self { good, warning, lower_is_better: false }
    }

    pub fn lower_is_better(good: f64, warning: f64) -> Self {
        Self { good, warning, lower_is_better: true }
    }

    /// Cutoffs must be finite and ordered along the direction
    pub fn validate(&self, metric: &str) -> Result<()> {
        let context = format!("thresholds for `{}`", metric);
        if !self.good.is_finite() || !self.warning.is_finite() {
            return Err(AnalyticsError::validation(context, "cutoffs must be finite"));
        }
        let ordered = if self.lower_is_better {
            self.good <= self.warning
        } else {
            self.good >= self.warning
        };
        if !ordered {
            return Err(AnalyticsError::validation(
                context,
                format!(
                    "good cutoff {} must be {} warning cutoff {}",
                    self.good,
                    if self.lower_is_better { "at most" } else { "at least" },
                    self.warning
                ),
            ));
        }
        Ok(())
    }

    /// Whether `a` beats `b` under this direction
    pub fn better(&self, a: f64, b: f64) -> bool {
        if self.lower_is_better {
            a < b
        } else {
            a > b
        }
    }
}

/// Boundaries are inclusive toward the better tier.
pub fn classify(value: f64, thresholds: &MetricThresholds) -> SeverityTier {
    if thresholds.lower_is_better {
        if value <= thresholds.good {
            SeverityTier::Good
        } else if value <= thresholds.warning {
            SeverityTier::Warning
        } else {
            SeverityTier::Bad
        }
    } else if value >= thresholds.good {
        SeverityTier::Good
    } else if value >= thresholds.warning {
        SeverityTier::Warning
    } else {
        SeverityTier::Bad
    }
}

/// Classify with the thresholds configured for `metric`
pub fn classify_metric(table: &ThresholdTable, metric: MetricName, value: f64) -> Result<SeverityTier> {
    Ok(classify(value, table.get(metric)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn higher_is_better_boundaries() {
        let t = MetricThresholds::higher_is_better(90.0, 50.0);
        assert_eq!(classify(100.0, &t), SeverityTier::Good);
        assert_eq!(classify(90.0, &t), SeverityTier::Good);
        assert_eq!(classify(89.0, &t), SeverityTier::Warning);
        assert_eq!(classify(50.0, &t), SeverityTier::Warning);
        assert_eq!(classify(49.0, &t), SeverityTier::Bad);
    }

    #[test]
    fn lower_is_better_boundaries() {
        let t = MetricThresholds::lower_is_better(20.0, 500.0);
        assert_eq!(classify(20.0, &t), SeverityTier::Good);
        assert_eq!(classify(21.0, &t), SeverityTier::Warning);
        assert_eq!(classify(500.0, &t), SeverityTier::Warning);
        assert_eq!(classify(501.0, &t), SeverityTier::Bad);
    }

    #[test]
    fn rejects_inverted_cutoffs() {
        assert!(MetricThresholds::lower_is_better(500.0, 20.0).validate("p50Latency").is_err());
        assert!(MetricThresholds::higher_is_better(50.0, 90.0).validate("successRate").is_err());
        assert!(MetricThresholds::higher_is_better(f64::NAN, 90.0).validate("successRate").is_err());
        assert!(MetricThresholds::higher_is_better(90.0, 90.0).validate("successRate").is_ok());
    }

    #[test]
    fn thresholds_deserialize_from_camel_case() {
        let t: MetricThresholds =
            serde_json::from_str(r#"{ "good": 20, "warning": 500, "lowerIsBetter": true }"#).unwrap();
        assert_eq!(t, MetricThresholds::lower_is_better(20.0, 500.0));
    }

    fn rank(tier: SeverityTier) -> u8 {
        match tier {
            SeverityTier::Good => 0,
            SeverityTier::Warning => 1,
            SeverityTier::Bad => 2,
        }
    }

    proptest! {
        #[test]
        fn better_values_never_get_worse_tiers(
            a in 0.0f64..5000.0,
            b in 0.0f64..5000.0,
            good in 0.0f64..2500.0,
            gap in 0.0f64..2500.0,
            lower in any::<bool>(),
        ) {
            let t = if lower {
                MetricThresholds::lower_is_better(good, good + gap)
            } else {
                MetricThresholds::higher_is_better(good + gap, good)
            };
            if t.better(a, b) {
                prop_assert!(rank(classify(a, &t)) <= rank(classify(b, &t)));
            }
        }
    }
}
