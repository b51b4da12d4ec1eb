//! Dashboard configuration: thresholds, color tokens and headline choices.
//!
//! Built once and passed explicitly into classification, projection and
//! formatting. Swapping a value changes the presentation, never the math.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::model::{ConcurrencyLevel, MetricName, StrategyId};
use crate::error::{AnalyticsError, Result};
use crate::metrics::severity::{MetricThresholds, SeverityTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable(BTreeMap<MetricName, MetricThresholds>);

impl ThresholdTable {
    pub fn new(entries: impl IntoIterator<Item = (MetricName, MetricThresholds)>) -> Result<Self> {
        let table = Self(entries.into_iter().collect());
        table.validate()?;
        Ok(table)
    }

    pub fn get(&self, metric: MetricName) -> Result<&MetricThresholds> {
        self.0
            .get(&metric)
            .ok_or_else(|| AnalyticsError::ThresholdsMissing(metric.key().to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(|(metric, t)| t.validate(metric.key()))
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (MetricName::Throughput, MetricThresholds::higher_is_better(2000.0, 500.0)),
            (MetricName::P50Latency, MetricThresholds::lower_is_better(50.0, 500.0)),
            (MetricName::P99Latency, MetricThresholds::lower_is_better(100.0, 1000.0)),
            (MetricName::SuccessRate, MetricThresholds::higher_is_better(99.0, 90.0)),
            (MetricName::MemoryUsage, MetricThresholds::lower_is_better(256.0, 512.0)),
            (MetricName::ThreadCount, MetricThresholds::lower_is_better(200.0, 500.0)),
        ]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPalette {
    pub single: String,
    pub thread_per_request: String,
    pub thread_pool: String,
}

impl StrategyPalette {
    pub fn token(&self, strategy: StrategyId) -> &str {
        match strategy {
            StrategyId::Single => &self.single,
            StrategyId::ThreadPerRequest => &self.thread_per_request,
            StrategyId::ThreadPool => &self.thread_pool,
        }
    }
}

impl Default for StrategyPalette {
    fn default() -> Self {
        Self {
            single: "#3b9ab2".into(),
            thread_per_request: "#e1af00".into(),
            thread_pool: "#f21a00".into(),
        }
    }
}

/// Tier -> color token. Kept apart from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityPalette {
    pub good: String,
    pub warning: String,
    pub bad: String,
    pub neutral: String,
}

impl SeverityPalette {
    pub fn token(&self, tier: SeverityTier) -> &str {
        match tier {
            SeverityTier::Good => &self.good,
            SeverityTier::Warning => &self.warning,
            SeverityTier::Bad => &self.bad,
        }
    }
}

impl Default for SeverityPalette {
    fn default() -> Self {
        Self {
            good: "#10b981".into(),
            warning: "#f59e0b".into(),
            bad: "#ef4444".into(),
            neutral: "#6b7280".into(),
        }
    }
}

/// Which strategies and levels feed the headline summary cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineConfig {
    pub featured: StrategyId,
    pub gain_baseline: StrategyId,
    pub reliability_baseline: StrategyId,
    pub degradation_strategy: StrategyId,
    pub degradation_from: ConcurrencyLevel,
    pub degradation_to: ConcurrencyLevel,
    pub high_load_level: ConcurrencyLevel,
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            featured: StrategyId::ThreadPool,
            gain_baseline: StrategyId::ThreadPerRequest,
            reliability_baseline: StrategyId::Single,
            degradation_strategy: StrategyId::ThreadPerRequest,
            degradation_from: 100,
            degradation_to: 1000,
            high_load_level: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub thresholds: ThresholdTable,
    pub strategy_colors: StrategyPalette,
    pub severity_colors: SeverityPalette,
    /// Distribution bucket key (`c10`, ...) -> color token
    pub concurrency_colors: BTreeMap<String, String>,
    pub headlines: HeadlineConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let concurrency_colors = [
            ("c1", "#9986a5"),
            ("c10", "#79402e"),
            ("c50", "#ccba72"),
            ("c100", "#0f0d0e"),
            ("c200", "#d9d0d3"),
            ("c1000", "#8d8680"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            thresholds: ThresholdTable::default(),
            strategy_colors: StrategyPalette::default(),
            severity_colors: SeverityPalette::default(),
            concurrency_colors,
            headlines: HeadlineConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON configuration; omitted sections keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(json)
            .map_err(|e| AnalyticsError::validation("dashboard config", e.to_string()))?;
        config.validate()?;
        debug!(headlines = ?config.headlines, "dashboard config loaded");
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        let h = &self.headlines;
        if h.degradation_from >= h.degradation_to {
            return Err(AnalyticsError::validation(
                "dashboard config",
                format!(
                    "degradation window c{} -> c{} must move to a higher level",
                    h.degradation_from, h.degradation_to
                ),
            ));
        }
        if h.featured == h.gain_baseline || h.featured == h.reliability_baseline {
            return Err(AnalyticsError::validation(
                "dashboard config",
                "featured strategy cannot be its own baseline",
            ));
        }
        Ok(())
    }

    pub fn concurrency_color(&self, bucket: &str) -> Option<&str> {
        self.concurrency_colors.get(bucket).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_validate() {
        DashboardConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json_str(
            r##"{
                "strategyColors": { "single": "#000000", "threadPerRequest": "#111111", "threadPool": "#222222" },
                "thresholds": { "throughput": { "good": 3000, "warning": 1000 } }
            }"##,
        )
        .unwrap();
        assert_eq!(config.strategy_colors.token(StrategyId::ThreadPool), "#222222");
        assert_eq!(config.severity_colors, SeverityPalette::default());
        assert_eq!(
            config.thresholds.get(MetricName::Throughput).unwrap(),
            &MetricThresholds::higher_is_better(3000.0, 1000.0)
        );
        // A supplied table replaces the default one wholesale.
        assert_eq!(
            config.thresholds.get(MetricName::P50Latency),
            Err(AnalyticsError::ThresholdsMissing("p50Latency".into()))
        );
    }

    #[test]
    fn rejects_inverted_thresholds_in_json() {
        let err = DashboardConfig::from_json_str(
            r#"{ "thresholds": { "p50Latency": { "good": 500, "warning": 20, "lowerIsBetter": true } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation { .. }));
    }

    #[test]
    fn rejects_backwards_degradation_window() {
        let mut config = DashboardConfig::default();
        config.headlines.degradation_from = 1000;
        config.headlines.degradation_to = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn severity_tokens_follow_palette() {
        let palette = SeverityPalette::default();
        assert_eq!(palette.token(SeverityTier::Bad), "#ef4444");
        assert_eq!(palette.token(SeverityTier::Good), "#10b981");
    }
}
