use std::collections::BTreeMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::data::model::{ConcurrencyLevel, DataPoint, MetricName, StrategyId};
use crate::error::{AnalyticsError, Result};

/// Validated, ascending sequence of measurements for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    metric: MetricName,
    points: Vec<DataPoint>,
}

impl MetricSeries {
    /// Validate and wrap the points. Fails on the first violation.
    pub fn new(metric: MetricName, points: Vec<DataPoint>) -> Result<Self> {
        let context = || format!("series `{}`", metric);

        if points.is_empty() {
            return Err(AnalyticsError::validation(context(), "series has no data points"));
        }

        for (idx, point) in points.iter().enumerate() {
            if point.concurrency_level == 0 {
                return Err(AnalyticsError::validation(
                    context(),
                    format!("point {}: concurrency level must be positive", idx),
                ));
            }
            for (strategy, value) in point.values.iter() {
                check_value(metric, value).map_err(|reason| {
                    AnalyticsError::validation(
                        context(),
                        format!(
                            "point {} (c={}), {}: {}",
                            idx,
                            point.concurrency_level,
                            strategy.key(),
                            reason
                        ),
                    )
                })?;
            }
        }

        if let Some((prev, next)) = points
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.concurrency_level >= b.concurrency_level)
        {
            let reason = if prev.concurrency_level == next.concurrency_level {
                format!("duplicate concurrency level {}", next.concurrency_level)
            } else {
                format!(
                    "concurrency levels not ascending: {} follows {}",
                    next.concurrency_level, prev.concurrency_level
                )
            };
            return Err(AnalyticsError::validation(context(), reason));
        }

        Ok(Self { metric, points })
    }

    pub fn metric(&self) -> MetricName {
        self.metric
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn levels(&self) -> impl Iterator<Item = ConcurrencyLevel> + '_ {
        self.points.iter().map(|p| p.concurrency_level)
    }

    /// Exact-level lookup; untested levels are never estimated
    pub fn point_at(&self, level: ConcurrencyLevel) -> Result<&DataPoint> {
        self.points
            .binary_search_by_key(&level, |p| p.concurrency_level)
            .map(|idx| &self.points[idx])
            .map_err(|_| AnalyticsError::LevelNotFound {
                metric: self.metric.key().to_string(),
                level,
            })
    }

    /// One strategy's sub-series as `(level, value)` in ascending level order
    pub fn strategy_values(
        &self,
        strategy: StrategyId,
    ) -> impl Iterator<Item = (ConcurrencyLevel, f64)> + '_ {
        self.points
            .iter()
            .map(move |p| (p.concurrency_level, p.value(strategy)))
    }
}

fn check_value(metric: MetricName, value: f64) -> std::result::Result<(), String> {
    if !value.is_finite() {
        return Err(format!("value {} is not a finite number", value));
    }
    if value < 0.0 {
        return Err(format!("value {} is negative", value));
    }
    if metric == MetricName::SuccessRate && value > 100.0 {
        return Err(format!("success rate {} exceeds 100", value));
    }
    Ok(())
}

/// Immutable set of metric series sharing one concurrency-level axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkMatrix {
    levels: Vec<ConcurrencyLevel>,
    series: BTreeMap<MetricName, MetricSeries>,
}

impl BenchmarkMatrix {
    pub fn new(series: Vec<MetricSeries>) -> Result<Self> {
        let mut iter = series.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| AnalyticsError::validation("benchmark matrix", "no series supplied"))?;
        let levels: Vec<ConcurrencyLevel> = first.levels().collect();

        let mut by_metric = BTreeMap::new();
        by_metric.insert(first.metric(), first);

        for s in iter {
            if !s.levels().eq(levels.iter().copied()) {
                return Err(AnalyticsError::validation(
                    "benchmark matrix",
                    format!(
                        "series `{}` has levels [{}], expected [{}]",
                        s.metric(),
                        s.levels().join(", "),
                        levels.iter().join(", ")
                    ),
                ));
            }
            let metric = s.metric();
            if by_metric.insert(metric, s).is_some() {
                return Err(AnalyticsError::validation(
                    "benchmark matrix",
                    format!("metric `{}` supplied more than once", metric),
                ));
            }
        }

        debug!(series = by_metric.len(), levels = levels.len(), "benchmark matrix validated");
        Ok(Self { levels, series: by_metric })
    }

    /// The shared, ascending concurrency-level axis
    pub fn levels(&self) -> &[ConcurrencyLevel] {
        &self.levels
    }

    /// Metrics present, in canonical order
    pub fn metrics(&self) -> impl Iterator<Item = MetricName> + '_ {
        self.series.keys().copied()
    }

    pub fn get_series(&self, metric: MetricName) -> Result<&MetricSeries> {
        self.series
            .get(&metric)
            .ok_or_else(|| AnalyticsError::MetricNotFound(metric.key().to_string()))
    }

    /// Lookup by external name, e.g. a key coming from a chart definition
    pub fn get_series_by_name(&self, name: &str) -> Result<&MetricSeries> {
        let metric = MetricName::from_key(name)
            .ok_or_else(|| AnalyticsError::MetricNotFound(name.to_string()))?;
        self.get_series(metric)
    }

    pub fn value(
        &self,
        metric: MetricName,
        strategy: StrategyId,
        level: ConcurrencyLevel,
    ) -> Result<f64> {
        Ok(self.get_series(metric)?.point_at(level)?.value(strategy))
    }
}
