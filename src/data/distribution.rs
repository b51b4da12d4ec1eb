use std::collections::HashSet;
use itertools::Itertools;
use serde::Serialize;

use crate::data::model::{ConcurrencyLevel, StrategyId};
use crate::error::{AnalyticsError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileRow {
    pub percentile_label: String,
    /// One value per bucket, in the distribution's bucket order
    pub values: Vec<f64>,
}

/// Latency percentiles for a single strategy at a sparse set of concurrency
/// buckets (`c10`, `c100`, ...). Independent of the matrix level axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileDistribution {
    strategy: StrategyId,
    buckets: Vec<String>,
    rows: Vec<PercentileRow>,
}

/// `"c1000"` -> `1000`
pub fn bucket_level(bucket: &str) -> Option<ConcurrencyLevel> {
    bucket
        .strip_prefix('c')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .filter(|level| *level > 0)
}

impl PercentileDistribution {
    pub fn new(strategy: StrategyId, buckets: Vec<String>, rows: Vec<PercentileRow>) -> Result<Self> {
        let context = "latency distribution";

        if buckets.is_empty() || rows.is_empty() {
            return Err(AnalyticsError::validation(context, "distribution has no buckets or no rows"));
        }
        if let Some(bad) = buckets.iter().find(|b| bucket_level(b).is_none()) {
            return Err(AnalyticsError::validation(
                context,
                format!("bucket key `{}` is not of the form c<level>", bad),
            ));
        }
        if let Some(dup) = buckets.iter().duplicates().next() {
            return Err(AnalyticsError::validation(context, format!("bucket `{}` declared twice", dup)));
        }

        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.percentile_label.as_str()) {
                return Err(AnalyticsError::validation(
                    context,
                    format!("percentile `{}` declared twice", row.percentile_label),
                ));
            }
            if row.values.len() != buckets.len() {
                return Err(AnalyticsError::validation(
                    context,
                    format!(
                        "percentile `{}` has {} values for {} buckets",
                        row.percentile_label,
                        row.values.len(),
                        buckets.len()
                    ),
                ));
            }
            if let Some(v) = row.values.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(AnalyticsError::validation(
                    context,
                    format!("percentile `{}` has invalid latency {}", row.percentile_label, v),
                ));
            }
        }

        // Percentiles are cutpoints of one distribution, so each bucket must be non-decreasing.
        for (col, bucket) in buckets.iter().enumerate() {
            if let Some((lo, hi)) = rows
                .iter()
                .tuple_windows()
                .find(|(lo, hi)| hi.values[col] < lo.values[col])
            {
                return Err(AnalyticsError::validation(
                    context,
                    format!(
                        "bucket `{}`: {} ({}) is below {} ({})",
                        bucket, hi.percentile_label, hi.values[col], lo.percentile_label, lo.values[col]
                    ),
                ));
            }
        }

        Ok(Self { strategy, buckets, rows })
    }

    pub fn strategy(&self) -> StrategyId {
        self.strategy
    }

    pub fn buckets(&self) -> &[String] {
        &self.buckets
    }

    pub fn rows(&self) -> &[PercentileRow] {
        &self.rows
    }

    pub fn percentiles(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.percentile_label.as_str())
    }

    fn bucket_index(&self, bucket: &str) -> Result<usize> {
        self.buckets
            .iter()
            .position(|b| b == bucket)
            .ok_or_else(|| AnalyticsError::LevelNotFound {
                metric: "latencyDistribution".to_string(),
                level: bucket_level(bucket).unwrap_or(0),
            })
    }

    pub fn percentile_value(&self, percentile: &str, bucket: &str) -> Result<f64> {
        let col = self.bucket_index(bucket)?;
        self.rows
            .iter()
            .find(|r| r.percentile_label == percentile)
            .map(|r| r.values[col])
            .ok_or_else(|| AnalyticsError::MetricNotFound(percentile.to_string()))
    }

    /// `(percentile, latency)` for one bucket, lowest percentile first
    pub fn bucket_values(&self, bucket: &str) -> Result<Vec<(&str, f64)>> {
        let col = self.bucket_index(bucket)?;
        Ok(self
            .rows
            .iter()
            .map(|r| (r.percentile_label.as_str(), r.values[col]))
            .collect())
    }

    /// Highest minus lowest percentile within a bucket
    pub fn tail_spread(&self, bucket: &str) -> Result<f64> {
        let col = self.bucket_index(bucket)?;
        match (self.rows.first(), self.rows.last()) {
            (Some(lo), Some(hi)) => Ok(hi.values[col] - lo.values[col]),
            _ => Ok(0.0),
        }
    }
}
