use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::ThresholdTable;
use crate::data::matrix::BenchmarkMatrix;
use crate::data::model::{ConcurrencyLevel, MetricName, StrategyId};
use crate::error::Result;
use crate::metrics::severity::{classify, MetricThresholds, SeverityTier};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub value: f64,
    pub severity: SeverityTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: MetricName,
    pub thresholds: MetricThresholds,
    /// Indexed by strategy declaration order
    pub cells: [ComparisonCell; 3],
}

impl ComparisonRow {
    pub fn cell(&self, strategy: StrategyId) -> ComparisonCell {
        self.cells[strategy.index()]
    }

    /// Strategy with the best raw value under the metric's direction; earliest wins ties
    pub fn best(&self) -> StrategyId {
        StrategyId::ALL
            .into_iter()
            .reduce(|best, s| {
                if self.thresholds.better(self.cell(s).value, self.cell(best).value) {
                    s
                } else {
                    best
                }
            })
            .unwrap_or(StrategyId::Single)
    }
}

/// Metric x strategy grid at one concurrency level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonGrid {
    pub concurrency_level: ConcurrencyLevel,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonGrid {
    pub fn row(&self, metric: MetricName) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}

/// Every canonical metric must be present at `level`; no partial rows.
pub fn project(
    matrix: &BenchmarkMatrix,
    thresholds: &ThresholdTable,
    level: ConcurrencyLevel,
) -> Result<ComparisonGrid> {
    let rows = MetricName::ALL
        .into_iter()
        .map(|metric| {
            let point = matrix.get_series(metric)?.point_at(level)?;
            let t = *thresholds.get(metric)?;
            let cells = StrategyId::ALL.map(|s| {
                let value = point.value(s);
                ComparisonCell { value, severity: classify(value, &t) }
            });
            Ok(ComparisonRow { metric, thresholds: t, cells })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(level, rows = rows.len(), "comparison grid projected");
    Ok(ComparisonGrid { concurrency_level: level, rows })
}

/// One grid per matrix level, ascending
pub fn project_all(matrix: &BenchmarkMatrix, thresholds: &ThresholdTable) -> Result<Vec<ComparisonGrid>> {
    matrix
        .levels()
        .par_iter()
        .map(|level| project(matrix, thresholds, *level))
        .collect()
}
