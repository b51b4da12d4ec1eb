use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::data::matrix::BenchmarkMatrix;
use crate::data::model::{ConcurrencyLevel, MetricName, StrategyId};
use crate::error::{AnalyticsError, Result};
use crate::utils::{format_grouped, format_signed_percent};

/// Highest value of one strategy's sub-series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Peak {
    pub metric: MetricName,
    pub strategy: StrategyId,
    pub concurrency_level: ConcurrencyLevel,
    pub value: f64,
}

/// Maximum over all levels; ties go to the lowest level.
pub fn peak(matrix: &BenchmarkMatrix, metric: MetricName, strategy: StrategyId) -> Result<Peak> {
    let series = matrix.get_series(metric)?;
    let (concurrency_level, value) = series
        .strategy_values(strategy)
        .fold(None, |best: Option<(ConcurrencyLevel, f64)>, (level, value)| match best {
            Some((_, current)) if OrderedFloat(value) <= OrderedFloat(current) => best,
            _ => Some((level, value)),
        })
        .ok_or_else(|| AnalyticsError::MetricNotFound(metric.key().to_string()))?;

    Ok(Peak { metric, strategy, concurrency_level, value })
}

/// `(value - reference) / reference * 100`. A zero reference, or a ratio too
/// large to represent, is `DivisionUndefined`.
pub fn relative_change(reference: f64, value: f64, context: impl FnOnce() -> String) -> Result<f64> {
    if reference == 0.0 {
        return Err(AnalyticsError::DivisionUndefined { context: context() });
    }
    let change = (value - reference) / reference * 100.0;
    if !change.is_finite() {
        return Err(AnalyticsError::DivisionUndefined { context: context() });
    }
    Ok(change)
}

/// Signed percent by which `a` exceeds `b` at one level
pub fn relative_gain(
    matrix: &BenchmarkMatrix,
    metric: MetricName,
    a: StrategyId,
    b: StrategyId,
    level: ConcurrencyLevel,
) -> Result<f64> {
    let point = matrix.get_series(metric)?.point_at(level)?;
    relative_change(point.value(b), point.value(a), || {
        format!("{} gain of {} over {} at c={}", metric, a.key(), b.key(), level)
    })
}

/// Signed percent change of one strategy from `from` to `to`; negative means degradation.
///
/// Levels are taken in the order given, so swapping them measures the change
/// in the other direction. Callers wanting "earlier to later" pass the lower
/// level as `from`; the headline window is checked that way in
/// [`DashboardConfig::validate`].
pub fn degradation(
    matrix: &BenchmarkMatrix,
    metric: MetricName,
    strategy: StrategyId,
    from: ConcurrencyLevel,
    to: ConcurrencyLevel,
) -> Result<f64> {
    let series = matrix.get_series(metric)?;
    let before = series.point_at(from)?.value(strategy);
    let after = series.point_at(to)?.value(strategy);
    relative_change(before, after, || {
        format!("{} change of {} from c={} to c={}", metric, strategy.key(), from, to)
    })
}

/// Success-rate difference `a - b` in percentage points
pub fn reliability_delta(
    matrix: &BenchmarkMatrix,
    a: StrategyId,
    b: StrategyId,
    level: ConcurrencyLevel,
) -> Result<f64> {
    let point = matrix.get_series(MetricName::SuccessRate)?.point_at(level)?;
    Ok(point.value(a) - point.value(b))
}

/// One headline figure, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: String,
    pub value: String,
    pub unit: String,
    pub subtitle: String,
    pub raw: f64,
}

/// Peak throughput, reliability, throughput gain and degradation, in that order
pub fn headline_cards(matrix: &BenchmarkMatrix, config: &DashboardConfig) -> Result<Vec<SummaryCard>> {
    let h = &config.headlines;

    let top = peak(matrix, MetricName::Throughput, h.featured)?;

    let reliability = matrix
        .get_series(MetricName::SuccessRate)?
        .point_at(h.high_load_level)?;
    let featured_rate = reliability.value(h.featured);
    let baseline_rate = reliability.value(h.reliability_baseline);
    let delta = reliability_delta(matrix, h.featured, h.reliability_baseline, h.high_load_level)?;

    let gain = relative_gain(
        matrix,
        MetricName::Throughput,
        h.featured,
        h.gain_baseline,
        h.high_load_level,
    )?;
    let decline = degradation(
        matrix,
        MetricName::Throughput,
        h.degradation_strategy,
        h.degradation_from,
        h.degradation_to,
    )?;

    debug!(peak = top.value, gain, decline, delta, "headline figures computed");

    Ok(vec![
        SummaryCard {
            title: "peak throughput".into(),
            value: format_grouped(top.value, 0),
            unit: MetricName::Throughput.unit().into(),
            subtitle: format!("{} @ c={}", h.featured.label(), top.concurrency_level),
            raw: top.value,
        },
        SummaryCard {
            title: "reliability".into(),
            value: format_grouped(featured_rate, 1),
            unit: "%".into(),
            subtitle: format!(
                "vs {}% {} ({:+.1} pp)",
                format_grouped(baseline_rate, 1),
                h.reliability_baseline.label(),
                delta
            ),
            raw: featured_rate,
        },
        SummaryCard {
            title: "throughput gain".into(),
            value: format_signed_percent(gain),
            unit: "%".into(),
            subtitle: format!("vs {}", h.gain_baseline.label()),
            raw: gain,
        },
        SummaryCard {
            title: "throughput degradation".into(),
            value: format_signed_percent(decline),
            unit: "%".into(),
            subtitle: format!(
                "{}: c{} → c{}",
                h.degradation_strategy.label(),
                h.degradation_from,
                h.degradation_to
            ),
            raw: decline,
        },
    ])
}
