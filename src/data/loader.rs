use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use anyhow::Context;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::data::distribution::{bucket_level, PercentileDistribution, PercentileRow};
use crate::data::matrix::{BenchmarkMatrix, MetricSeries};
use crate::data::model::{ConcurrencyLevel, DataPoint, MetricName, StrategyId, StrategyValues};
use crate::error::{AnalyticsError, Result};

type Record = UniqueMap<Value>;

const LEVEL_KEYS: [&str; 2] = ["concurrencyLevel", "concurrency"];
const PERCENTILE_KEYS: [&str; 2] = ["percentileLabel", "percentile"];

/// JSON object that keeps its entries in document order and rejects a
/// repeated key instead of letting the last occurrence win.
#[derive(Debug)]
struct UniqueMap<V>(Vec<(String, V)>);

impl<V> UniqueMap<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|(k, _)| k)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct UniqueMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<V> {
            type Value = UniqueMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object without repeated keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(key) = access.next_key::<String>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format_args!("duplicate key `{}`", key)));
                    }
                    let value = access.next_value()?;
                    entries.push((key, value));
                }
                Ok(UniqueMap(entries))
            }
        }

        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BenchmarkDocument {
    series: UniqueMap<Vec<Record>>,
    #[serde(default)]
    latency_distribution: Option<Vec<Record>>,
    #[serde(default)]
    distribution_strategy: Option<StrategyId>,
}

/// Everything loaded from one benchmark document
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkData {
    pub matrix: BenchmarkMatrix,
    pub distribution: Option<PercentileDistribution>,
}

/// Parse and validate a benchmark document held in memory
pub fn load_benchmark_str(json: &str) -> Result<BenchmarkData> {
    let doc: BenchmarkDocument = serde_json::from_str(json)
        .map_err(|e| AnalyticsError::validation("benchmark document", e.to_string()))?;

    let mut series = Vec::with_capacity(doc.series.len());
    for (name, records) in doc.series.iter() {
        let metric = MetricName::from_key(name).ok_or_else(|| {
            AnalyticsError::validation("benchmark document", format!("unknown metric `{}`", name))
        })?;

        let points = records
            .iter()
            .enumerate()
            .map(|(idx, record)| parse_point(metric, idx, record))
            .collect::<Result<Vec<_>>>()?;
        series.push(MetricSeries::new(metric, points)?);
    }
    let matrix = BenchmarkMatrix::new(series)?;

    let distribution = match doc.latency_distribution {
        Some(rows) => Some(parse_distribution(
            doc.distribution_strategy.unwrap_or(StrategyId::ThreadPool),
            &rows,
        )?),
        None => None,
    };

    info!(
        metrics = matrix.metrics().count(),
        levels = matrix.levels().len(),
        distribution_buckets = distribution.as_ref().map(|d| d.buckets().len()).unwrap_or(0),
        "loaded benchmark data"
    );
    Ok(BenchmarkData { matrix, distribution })
}

/// Read a benchmark document from disk
pub fn load_benchmark_file(path: impl AsRef<Path>) -> anyhow::Result<BenchmarkData> {
    let path = path.as_ref();
    info!("Loading benchmark data from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read benchmark file {}", path.display()))?;
    let data = load_benchmark_str(&raw)
        .with_context(|| format!("failed to load benchmark file {}", path.display()))?;
    Ok(data)
}

fn parse_point(metric: MetricName, idx: usize, record: &Record) -> Result<DataPoint> {
    let context = || format!("series `{}` record {}", metric, idx);

    let mut level: Option<ConcurrencyLevel> = None;
    let mut values: [Option<f64>; 3] = [None; 3];

    for (key, value) in record.iter() {
        if LEVEL_KEYS.contains(&key.as_str()) {
            if level.is_some() {
                return Err(AnalyticsError::validation(context(), "concurrency level given twice"));
            }
            let parsed = value
                .as_u64()
                .filter(|v| *v > 0)
                .and_then(|v| ConcurrencyLevel::try_from(v).ok())
                .ok_or_else(|| {
                    AnalyticsError::validation(
                        context(),
                        format!("concurrency level {} is not a positive integer", value),
                    )
                })?;
            level = Some(parsed);
            continue;
        }

        let strategy = StrategyId::from_key(key).ok_or_else(|| {
            AnalyticsError::validation(context(), format!("unknown strategy key `{}`", key))
        })?;
        let slot = &mut values[strategy.index()];
        if slot.is_some() {
            return Err(AnalyticsError::validation(
                context(),
                format!("strategy `{}` given twice", strategy.key()),
            ));
        }
        *slot = Some(number(value).ok_or_else(|| {
            AnalyticsError::validation(context(), format!("`{}` value {} is not numeric", key, value))
        })?);
    }

    let level = level.ok_or_else(|| AnalyticsError::validation(context(), "missing concurrency level"))?;
    let mut resolved = [0.0; 3];
    for strategy in StrategyId::ALL {
        resolved[strategy.index()] = values[strategy.index()].ok_or_else(|| {
            AnalyticsError::validation(context(), format!("missing value for `{}`", strategy.key()))
        })?;
    }

    Ok(DataPoint::new(
        level,
        StrategyValues::new(resolved[0], resolved[1], resolved[2]),
    ))
}

fn parse_distribution(strategy: StrategyId, records: &[Record]) -> Result<PercentileDistribution> {
    let context = |idx: usize| format!("latency distribution record {}", idx);

    let first = records.first().ok_or_else(|| {
        AnalyticsError::validation("latency distribution", "no percentile records")
    })?;
    let mut buckets: Vec<String> = first
        .keys()
        .filter(|k| !PERCENTILE_KEYS.contains(&k.as_str()))
        .cloned()
        .collect();
    if let Some(bad) = buckets.iter().find(|b| bucket_level(b).is_none()) {
        return Err(AnalyticsError::validation(
            context(0),
            format!("bucket key `{}` is not of the form c<level>", bad),
        ));
    }
    buckets.sort_by_key(|b| bucket_level(b));

    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let label = PERCENTILE_KEYS
            .iter()
            .find_map(|k| record.get(*k))
            .and_then(Value::as_str)
            .ok_or_else(|| AnalyticsError::validation(context(idx), "missing percentile label"))?;

        if record.len() != buckets.len() + 1 {
            return Err(AnalyticsError::validation(
                context(idx),
                format!("expected buckets [{}]", buckets.join(", ")),
            ));
        }
        let values = buckets
            .iter()
            .map(|bucket| {
                let raw = record.get(bucket).ok_or_else(|| {
                    AnalyticsError::validation(context(idx), format!("missing bucket `{}`", bucket))
                })?;
                number(raw).ok_or_else(|| {
                    AnalyticsError::validation(
                        context(idx),
                        format!("`{}` value {} is not numeric", bucket, raw),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        rows.push(PercentileRow {
            percentile_label: label.to_string(),
            values,
        });
    }

    PercentileDistribution::new(strategy, buckets, rows)
}

/// Numbers only; strings such as `"12"` are rejected rather than coerced
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
