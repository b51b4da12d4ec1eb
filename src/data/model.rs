use std::fmt;
use serde::{Deserialize, Serialize};

/// Number of simultaneous in-flight client connections during a run
pub type ConcurrencyLevel = u32;

/// The three server architectures under comparison. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyId {
    #[serde(alias = "single_thread")]
    Single,
    #[serde(alias = "thread", alias = "thread_per_request")]
    ThreadPerRequest,
    #[serde(alias = "pool", alias = "thread_pool")]
    ThreadPool,
}

impl StrategyId {
    /// Declaration order; also the column and tooltip order everywhere
    pub const ALL: [StrategyId; 3] = [
        StrategyId::Single,
        StrategyId::ThreadPerRequest,
        StrategyId::ThreadPool,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StrategyId::Single => "single",
            StrategyId::ThreadPerRequest => "threadPerRequest",
            StrategyId::ThreadPool => "threadPool",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyId::Single => "single-thread",
            StrategyId::ThreadPerRequest => "thread-per-request",
            StrategyId::ThreadPool => "thread-pool",
        }
    }

    /// Accepts the canonical key plus the short `thread`/`pool` keys
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "single" | "single_thread" => Some(StrategyId::Single),
            "threadPerRequest" | "thread_per_request" | "thread" => Some(StrategyId::ThreadPerRequest),
            "threadPool" | "thread_pool" | "pool" => Some(StrategyId::ThreadPool),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricName {
    Throughput,
    #[serde(alias = "p50_latency")]
    P50Latency,
    #[serde(alias = "p99_latency")]
    P99Latency,
    #[serde(alias = "success_rate")]
    SuccessRate,
    #[serde(alias = "memory_usage")]
    MemoryUsage,
    #[serde(alias = "thread_count")]
    ThreadCount,
}

impl MetricName {
    /// Canonical row order of the comparison grid
    pub const ALL: [MetricName; 6] = [
        MetricName::Throughput,
        MetricName::P50Latency,
        MetricName::P99Latency,
        MetricName::SuccessRate,
        MetricName::MemoryUsage,
        MetricName::ThreadCount,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MetricName::Throughput => "throughput",
            MetricName::P50Latency => "p50Latency",
            MetricName::P99Latency => "p99Latency",
            MetricName::SuccessRate => "successRate",
            MetricName::MemoryUsage => "memoryUsage",
            MetricName::ThreadCount => "threadCount",
        }
    }

    /// Row label used by the comparison table
    pub fn label(self) -> &'static str {
        match self {
            MetricName::Throughput => "throughput",
            MetricName::P50Latency => "p50_latency",
            MetricName::P99Latency => "p99_latency",
            MetricName::SuccessRate => "success_rate",
            MetricName::MemoryUsage => "memory_usage",
            MetricName::ThreadCount => "thread_count",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricName::Throughput => "req/s",
            MetricName::P50Latency | MetricName::P99Latency => "ms",
            MetricName::SuccessRate => "%",
            MetricName::MemoryUsage => "MB",
            MetricName::ThreadCount => "",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        MetricName::ALL
            .into_iter()
            .find(|m| m.key() == key || m.label() == key)
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per strategy, indexed by `StrategyId`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyValues([f64; 3]);

impl StrategyValues {
    pub fn new(single: f64, thread_per_request: f64, thread_pool: f64) -> Self {
        Self([single, thread_per_request, thread_pool])
    }

    pub fn get(&self, strategy: StrategyId) -> f64 {
        self.0[strategy.index()]
    }

    /// `(strategy, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (StrategyId, f64)> + '_ {
        StrategyId::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub concurrency_level: ConcurrencyLevel,
    pub values: StrategyValues,
}

impl DataPoint {
    pub fn new(concurrency_level: ConcurrencyLevel, values: StrategyValues) -> Self {
        Self { concurrency_level, values }
    }

    pub fn value(&self, strategy: StrategyId) -> f64 {
        self.values.get(strategy)
    }
}
