pub mod config;
pub mod error;
pub mod utils;

pub mod data {
    pub mod model;
    pub mod matrix;
    pub mod distribution;
    pub mod loader;
    pub mod bundled;
}

pub mod metrics {
    pub mod severity;
    pub mod summary;
}

pub mod plot {
    pub mod tooltip;
    pub mod comparison;
    pub mod table;
}

pub use config::DashboardConfig;
pub use data::loader::BenchmarkData;
pub use data::matrix::{BenchmarkMatrix, MetricSeries};
pub use data::model::{ConcurrencyLevel, DataPoint, MetricName, StrategyId, StrategyValues};
pub use error::{AnalyticsError, Result};
pub use metrics::severity::{classify, MetricThresholds, SeverityTier};
