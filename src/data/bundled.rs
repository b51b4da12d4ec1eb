use crate::data::loader::{load_benchmark_str, BenchmarkData};
use crate::error::Result;

/// Measured httpforge runs (hey, `GET /hello`, 20ms simulated blocking I/O)
pub const HTTPFORGE_BENCHMARK_JSON: &str = include_str!("../../data/httpforge.json");

/// The compiled-in benchmark matrix and thread-pool latency distribution
pub fn httpforge() -> Result<BenchmarkData> {
    load_benchmark_str(HTTPFORGE_BENCHMARK_JSON)
}
