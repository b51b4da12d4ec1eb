// Headline properties of the httpforge benchmark data: lookups, classification
// and the derived summary figures.

use anyhow::Result;
use httpforge_analytics::data::bundled;
use httpforge_analytics::data::loader::load_benchmark_str;
use httpforge_analytics::metrics::summary::{degradation, peak, relative_gain, reliability_delta};
use httpforge_analytics::plot::comparison::project;
use httpforge_analytics::plot::tooltip::{format_tooltip, payload_at, TooltipEvent};
use httpforge_analytics::{
    classify, AnalyticsError, DashboardConfig, MetricName, MetricThresholds, SeverityTier, StrategyId,
};

#[test]
fn every_series_shares_one_ascending_axis() -> Result<()> {
    let data = bundled::httpforge()?;
    let axis = data.matrix.levels().to_vec();
    assert!(axis.windows(2).all(|w| w[0] < w[1]));

    for metric in data.matrix.metrics() {
        let levels: Vec<_> = data.matrix.get_series(metric)?.levels().collect();
        assert_eq!(levels, axis, "{} is misaligned", metric);
    }
    Ok(())
}

#[test]
fn classification_boundaries() {
    let higher = MetricThresholds::higher_is_better(90.0, 50.0);
    let expected = [
        (100.0, SeverityTier::Good),
        (90.0, SeverityTier::Good),
        (89.0, SeverityTier::Warning),
        (50.0, SeverityTier::Warning),
        (49.0, SeverityTier::Bad),
    ];
    for (value, tier) in expected {
        assert_eq!(classify(value, &higher), tier, "value {}", value);
    }

    let lower = MetricThresholds::lower_is_better(20.0, 500.0);
    let expected = [
        (20.0, SeverityTier::Good),
        (21.0, SeverityTier::Warning),
        (500.0, SeverityTier::Warning),
        (501.0, SeverityTier::Bad),
    ];
    for (value, tier) in expected {
        assert_eq!(classify(value, &lower), tier, "value {}", value);
    }
}

#[test]
fn pool_gain_over_thread_per_request_at_high_load() -> Result<()> {
    let data = bundled::httpforge()?;
    let gain = relative_gain(
        &data.matrix,
        MetricName::Throughput,
        StrategyId::ThreadPool,
        StrategyId::ThreadPerRequest,
        1000,
    )?;
    assert!((gain - 151.1).abs() < 0.05, "gain was {}", gain);
    Ok(())
}

#[test]
fn thread_per_request_degrades_from_c100_to_c1000() -> Result<()> {
    let data = bundled::httpforge()?;
    let change = degradation(
        &data.matrix,
        MetricName::Throughput,
        StrategyId::ThreadPerRequest,
        100,
        1000,
    )?;
    assert!(change < 0.0);
    assert!((change + 60.47).abs() < 0.05, "change was {}", change);
    Ok(())
}

#[test]
fn reliability_delta_is_in_points() -> Result<()> {
    let data = bundled::httpforge()?;
    let delta = reliability_delta(&data.matrix, StrategyId::ThreadPool, StrategyId::Single, 1000)?;
    assert!((delta - 53.47).abs() < 1e-9, "delta was {}", delta);
    Ok(())
}

#[test]
fn peaks_report_level_of_maximum() -> Result<()> {
    let data = bundled::httpforge()?;
    let tpr = peak(&data.matrix, MetricName::Throughput, StrategyId::ThreadPerRequest)?;
    assert_eq!((tpr.concurrency_level, tpr.value), (100, 3205.18));

    let pool = peak(&data.matrix, MetricName::Throughput, StrategyId::ThreadPool)?;
    assert_eq!((pool.concurrency_level, pool.value), (1000, 3181.15));

    // success rate is 100 at every level for the pool: first occurrence wins
    let steady = peak(&data.matrix, MetricName::SuccessRate, StrategyId::ThreadPool)?;
    assert_eq!(steady.concurrency_level, 1);
    Ok(())
}

#[test]
fn absent_keys_fail_instead_of_defaulting() -> Result<()> {
    let data = bundled::httpforge()?;
    assert_eq!(
        data.matrix.get_series_by_name("cpuEfficiency").unwrap_err(),
        AnalyticsError::MetricNotFound("cpuEfficiency".into())
    );
    assert_eq!(
        data.matrix.get_series(MetricName::P99Latency)?.point_at(500).unwrap_err(),
        AnalyticsError::LevelNotFound {
            metric: "p99Latency".into(),
            level: 500
        }
    );
    Ok(())
}

#[test]
fn projector_never_emits_partial_rows() -> Result<()> {
    let json = r#"{ "series": {
        "throughput":  [ { "concurrencyLevel": 100, "single": 50.22, "threadPerRequest": 3205.18, "threadPool": 787.03 } ],
        "p50Latency":  [ { "concurrencyLevel": 100, "single": 1059.2, "threadPerRequest": 20.6, "threadPool": 122.4 } ],
        "p99Latency":  [ { "concurrencyLevel": 100, "single": 1064.8, "threadPerRequest": 23.8, "threadPool": 142.1 } ],
        "successRate": [ { "concurrencyLevel": 100, "single": 97.6, "threadPerRequest": 100, "threadPool": 100 } ],
        "memoryUsage": [ { "concurrencyLevel": 100, "single": 1, "threadPerRequest": 100, "threadPool": 100 } ]
    } }"#;
    let data = load_benchmark_str(json)?;
    let config = DashboardConfig::default();

    assert_eq!(
        project(&data.matrix, &config.thresholds, 1000).unwrap_err(),
        AnalyticsError::LevelNotFound {
            metric: "throughput".into(),
            level: 1000
        }
    );
    // the level exists but threadCount was never measured
    assert_eq!(
        project(&data.matrix, &config.thresholds, 100).unwrap_err(),
        AnalyticsError::MetricNotFound("threadCount".into())
    );
    Ok(())
}

#[test]
fn tooltip_is_empty_when_not_hovering() -> Result<()> {
    let data = bundled::httpforge()?;
    let config = DashboardConfig::default();
    let payload = payload_at(&data.matrix, MetricName::Throughput, 1000, &config.strategy_colors)?;

    for label in ["1000", "", "not-a-level"] {
        let inactive = TooltipEvent {
            active: false,
            label: label.into(),
            payload: payload.clone(),
        };
        assert!(format_tooltip(&inactive).is_none());

        let empty = TooltipEvent {
            active: true,
            label: label.into(),
            payload: vec![],
        };
        assert!(format_tooltip(&empty).is_none());
    }

    let hovering = TooltipEvent {
        active: true,
        label: "1000".into(),
        payload,
    };
    let tooltip = format_tooltip(&hovering).expect("active tooltip");
    let names: Vec<_> = tooltip.lines.iter().map(|l| l.series_name.as_str()).collect();
    assert_eq!(names, vec!["single-thread", "thread-per-request", "thread-pool"]);
    assert_eq!(tooltip.lines[2].value, "3,181.15");
    assert_eq!(tooltip.lines[2].color_token, "#f21a00");
    Ok(())
}
