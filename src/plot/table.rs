use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use crate::config::DashboardConfig;
use crate::data::distribution::{bucket_level, PercentileDistribution};
use crate::data::model::{MetricName, StrategyId};
use crate::metrics::summary::SummaryCard;
use crate::plot::comparison::ComparisonGrid;
use crate::utils::format_grouped;

/// `"#ef4444"` -> RGB terminal color
fn token_color(token: &str) -> Option<Color> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Value plus unit the way the comparison table shows it
pub fn format_metric_value(metric: MetricName, value: f64) -> String {
    let digits = match metric {
        MetricName::SuccessRate => 2,
        MetricName::MemoryUsage | MetricName::ThreadCount => 0,
        _ if value >= 1000.0 => 0,
        _ => 1,
    };
    let number = format_grouped(value, digits);
    match metric.unit() {
        "" => number,
        "%" => format!("{}%", number),
        unit => format!("{} {}", number, unit),
    }
}

fn new_table(styled: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

/// Comparison grid as a text table; severity becomes cell color and the best strategy is bold
pub fn render_comparison(grid: &ComparisonGrid, config: &DashboardConfig, styled: bool) -> String {
    let mut table = new_table(styled);

    let mut header = vec![Cell::new("metric")];
    header.extend(StrategyId::ALL.into_iter().map(|s| {
        let mut cell = Cell::new(s.label()).set_alignment(CellAlignment::Center);
        if let Some(color) = token_color(config.strategy_colors.token(s)) {
            cell = cell.fg(color);
        }
        cell
    }));
    table.set_header(header);

    for row in &grid.rows {
        let best = row.best();
        let mut cells = vec![Cell::new(row.metric.label())];
        for s in StrategyId::ALL {
            let c = row.cell(s);
            let mut cell = Cell::new(format_metric_value(row.metric, c.value))
                .set_alignment(CellAlignment::Center);
            if let Some(color) = token_color(config.severity_colors.token(c.severity)) {
                cell = cell.fg(color);
            }
            if s == best {
                cell = cell.add_attribute(Attribute::Bold);
            }
            cells.push(cell);
        }
        table.add_row(cells);
    }

    format!(
        "architecture comparison @ c={}\n{}",
        format_grouped(f64::from(grid.concurrency_level), 0),
        table
    )
}

pub fn render_cards(cards: &[SummaryCard]) -> String {
    let mut table = new_table(false);
    table.set_header(vec!["metric", "value", "detail"]);
    for card in cards {
        let value = if card.unit.is_empty() {
            card.value.clone()
        } else {
            format!("{} {}", card.value, card.unit)
        };
        table.add_row(vec![card.title.clone(), value, card.subtitle.clone()]);
    }
    table.to_string()
}

/// Percentiles as rows, buckets as columns (`c=10`, `c=100`, ...)
pub fn render_distribution(dist: &PercentileDistribution, config: &DashboardConfig, styled: bool) -> String {
    let mut table = new_table(styled);

    let mut header = vec![Cell::new("percentile")];
    header.extend(dist.buckets().iter().map(|bucket| {
        let label = bucket_level(bucket)
            .map(|level| format!("c={}", level))
            .unwrap_or_else(|| bucket.clone());
        let mut cell = Cell::new(label).set_alignment(CellAlignment::Right);
        if let Some(color) = config.concurrency_color(bucket).and_then(token_color) {
            cell = cell.fg(color);
        }
        cell
    }));
    table.set_header(header);

    for row in dist.rows() {
        let mut cells = vec![Cell::new(&row.percentile_label)];
        cells.extend(
            row.values
                .iter()
                .map(|v| Cell::new(format!("{} ms", format_grouped(*v, 1))).set_alignment(CellAlignment::Right)),
        );
        table.add_row(cells);
    }

    format!("{} latency distribution\n{}", dist.strategy().label(), table)
}
