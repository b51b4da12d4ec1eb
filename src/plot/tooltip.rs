use serde::{Deserialize, Deserializer, Serialize};

use crate::config::StrategyPalette;
use crate::data::matrix::BenchmarkMatrix;
use crate::data::model::{ConcurrencyLevel, MetricName, StrategyId};
use crate::error::Result;
use crate::utils::format_locale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub series_name: String,
    pub value: f64,
    pub color_token: String,
}

/// Hover state reported by the chart layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEvent {
    pub active: bool,
    /// Concurrency level (or percentile) under the cursor; numeric x values
    /// arrive as numbers and are kept in their JSON spelling
    #[serde(deserialize_with = "label_text")]
    pub label: String,
    #[serde(default)]
    pub payload: Vec<TooltipEntry>,
}

fn label_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLabel {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawLabel::deserialize(deserializer)? {
        RawLabel::Text(text) => text,
        RawLabel::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipLine {
    pub series_name: String,
    pub value: String,
    pub color_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub header: String,
    pub lines: Vec<TooltipLine>,
}

/// `None` is the normal not-hovering state, not an error.
pub fn format_tooltip(event: &TooltipEvent) -> Option<Tooltip> {
    if !event.active || event.payload.is_empty() {
        return None;
    }

    let lines = event
        .payload
        .iter()
        .map(|entry| TooltipLine {
            series_name: entry.series_name.clone(),
            value: format_locale(entry.value),
            color_token: entry.color_token.clone(),
        })
        .collect();

    Some(Tooltip {
        header: format!("c={}", event.label),
        lines,
    })
}

/// Payload for one hovered level, one entry per strategy in declaration order
pub fn payload_at(
    matrix: &BenchmarkMatrix,
    metric: MetricName,
    level: ConcurrencyLevel,
    palette: &StrategyPalette,
) -> Result<Vec<TooltipEntry>> {
    let point = matrix.get_series(metric)?.point_at(level)?;
    Ok(StrategyId::ALL
        .into_iter()
        .map(|strategy| TooltipEntry {
            series_name: strategy.label().to_string(),
            value: point.value(strategy),
            color_token: palette.token(strategy).to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, value: f64, color: &str) -> TooltipEntry {
        TooltipEntry {
            series_name: name.into(),
            value,
            color_token: color.into(),
        }
    }

    #[test]
    fn inactive_or_empty_renders_nothing() {
        let inactive = TooltipEvent {
            active: false,
            label: "1000".into(),
            payload: vec![entry("thread-pool", 3181.15, "#f21a00")],
        };
        assert_eq!(format_tooltip(&inactive), None);

        let empty = TooltipEvent {
            active: true,
            label: "1000".into(),
            payload: vec![],
        };
        assert_eq!(format_tooltip(&empty), None);
        assert_eq!(format_tooltip(&TooltipEvent::default()), None);
    }

    #[test]
    fn lines_follow_payload_order_not_magnitude() {
        let event = TooltipEvent {
            active: true,
            label: "1000".into(),
            payload: vec![
                entry("single-thread", 54.74, "#3b9ab2"),
                entry("thread-per-request", 1266.7, "#e1af00"),
                entry("thread-pool", 3181.15, "#f21a00"),
            ],
        };
        let tooltip = format_tooltip(&event).unwrap();
        assert_eq!(tooltip.header, "c=1000");
        assert_eq!(
            tooltip.lines,
            vec![
                TooltipLine {
                    series_name: "single-thread".into(),
                    value: "54.74".into(),
                    color_token: "#3b9ab2".into(),
                },
                TooltipLine {
                    series_name: "thread-per-request".into(),
                    value: "1,266.7".into(),
                    color_token: "#e1af00".into(),
                },
                TooltipLine {
                    series_name: "thread-pool".into(),
                    value: "3,181.15".into(),
                    color_token: "#f21a00".into(),
                },
            ]
        );
    }

    #[test]
    fn deserializes_chart_event() {
        let event: TooltipEvent = serde_json::from_str(
            r##"{ "active": true, "label": "10", "payload": [
                { "seriesName": "thread-pool", "value": 481.97, "colorToken": "#f21a00" }
            ] }"##,
        )
        .unwrap();
        assert_eq!(format_tooltip(&event).unwrap().lines[0].value, "481.97");
    }

    #[test]
    fn numeric_labels_are_accepted() {
        let event: TooltipEvent = serde_json::from_str(
            r##"{ "active": true, "label": 1000, "payload": [
                { "seriesName": "thread-pool", "value": 3181.15, "colorToken": "#f21a00" }
            ] }"##,
        )
        .unwrap();
        assert_eq!(event.label, "1000");
        assert_eq!(format_tooltip(&event).unwrap().header, "c=1000");

        let bad = serde_json::from_str::<TooltipEvent>(r#"{ "active": true, "label": [1] }"#);
        assert!(bad.is_err());
    }
}
