//! Chart-ready series derived from a [`SummaryPayload`].
//!
//! Every projection takes `Option<&SummaryPayload>` and tolerates missing
//! sections: absent data yields `None` or a point without a value, never a
//! panic. Rounding happens only in [`format_value`]; stored values keep full
//! precision.

use serde::Serialize;

use crate::models::{get_ignore_case, SummaryPayload};

/// Metrics plotted by the averages chart, in plotting order.
pub const AVERAGE_METRICS: [&str; 3] = ["Flowrate", "Pressure", "Temperature"];

/// Shown in place of a metric the payload does not carry.
pub const MISSING_VALUE: &str = "—";

pub const TYPE_DISTRIBUTION_TITLE: &str = "Equipment Type Count";
pub const AVERAGES_TITLE: &str = "Average Values";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub title: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.label.as_str()).collect()
    }

    pub fn display_values(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|point| format_value(point.value))
            .collect()
    }

    /// Largest finite value, used to scale bars.
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|point| point.value)
            .filter(|value| value.is_finite())
            .reduce(f64::max)
    }
}

/// Bar series over the equipment types in server order. `None` when there is
/// no summary or it has no (or an empty) distribution.
pub fn project_type_distribution(summary: Option<&SummaryPayload>) -> Option<ChartSeries> {
    let distribution = summary?.type_distribution.as_ref()?;
    if distribution.is_empty() {
        return None;
    }

    let points = distribution
        .iter()
        .map(|(label, count)| ChartPoint {
            label: label.to_string(),
            value: Some(*count as f64),
        })
        .collect();

    Some(ChartSeries {
        title: TYPE_DISTRIBUTION_TITLE,
        points,
    })
}

/// Exactly one point per entry of [`AVERAGE_METRICS`], in that order,
/// whatever order the payload uses. Metric names match case-insensitively.
pub fn project_averages(summary: Option<&SummaryPayload>) -> Option<ChartSeries> {
    let averages = summary?.averages.as_ref()?;

    let points = AVERAGE_METRICS
        .iter()
        .map(|metric| ChartPoint {
            label: (*metric).to_string(),
            value: get_ignore_case(averages, metric).copied().flatten(),
        })
        .collect();

    Some(ChartSeries {
        title: AVERAGES_TITLE,
        points,
    })
}

/// Every averages entry the payload carries, for the summary table.
pub fn average_rows(summary: Option<&SummaryPayload>) -> Vec<(String, String)> {
    summary
        .and_then(|summary| summary.averages.as_ref())
        .map(|averages| {
            averages
                .iter()
                .map(|(metric, value)| (metric.clone(), format_value(*value)))
                .collect()
        })
        .unwrap_or_default()
}

/// Two decimals for display; missing or non-finite values show as "—".
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.2}"),
        _ => MISSING_VALUE.to_string(),
    }
}

/// Whole-number display for counts; missing or non-finite values show as "—".
pub fn format_count(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.0}"),
        _ => MISSING_VALUE.to_string(),
    }
}
