//! Plain-text rendering of a [`WorkflowSnapshot`] for the console front end.

use std::fmt::Write;

use crate::{
    charts::{self, ChartSeries},
    workflow::{UploadState, WorkflowSnapshot},
};

const BAR_WIDTH: usize = 30;

pub fn render_snapshot(snapshot: &WorkflowSnapshot) -> String {
    let mut out = String::new();

    let status = match &snapshot.state {
        UploadState::Idle => "Ready".to_string(),
        UploadState::Uploading => "Uploading...".to_string(),
        UploadState::Success(_) => "Analysis complete".to_string(),
        UploadState::Failed(message) => format!("Error: {message}"),
    };
    let _ = writeln!(out, "Status: {status}");
    if let Some(file) = &snapshot.selected_file {
        let _ = writeln!(out, "File: {file}");
    }

    if let Some(summary) = &snapshot.summary {
        let _ = writeln!(out, "\nTotal Records: {}", summary.total_count);

        let rows = charts::average_rows(Some(summary));
        if !rows.is_empty() {
            let _ = writeln!(out, "\nAverages");
            let width = rows.iter().map(|(metric, _)| metric.len()).max().unwrap_or(0);
            for (metric, value) in rows {
                let _ = writeln!(out, "  {metric:<width$}  {value:>10}");
            }
        }

        if let Some(series) = charts::project_type_distribution(Some(summary)) {
            let _ = writeln!(out, "\n{}", series.title);
            for line in render_bars(&series) {
                let _ = writeln!(out, "  {line}");
            }
        }

        if let Some(series) = charts::project_averages(Some(summary)) {
            let points: Vec<String> = series
                .labels()
                .into_iter()
                .zip(series.display_values())
                .map(|(label, value)| format!("{label} {value}"))
                .collect();
            let _ = writeln!(out, "\n{}: {}", series.title, points.join(" -> "));
        }
    }

    let _ = writeln!(out, "\nRecent uploads");
    if let Some(notice) = &snapshot.history_notice {
        let _ = writeln!(out, "  {notice}");
    } else if snapshot.history.is_empty() {
        let _ = writeln!(out, "  No uploads yet");
    }
    for (index, entry) in snapshot.history.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} records", index + 1, entry.total_count);
    }

    out
}

/// One line per count, bar length scaled to the largest value.
pub fn render_bars(series: &ChartSeries) -> Vec<String> {
    let max = series.max_value().unwrap_or(0.0);
    let label_width = series
        .points
        .iter()
        .map(|point| point.label.len())
        .max()
        .unwrap_or(0);

    series
        .points
        .iter()
        .map(|point| {
            let length = match point.value {
                Some(value) if max > 0.0 && value.is_finite() && value > 0.0 => {
                    ((value / max) * BAR_WIDTH as f64).round() as usize
                }
                _ => 0,
            };
            format!(
                "{:<label_width$} | {} {}",
                point.label,
                "#".repeat(length),
                charts::format_count(point.value)
            )
        })
        .collect()
}
