//! `swingscore compare`

use anyhow::{bail, Result};
use std::path::Path;
use swing_lib::{compare_reports_with, AssessmentReport, ComparisonSummary, ComparisonThresholds};
use tabled::Tabled;

use super::read_json;
use crate::output::{color_label, format_value, print_info, print_json, print_rows, OutputFormat};

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Delta")]
    delta: String,
    #[tabled(rename = "Change")]
    percent_change: String,
    #[tabled(rename = "Trend")]
    trend: String,
}

pub fn compare(
    current: &Path,
    previous: &Path,
    thresholds: &ComparisonThresholds,
    format: OutputFormat,
) -> Result<()> {
    let current: AssessmentReport = read_json(current)?;
    let previous: AssessmentReport = read_json(previous)?;
    if current.athlete_id != previous.athlete_id {
        bail!(
            "reports belong to different athletes ({} vs {})",
            current.athlete_id,
            previous.athlete_id
        );
    }

    let summary = compare_reports_with(&current, &previous, thresholds);
    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_comparison(&summary),
    }
    Ok(())
}

pub fn print_comparison(summary: &ComparisonSummary) {
    print_info(&format!(
        "Against session {}: {} ({} improved, {} declined)",
        summary.previous_session_id,
        color_label(summary.overall_trend.as_str()),
        summary.improvements,
        summary.declines
    ));
    let rows = summary
        .metrics
        .iter()
        .map(|m| ComparisonRow {
            metric: m.metric.to_string(),
            previous: format_value(m.previous),
            current: format_value(m.current),
            delta: m
                .delta
                .map(|d| format!("{:+.1}", d))
                .unwrap_or_else(|| "-".to_string()),
            percent_change: m
                .percent_change
                .map(|p| format!("{:+.1}%", p))
                .unwrap_or_else(|| "-".to_string()),
            trend: color_label(m.trend.as_str()),
        })
        .collect();
    print_rows::<ComparisonRow>(rows);
}
