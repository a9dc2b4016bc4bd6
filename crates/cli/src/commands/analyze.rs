//! `swingscore analyze`

use anyhow::Result;
use std::path::Path;
use swing_lib::{Calibration, MetricField, Swing, SwingAnalyzer};

use super::read_json;
use crate::output::{color_label, color_score, format_value, print_json, print_rows, print_success, FieldRow, OutputFormat};

pub fn analyze_swing(path: &Path, calibration: Calibration, format: OutputFormat) -> Result<()> {
    let swing: Swing = read_json(path)?;
    let metrics = SwingAnalyzer::new(calibration).analyze_swing(&swing)?;

    match format {
        OutputFormat::Json => print_json(&metrics)?,
        OutputFormat::Table => {
            print_success(&format!(
                "Swing {}: overall {} (confidence {:.0}%)",
                metrics.swing_id,
                color_score(metrics.overall_score),
                metrics.confidence * 100.0
            ));
            let mut rows = vec![
                FieldRow::new("impact_frame", metrics.impact_frame.to_string()),
                FieldRow::new(
                    "load_frame",
                    metrics.load_frame.map_or("-".to_string(), |f| f.to_string()),
                ),
                FieldRow::new(
                    "launch_frame",
                    metrics.launch_frame.map_or("-".to_string(), |f| f.to_string()),
                ),
                FieldRow::new(
                    "sequence_order_correct",
                    match metrics.sequence_order_correct {
                        Some(true) => color_label("yes"),
                        Some(false) => color_label("no"),
                        None => "-".to_string(),
                    },
                ),
            ];
            rows.extend(
                MetricField::ALL
                    .iter()
                    .filter(|f| !matches!(f, MetricField::OverallScore | MetricField::Confidence))
                    .map(|f| FieldRow::new(f.as_str(), format_value(f.value(&metrics)))),
            );
            print_rows(rows);
        }
    }
    Ok(())
}
