//! `swingscore barrel`

use anyhow::Result;
use colored::Colorize;
use swing_lib::{BarrelClassifier, Calibration, CompetitionLevel};

use crate::output::{format_value, print_json, print_rows, FieldRow, OutputFormat};

pub fn classify(
    exit_velocity_mph: f64,
    launch_angle_deg: f64,
    is_fair: bool,
    level: CompetitionLevel,
    calibration: Calibration,
    format: OutputFormat,
) -> Result<()> {
    let result = BarrelClassifier::new(calibration.barrel).classify(
        exit_velocity_mph,
        launch_angle_deg,
        is_fair,
        level,
    );

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            let verdict = if result.is_barrel {
                "BARREL".green().bold().to_string()
            } else {
                "not a barrel".red().to_string()
            };
            println!(
                "{:.1} mph at {:.1}° ({}): {}",
                exit_velocity_mph, launch_angle_deg, level, verdict
            );
            let window = result
                .angle_window
                .map(|w| format!("{:.0}° to {:.0}°", w.min_deg, w.max_deg))
                .unwrap_or_else(|| "-".to_string());
            print_rows(vec![
                FieldRow::new("fair", is_fair.to_string()),
                FieldRow::new(
                    "min_exit_velocity_mph",
                    format!("{:.1}", result.thresholds.min_exit_velocity_mph),
                ),
                FieldRow::new(
                    "projected_exit_velocity_mph",
                    format_value(result.thresholds.projected_exit_velocity_mph),
                ),
                FieldRow::new("launch_angle_window", window),
            ]);
        }
    }
    Ok(())
}
