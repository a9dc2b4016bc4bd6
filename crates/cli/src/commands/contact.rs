//! `swingscore contact`

use anyhow::Result;
use std::path::Path;
use swing_lib::{BarrelClassifier, BattedBallEvent, Calibration, CompetitionLevel, ContactQualitySummary, ContactSummarizer};

use super::read_json;
use crate::output::{format_rate, format_value, print_json, print_rows, FieldRow, OutputFormat};

pub fn summarize(
    path: &Path,
    level: CompetitionLevel,
    calibration: Calibration,
    format: OutputFormat,
) -> Result<()> {
    let events: Vec<BattedBallEvent> = read_json(path)?;
    let summary =
        ContactSummarizer::new(BarrelClassifier::new(calibration.barrel)).summarize(&events, level);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_rows(summary_rows(&summary)),
    }
    Ok(())
}

pub fn summary_rows(s: &ContactQualitySummary) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("level", s.level.to_string()),
        FieldRow::new(
            "events (fair / foul / miss)",
            format!("{} ({} / {} / {})", s.total_events, s.fair_count, s.foul_count, s.miss_count),
        ),
        FieldRow::new("balls_in_play", s.batted.balls_in_play.to_string()),
        FieldRow::new("avg_exit_velocity_mph", format_value(s.batted.avg_exit_velocity_mph)),
        FieldRow::new("max_exit_velocity_mph", format_value(s.batted.max_exit_velocity_mph)),
        FieldRow::new("avg_launch_angle_deg", format_value(s.batted.avg_launch_angle_deg)),
        FieldRow::new("barrels", s.barrel_count.to_string()),
        FieldRow::new("barrel_rate", format_rate(s.barrel_rate)),
        FieldRow::new("hard_hit_rate", format_rate(s.hard_hit_rate)),
    ];
    if let Some(zone) = &s.zone {
        rows.push(FieldRow::new("in_zone_events", zone.events.to_string()));
        rows.push(FieldRow::new("in_zone_barrel_rate", format_rate(zone.barrel_rate)));
    }
    rows
}
