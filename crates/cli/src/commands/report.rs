//! `swingscore report`
//!
//! Runs the session through an in-memory store. History files are scored
//! first, oldest first, so the comparison sees them as completed sessions.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use swing_lib::{
    AssessmentReport, AssessmentSession, AssessmentStore, Calibration, CategoryScore,
    CompetitionLevel, InMemoryStore, ReportGenerator,
};
use tabled::Tabled;

use super::compare::print_comparison;
use super::contact::summary_rows;
use super::read_json;
use crate::output::{
    color_label, color_score, print_heading, print_json, print_rows, print_success,
    print_warning, OutputFormat,
};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Motion")]
    motion: String,
    #[tabled(rename = "Stability")]
    stability: String,
    #[tabled(rename = "Sequencing")]
    sequencing: String,
}

impl CategoryRow {
    fn new(name: &str, c: &CategoryScore) -> Self {
        Self {
            name: name.to_string(),
            score: color_score(c.score),
            motion: color_score(c.motion),
            stability: color_score(c.stability),
            sequencing: color_score(c.sequencing),
        }
    }
}

#[derive(Tabled)]
struct InsightRow {
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Detail")]
    description: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

/// Read a session file; a session without a level gets `level`
fn read_session(path: &Path, level: CompetitionLevel) -> Result<AssessmentSession> {
    let mut value: serde_json::Value = read_json(path)?;
    if let Some(obj) = value.as_object_mut() {
        obj.entry("level")
            .or_insert_with(|| serde_json::Value::String(level.to_string()));
    }
    serde_json::from_value(value).with_context(|| format!("Invalid session in {}", path.display()))
}

pub fn generate(
    path: &Path,
    history: &[impl AsRef<Path>],
    output: Option<&Path>,
    level: CompetitionLevel,
    calibration: Calibration,
    format: OutputFormat,
) -> Result<()> {
    let session = read_session(path, level)?;

    let mut previous = history
        .iter()
        .map(|p| read_session(p.as_ref(), level))
        .collect::<Result<Vec<_>>>()?;
    if let Some(other) = previous.iter().find(|s| s.athlete_id != session.athlete_id) {
        bail!(
            "history session {} belongs to athlete {}, not {}",
            other.id,
            other.athlete_id,
            session.athlete_id
        );
    }
    previous.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let store = Arc::new(InMemoryStore::new());
    let generator = ReportGenerator::new(store.clone(), calibration);

    for earlier in previous {
        let id = earlier.id.clone();
        store.insert_session(earlier)?;
        if let Err(e) = generator.generate_assessment_report(&id) {
            print_warning(&format!("Skipping history session {}: {}", id, e));
        }
    }

    let session_id = session.id.clone();
    store.insert_session(session)?;
    let report = generator.generate_assessment_report(&session_id)?;

    if let Some(out) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }
    if let Some(out) = output {
        if matches!(format, OutputFormat::Table) {
            print_success(&format!("Report written to {}", out.display()));
        }
    }
    Ok(())
}

fn print_report(report: &AssessmentReport) {
    let tier = report.tier.map(|t| t.as_str()).unwrap_or("Unrated");
    print_success(&format!(
        "Session {} ({}): overall {} [{}]",
        report.session_id,
        report.athlete_id,
        color_score(report.overall_score),
        color_label(tier)
    ));
    println!("{}", report.narrative.headline);

    print_heading("Categories");
    print_rows(vec![
        CategoryRow::new("Anchor", &report.anchor),
        CategoryRow::new("Engine", &report.engine),
        CategoryRow::new("Whip", &report.whip),
    ]);
    println!("Consistency: {}", color_score(report.consistency_score));

    print_heading("Contact");
    print_rows(summary_rows(&report.contact));

    for (title, insights) in [("Strengths", &report.strengths), ("Weaknesses", &report.weaknesses)] {
        if insights.is_empty() {
            continue;
        }
        print_heading(title);
        print_rows(
            insights
                .iter()
                .map(|i| InsightRow {
                    area: i.area.clone(),
                    description: i.description.clone(),
                    priority: i
                        .priority
                        .map(|p| color_label(&p.to_string()))
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect(),
        );
    }

    for excluded in &report.excluded {
        print_warning(&format!("Excluded {}: {}", excluded.swing_id, excluded.reason));
    }

    if let Some(comparison) = &report.comparison {
        print_heading("Progress");
        print_comparison(comparison);
    }
}
