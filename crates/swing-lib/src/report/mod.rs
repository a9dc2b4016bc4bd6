//! Multi-swing assessment reports
//!
//! This module provides:
//! - Per-field aggregates and consistency scores across a session's swings
//! - Anchor / Engine / Whip category scores with Motion / Stability /
//!   Sequencing sub-scores
//! - The blended session score, strengths and weaknesses, and a narrative
//! - [`ReportGenerator`], which runs the whole pipeline for a stored session

mod aggregate;
mod categories;
mod generator;
mod insights;
mod narrative;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate_fields, FieldAggregate};
pub use categories::{anchor_score, engine_score, session_consistency, whip_score, CONSISTENCY_FIELDS};
pub use generator::ReportGenerator;
pub use insights::{derive_insights, Insight, Priority};
pub use narrative::{Narrative, Tier};

use crate::comparison::ComparisonSummary;
use crate::contact::ContactQualitySummary;
use crate::models::CompetitionLevel;
use crate::swing::{MetricField, SwingMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One category score and its three sub-scores, each 0-100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: Option<f64>,
    pub motion: Option<f64>,
    pub stability: Option<f64>,
    pub sequencing: Option<f64>,
}

/// A swing left out of aggregation and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedSwing {
    pub swing_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub session_id: String,
    pub athlete_id: String,
    pub generated_at: DateTime<Utc>,
    pub calibration_version: String,
    pub level: CompetitionLevel,
    pub swings_analyzed: usize,
    pub swings_excluded: usize,
    #[serde(default)]
    pub excluded: Vec<ExcludedSwing>,
    pub anchor: CategoryScore,
    pub engine: CategoryScore,
    pub whip: CategoryScore,
    pub consistency_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub tier: Option<Tier>,
    pub aggregates: BTreeMap<MetricField, FieldAggregate>,
    #[serde(default)]
    pub swings: Vec<SwingMetrics>,
    pub contact: ContactQualitySummary,
    pub strengths: Vec<Insight>,
    pub weaknesses: Vec<Insight>,
    pub narrative: Narrative,
    pub comparison: Option<ComparisonSummary>,
}

impl AssessmentReport {
    pub fn aggregate(&self, field: MetricField) -> Option<&FieldAggregate> {
        self.aggregates.get(&field)
    }
}
