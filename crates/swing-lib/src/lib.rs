//! Swing assessment engine
//!
//! This crate provides the core functionality for:
//! - Per-swing kinematic metrics from pose-estimation keypoints
//! - Level-adjusted barrel classification and contact quality summaries
//! - Session aggregation into Anchor / Engine / Whip category scores
//! - Comparison with an athlete's previous assessment
//! - Versioned calibration tables, storage and observability

pub mod calibration;
pub mod comparison;
pub mod contact;
pub mod error;
pub mod kinematics;
pub mod models;
pub mod observability;
pub mod report;
pub mod stats;
pub mod store;
pub mod swing;

#[cfg(test)]
mod test_fixtures;

pub use calibration::{Calibration, ComparisonThresholds, CALIBRATION_VERSION};
pub use comparison::{
    compare_reports, compare_reports_with, ComparisonSummary, MetricComparison, OverallTrend, SessionComparator,
    TrackedMetric, Trend,
};
pub use contact::{
    compute_contact_quality_summary, compute_is_barrel, BarrelClassifier, BarrelResult,
    ContactQualitySummary, ContactSummarizer,
};
pub use error::AnalysisError;
pub use kinematics::{angle_between_three_points, bat_speed, hip_rotation, velocity, Handedness, Joint};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
pub use report::{AssessmentReport, CategoryScore, Insight, Priority, ReportGenerator, Tier};
pub use store::{AssessmentStore, InMemoryStore, SessionExists};
pub use swing::{MetricField, SwingAnalyzer, SwingMetrics};
