//! Ball-flight contact quality
//!
//! This module provides:
//! - Level-adjusted barrel classification of single batted balls
//! - Session summaries of exit velocity, launch angle and barrel rate

mod barrel;
mod summary;

pub use barrel::{compute_is_barrel, BarrelClassifier, BarrelResult, BarrelThresholds};
pub use summary::{
    compute_contact_quality_summary, BattedBallStats, ContactQualitySummary, ContactSummarizer,
    ZoneSummary,
};
