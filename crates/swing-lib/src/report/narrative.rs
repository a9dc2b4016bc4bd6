//! Human-readable summary assembled from the numeric results

use crate::calibration::TierThresholds;
use crate::comparison::ComparisonSummary;
use crate::contact::ContactQualitySummary;
use crate::report::{AssessmentReport, CategoryScore};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Elite,
    Advanced,
    Intermediate,
    Developing,
}

impl Tier {
    pub fn from_score(score: f64, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.elite {
            Tier::Elite
        } else if score >= thresholds.advanced {
            Tier::Advanced
        } else if score >= thresholds.intermediate {
            Tier::Intermediate
        } else {
            Tier::Developing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Advanced => "Advanced",
            Tier::Intermediate => "Intermediate",
            Tier::Developing => "Developing",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub headline: String,
    pub categories: Vec<String>,
    pub contact: String,
    pub comparison: Option<String>,
}

impl Narrative {
    /// Assemble the sentences for a scored report
    pub fn for_report(report: &AssessmentReport) -> Self {
        Self {
            headline: headline(
                report.overall_score,
                report.tier,
                report.swings_analyzed,
                report.swings_excluded,
            ),
            categories: vec![
                category_sentence("Anchor", &report.anchor),
                category_sentence("Engine", &report.engine),
                category_sentence("Whip", &report.whip),
            ],
            contact: contact_sentence(&report.contact),
            comparison: report.comparison.as_ref().map(comparison_sentence),
        }
    }

    /// All sentences as one paragraph
    pub fn text(&self) -> String {
        let mut parts = vec![self.headline.clone()];
        parts.extend(self.categories.iter().cloned());
        parts.push(self.contact.clone());
        if let Some(c) = &self.comparison {
            parts.push(c.clone());
        }
        parts.join(" ")
    }
}

fn score_text(v: Option<f64>) -> String {
    v.map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "unavailable".to_string())
}

pub fn headline(overall: Option<f64>, tier: Option<Tier>, swings: usize, excluded: usize) -> String {
    let mut text = match (overall, tier) {
        (Some(score), Some(tier)) => format!(
            "{} swing profile: overall score {:.1} across {} analyzed swing{}.",
            tier,
            score,
            swings,
            if swings == 1 { "" } else { "s" }
        ),
        _ => format!(
            "Not enough data for an overall score across {} analyzed swing{}.",
            swings,
            if swings == 1 { "" } else { "s" }
        ),
    };
    if excluded > 0 {
        text.push_str(&format!(" {} swing(s) could not be analyzed.", excluded));
    }
    text
}

pub fn category_sentence(name: &str, score: &CategoryScore) -> String {
    match score.score {
        Some(total) => format!(
            "{} {:.1} (motion {}, stability {}, sequencing {}).",
            name,
            total,
            score_text(score.motion),
            score_text(score.stability),
            score_text(score.sequencing)
        ),
        None => format!("{} unavailable.", name),
    }
}

pub fn contact_sentence(contact: &ContactQualitySummary) -> String {
    if contact.total_events == 0 {
        return "No batted-ball data recorded.".to_string();
    }
    let ev = contact
        .batted
        .avg_exit_velocity_mph
        .map(|v| format!("average exit velocity {:.1} mph", v))
        .unwrap_or_else(|| "no balls in play".to_string());
    let barrel = contact
        .barrel_rate
        .map(|r| format!("barrel rate {:.1}%", r * 100.0))
        .unwrap_or_else(|| "no fair balls".to_string());
    format!("{} batted-ball events: {}, {}.", contact.total_events, ev, barrel)
}

pub fn comparison_sentence(comparison: &ComparisonSummary) -> String {
    format!(
        "Compared with session {}: {} ({} improved, {} declined).",
        comparison.previous_session_id,
        comparison.overall_trend,
        comparison.improvements,
        comparison.declines
    )
}
