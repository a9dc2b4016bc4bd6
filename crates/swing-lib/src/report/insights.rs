//! Strengths and weaknesses from fixed threshold rules

use crate::report::{AssessmentReport, CategoryScore};
use crate::swing::MetricField;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

/// One strength or weakness; strengths carry no priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub area: String,
    pub description: String,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Mean(MetricField),
    Consistency(MetricField),
    ExitVelocity,
    BarrelRatePct,
    Anchor,
    Engine,
    Whip,
}

#[derive(Debug, Clone, Copy)]
enum Band {
    AtLeast(f64),
    AtMost(f64),
    Below(f64),
    Above(f64),
    Within(f64, f64),
}

impl Band {
    fn matches(self, v: f64) -> bool {
        match self {
            Band::AtLeast(t) => v >= t,
            Band::AtMost(t) => v <= t,
            Band::Below(t) => v < t,
            Band::Above(t) => v > t,
            Band::Within(lo, hi) => v >= lo && v <= hi,
        }
    }
}

struct Rule {
    area: &'static str,
    source: Source,
    unit: &'static str,
    strength: Band,
    strength_text: &'static str,
    weakness: Band,
    weakness_text: &'static str,
    priority: Priority,
}

const RULES: &[Rule] = &[
    Rule {
        area: "Bat speed",
        source: Source::Mean(MetricField::BatSpeedMaxMph),
        unit: "mph",
        strength: Band::AtLeast(75.0),
        strength_text: "Elite bat speed",
        weakness: Band::Below(70.0),
        weakness_text: "Bat speed below the competitive range",
        priority: Priority::High,
    },
    Rule {
        area: "Kinematic sequence",
        source: Source::Mean(MetricField::SequenceScore),
        unit: "pts",
        strength: Band::AtLeast(80.0),
        strength_text: "Efficient pelvis-torso-arm-bat sequencing",
        weakness: Band::Below(60.0),
        weakness_text: "Segments fire out of order or with poor spacing",
        priority: Priority::High,
    },
    Rule {
        area: "Head stability",
        source: Source::Mean(MetricField::HeadDisplacementCm),
        unit: "cm",
        strength: Band::AtMost(5.0),
        strength_text: "Quiet head through contact",
        weakness: Band::Above(10.0),
        weakness_text: "Excessive head movement from stance to contact",
        priority: Priority::Medium,
    },
    Rule {
        area: "Hip-shoulder separation",
        source: Source::Mean(MetricField::XFactorMaxDeg),
        unit: "deg",
        strength: Band::Within(40.0, 60.0),
        strength_text: "Strong separation between hips and shoulders",
        weakness: Band::Below(30.0),
        weakness_text: "Hips and shoulders rotate together",
        priority: Priority::Medium,
    },
    Rule {
        area: "Load timing",
        source: Source::Consistency(MetricField::LoadToLaunchMs),
        unit: "pts",
        strength: Band::AtLeast(80.0),
        strength_text: "Repeatable load-to-launch timing",
        weakness: Band::Below(60.0),
        weakness_text: "Load-to-launch timing varies from swing to swing",
        priority: Priority::Medium,
    },
    Rule {
        area: "Exit velocity",
        source: Source::ExitVelocity,
        unit: "mph",
        strength: Band::AtLeast(90.0),
        strength_text: "Hard contact",
        weakness: Band::Below(75.0),
        weakness_text: "Weak average contact",
        priority: Priority::High,
    },
    Rule {
        area: "Barrel rate",
        source: Source::BarrelRatePct,
        unit: "%",
        strength: Band::AtLeast(15.0),
        strength_text: "Frequent barrels",
        weakness: Band::Below(5.0),
        weakness_text: "Few balls squared up",
        priority: Priority::Medium,
    },
    Rule {
        area: "Anchor",
        source: Source::Anchor,
        unit: "pts",
        strength: Band::AtLeast(80.0),
        strength_text: "Stable lower body and ground connection",
        weakness: Band::Below(60.0),
        weakness_text: "Lower body leaks energy",
        priority: Priority::Medium,
    },
    Rule {
        area: "Engine",
        source: Source::Engine,
        unit: "pts",
        strength: Band::AtLeast(80.0),
        strength_text: "Powerful trunk rotation",
        weakness: Band::Below(60.0),
        weakness_text: "Trunk rotation lacks separation or timing",
        priority: Priority::Medium,
    },
    Rule {
        area: "Whip",
        source: Source::Whip,
        unit: "pts",
        strength: Band::AtLeast(80.0),
        strength_text: "Fast, well-timed bat delivery",
        weakness: Band::Below(60.0),
        weakness_text: "Bat delivery is late or inconsistent",
        priority: Priority::Medium,
    },
];

fn category(score: &CategoryScore) -> Option<f64> {
    score.score
}

fn value(source: Source, report: &AssessmentReport) -> Option<f64> {
    let v = match source {
        Source::Mean(field) => report.aggregates.get(&field).map(|a| a.mean),
        Source::Consistency(field) => report.aggregates.get(&field).map(|a| a.consistency),
        Source::ExitVelocity => report.contact.batted.avg_exit_velocity_mph,
        Source::BarrelRatePct => report.contact.barrel_rate.map(|r| r * 100.0),
        Source::Anchor => category(&report.anchor),
        Source::Engine => category(&report.engine),
        Source::Whip => category(&report.whip),
    };
    v.filter(|v| v.is_finite())
}

/// Apply every rule; returns `(strengths, weaknesses)`
///
/// Weaknesses are ordered by priority, rule order breaking ties.
pub fn derive_insights(report: &AssessmentReport) -> (Vec<Insight>, Vec<Insight>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for rule in RULES {
        let Some(v) = value(rule.source, report) else {
            continue;
        };
        if rule.strength.matches(v) {
            strengths.push(Insight {
                area: rule.area.to_string(),
                description: format!("{} ({:.1} {})", rule.strength_text, v, rule.unit),
                priority: None,
            });
        } else if rule.weakness.matches(v) {
            weaknesses.push(Insight {
                area: rule.area.to_string(),
                description: format!("{} ({:.1} {})", rule.weakness_text, v, rule.unit),
                priority: Some(rule.priority),
            });
        }
    }

    weaknesses.sort_by_key(|w| w.priority);
    (strengths, weaknesses)
}
