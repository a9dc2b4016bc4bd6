//! Anchor / Engine / Whip category scores
//!
//! Each sub-score averages a handful of terms. A term is either the
//! proximity of a field's session mean to its ideal, a normalized mean, or
//! the field's consistency. Terms whose aggregate is missing are skipped.

use crate::calibration::{Calibration, CategoryWeights, Target};
use crate::report::aggregate::FieldAggregate;
use crate::report::CategoryScore;
use crate::stats::{average_available, weighted_average};
use crate::swing::MetricField;
use std::collections::BTreeMap;

type Aggregates = BTreeMap<MetricField, FieldAggregate>;

/// Fields whose repeatability feeds the session consistency score
pub const CONSISTENCY_FIELDS: [MetricField; 8] = [
    MetricField::LoadToLaunchMs,
    MetricField::TotalSwingMs,
    MetricField::BatSpeedMaxMph,
    MetricField::SequenceScore,
    MetricField::XFactorMaxDeg,
    MetricField::HeadDisplacementCm,
    MetricField::StrideLengthPctHeight,
    MetricField::SpineTiltImpactDeg,
];

fn mean(aggs: &Aggregates, field: MetricField) -> Option<f64> {
    aggs.get(&field).map(|a| a.mean)
}

fn consistency(aggs: &Aggregates, field: MetricField) -> Option<f64> {
    aggs.get(&field).map(|a| a.consistency)
}

fn proximity(aggs: &Aggregates, field: MetricField, target: &Target) -> Option<f64> {
    mean(aggs, field).map(|m| target.score(m))
}

fn combine(
    weights: &CategoryWeights,
    motion: Option<f64>,
    stability: Option<f64>,
    sequencing: Option<f64>,
) -> CategoryScore {
    CategoryScore {
        score: weighted_average(&[
            (motion, weights.motion),
            (stability, weights.stability),
            (sequencing, weights.sequencing),
        ]),
        motion,
        stability,
        sequencing,
    }
}

/// Lower body and ground connection
pub fn anchor_score(aggs: &Aggregates, cal: &Calibration) -> CategoryScore {
    let s = &cal.scoring;
    let motion = average_available(&[
        proximity(aggs, MetricField::LoadToLaunchMs, &s.load_to_launch_ms),
        proximity(aggs, MetricField::PelvisPeakTimingMs, &s.pelvis_peak_timing_ms),
        consistency(aggs, MetricField::LoadToLaunchMs),
    ]);
    let stability = average_available(&[
        consistency(aggs, MetricField::BackKneeFlexionLaunchDeg),
        consistency(aggs, MetricField::FrontKneeAngleImpactDeg),
        consistency(aggs, MetricField::HeadDisplacementCm),
        consistency(aggs, MetricField::StrideLengthPctHeight),
    ]);
    let sequencing = average_available(&[
        mean(aggs, MetricField::SequenceOrderScore),
        proximity(aggs, MetricField::PelvisPeakTimingMs, &s.pelvis_peak_timing_ms),
    ]);
    combine(&s.anchor_weights, motion, stability, sequencing)
}

/// Core and trunk rotation
pub fn engine_score(aggs: &Aggregates, cal: &Calibration) -> CategoryScore {
    let s = &cal.scoring;
    let motion = average_available(&[
        proximity(aggs, MetricField::PelvisTorsoGapMs, &cal.sequence.gap),
        proximity(aggs, MetricField::TorsoPeakTimingMs, &s.torso_peak_timing_ms),
        proximity(aggs, MetricField::XFactorMaxDeg, &s.x_factor_deg),
    ]);
    let stability = average_available(&[
        consistency(aggs, MetricField::SpineTiltLaunchDeg),
        consistency(aggs, MetricField::SpineTiltImpactDeg),
        consistency(aggs, MetricField::PelvisAngleLaunchDeg),
        consistency(aggs, MetricField::PelvisAngleImpactDeg),
    ]);
    let sequencing = average_available(&[
        mean(aggs, MetricField::SequenceOrderScore),
        consistency(aggs, MetricField::PelvisTorsoGapMs),
    ]);
    combine(&s.engine_weights, motion, stability, sequencing)
}

/// Upper body and bat delivery
pub fn whip_score(aggs: &Aggregates, cal: &Calibration) -> CategoryScore {
    let s = &cal.scoring;
    let motion = average_available(&[
        proximity(aggs, MetricField::BatPeakTimingMs, &s.bat_peak_timing_ms),
        mean(aggs, MetricField::BatSpeedMaxMph).map(|v| s.bat_speed_mph.score(v)),
    ]);
    let stability = average_available(&[
        consistency(aggs, MetricField::ShoulderAngleLaunchDeg),
        consistency(aggs, MetricField::ShoulderAngleImpactDeg),
        consistency(aggs, MetricField::LeadElbowAngleImpactDeg),
        consistency(aggs, MetricField::RearElbowAngleImpactDeg),
        consistency(aggs, MetricField::FrontKneeAngleImpactDeg),
    ]);
    let sequencing = average_available(&[
        proximity(aggs, MetricField::TorsoArmGapMs, &cal.sequence.gap),
        proximity(aggs, MetricField::ArmBatGapMs, &cal.sequence.gap),
    ]);
    combine(&s.whip_weights, motion, stability, sequencing)
}

/// Mean consistency over the core repeatability fields
pub fn session_consistency(aggs: &Aggregates) -> Option<f64> {
    let terms: Vec<Option<f64>> = CONSISTENCY_FIELDS
        .iter()
        .map(|f| consistency(aggs, *f))
        .collect();
    average_available(&terms)
}
