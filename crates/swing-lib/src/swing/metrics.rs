//! Per-swing metrics record
//!
//! One flat record per analyzed swing. Every measurement is optional: a
//! field whose keypoints were unavailable is `None` and serializes as `null`,
//! never as a false zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics for one swing, grouped Motion / Stability / Sequencing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingMetrics {
    pub swing_id: String,
    pub impact_frame: usize,
    pub load_frame: Option<usize>,
    pub launch_frame: Option<usize>,

    // Motion
    pub load_to_launch_ms: Option<f64>,
    pub launch_to_impact_ms: Option<f64>,
    pub total_swing_ms: Option<f64>,
    pub bat_speed_max_mph: Option<f64>,
    pub bat_speed_avg_mph: Option<f64>,
    pub bat_speed_impact_mph: Option<f64>,
    pub hip_rotation_impact_deg: Option<f64>,
    pub peak_hip_rotation_deg: Option<f64>,
    pub x_factor_launch_deg: Option<f64>,
    pub x_factor_max_deg: Option<f64>,

    // Stability
    pub spine_tilt_launch_deg: Option<f64>,
    pub spine_tilt_impact_deg: Option<f64>,
    pub pelvis_angle_launch_deg: Option<f64>,
    pub pelvis_angle_impact_deg: Option<f64>,
    pub shoulder_angle_launch_deg: Option<f64>,
    pub shoulder_angle_impact_deg: Option<f64>,
    pub back_knee_flexion_launch_deg: Option<f64>,
    pub front_knee_angle_launch_deg: Option<f64>,
    pub front_knee_angle_impact_deg: Option<f64>,
    pub lead_elbow_angle_launch_deg: Option<f64>,
    pub lead_elbow_angle_impact_deg: Option<f64>,
    pub rear_elbow_angle_launch_deg: Option<f64>,
    pub rear_elbow_angle_impact_deg: Option<f64>,
    pub head_displacement_cm: Option<f64>,
    pub stride_length_pct_height: Option<f64>,

    // Sequencing
    pub pelvis_peak_velocity_dps: Option<f64>,
    pub torso_peak_velocity_dps: Option<f64>,
    pub arm_peak_velocity_dps: Option<f64>,
    pub bat_peak_velocity_dps: Option<f64>,
    pub pelvis_peak_timing_ms: Option<f64>,
    pub torso_peak_timing_ms: Option<f64>,
    pub arm_peak_timing_ms: Option<f64>,
    pub bat_peak_timing_ms: Option<f64>,
    pub pelvis_torso_gap_ms: Option<f64>,
    pub torso_arm_gap_ms: Option<f64>,
    pub arm_bat_gap_ms: Option<f64>,
    pub sequence_order_correct: Option<bool>,
    /// Firing-order points rescaled to 0-100
    pub sequence_order_score: Option<f64>,
    pub sequence_score: Option<f64>,

    pub overall_score: Option<f64>,
    /// Share of required keypoints that were usable, weighted by confidence
    pub confidence: f64,
}

/// Numeric per-swing fields tracked across a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    LoadToLaunchMs,
    LaunchToImpactMs,
    TotalSwingMs,
    BatSpeedMaxMph,
    BatSpeedAvgMph,
    BatSpeedImpactMph,
    HipRotationImpactDeg,
    PeakHipRotationDeg,
    XFactorLaunchDeg,
    XFactorMaxDeg,
    SpineTiltLaunchDeg,
    SpineTiltImpactDeg,
    PelvisAngleLaunchDeg,
    PelvisAngleImpactDeg,
    ShoulderAngleLaunchDeg,
    ShoulderAngleImpactDeg,
    BackKneeFlexionLaunchDeg,
    FrontKneeAngleLaunchDeg,
    FrontKneeAngleImpactDeg,
    LeadElbowAngleLaunchDeg,
    LeadElbowAngleImpactDeg,
    RearElbowAngleLaunchDeg,
    RearElbowAngleImpactDeg,
    HeadDisplacementCm,
    StrideLengthPctHeight,
    PelvisPeakVelocityDps,
    TorsoPeakVelocityDps,
    ArmPeakVelocityDps,
    BatPeakVelocityDps,
    PelvisPeakTimingMs,
    TorsoPeakTimingMs,
    ArmPeakTimingMs,
    BatPeakTimingMs,
    PelvisTorsoGapMs,
    TorsoArmGapMs,
    ArmBatGapMs,
    SequenceOrderScore,
    SequenceScore,
    OverallScore,
    Confidence,
}

impl MetricField {
    pub const ALL: [MetricField; 40] = [
        MetricField::LoadToLaunchMs,
        MetricField::LaunchToImpactMs,
        MetricField::TotalSwingMs,
        MetricField::BatSpeedMaxMph,
        MetricField::BatSpeedAvgMph,
        MetricField::BatSpeedImpactMph,
        MetricField::HipRotationImpactDeg,
        MetricField::PeakHipRotationDeg,
        MetricField::XFactorLaunchDeg,
        MetricField::XFactorMaxDeg,
        MetricField::SpineTiltLaunchDeg,
        MetricField::SpineTiltImpactDeg,
        MetricField::PelvisAngleLaunchDeg,
        MetricField::PelvisAngleImpactDeg,
        MetricField::ShoulderAngleLaunchDeg,
        MetricField::ShoulderAngleImpactDeg,
        MetricField::BackKneeFlexionLaunchDeg,
        MetricField::FrontKneeAngleLaunchDeg,
        MetricField::FrontKneeAngleImpactDeg,
        MetricField::LeadElbowAngleLaunchDeg,
        MetricField::LeadElbowAngleImpactDeg,
        MetricField::RearElbowAngleLaunchDeg,
        MetricField::RearElbowAngleImpactDeg,
        MetricField::HeadDisplacementCm,
        MetricField::StrideLengthPctHeight,
        MetricField::PelvisPeakVelocityDps,
        MetricField::TorsoPeakVelocityDps,
        MetricField::ArmPeakVelocityDps,
        MetricField::BatPeakVelocityDps,
        MetricField::PelvisPeakTimingMs,
        MetricField::TorsoPeakTimingMs,
        MetricField::ArmPeakTimingMs,
        MetricField::BatPeakTimingMs,
        MetricField::PelvisTorsoGapMs,
        MetricField::TorsoArmGapMs,
        MetricField::ArmBatGapMs,
        MetricField::SequenceOrderScore,
        MetricField::SequenceScore,
        MetricField::OverallScore,
        MetricField::Confidence,
    ];

    /// Read this field from a metrics record
    pub fn value(self, m: &SwingMetrics) -> Option<f64> {
        match self {
            MetricField::LoadToLaunchMs => m.load_to_launch_ms,
            MetricField::LaunchToImpactMs => m.launch_to_impact_ms,
            MetricField::TotalSwingMs => m.total_swing_ms,
            MetricField::BatSpeedMaxMph => m.bat_speed_max_mph,
            MetricField::BatSpeedAvgMph => m.bat_speed_avg_mph,
            MetricField::BatSpeedImpactMph => m.bat_speed_impact_mph,
            MetricField::HipRotationImpactDeg => m.hip_rotation_impact_deg,
            MetricField::PeakHipRotationDeg => m.peak_hip_rotation_deg,
            MetricField::XFactorLaunchDeg => m.x_factor_launch_deg,
            MetricField::XFactorMaxDeg => m.x_factor_max_deg,
            MetricField::SpineTiltLaunchDeg => m.spine_tilt_launch_deg,
            MetricField::SpineTiltImpactDeg => m.spine_tilt_impact_deg,
            MetricField::PelvisAngleLaunchDeg => m.pelvis_angle_launch_deg,
            MetricField::PelvisAngleImpactDeg => m.pelvis_angle_impact_deg,
            MetricField::ShoulderAngleLaunchDeg => m.shoulder_angle_launch_deg,
            MetricField::ShoulderAngleImpactDeg => m.shoulder_angle_impact_deg,
            MetricField::BackKneeFlexionLaunchDeg => m.back_knee_flexion_launch_deg,
            MetricField::FrontKneeAngleLaunchDeg => m.front_knee_angle_launch_deg,
            MetricField::FrontKneeAngleImpactDeg => m.front_knee_angle_impact_deg,
            MetricField::LeadElbowAngleLaunchDeg => m.lead_elbow_angle_launch_deg,
            MetricField::LeadElbowAngleImpactDeg => m.lead_elbow_angle_impact_deg,
            MetricField::RearElbowAngleLaunchDeg => m.rear_elbow_angle_launch_deg,
            MetricField::RearElbowAngleImpactDeg => m.rear_elbow_angle_impact_deg,
            MetricField::HeadDisplacementCm => m.head_displacement_cm,
            MetricField::StrideLengthPctHeight => m.stride_length_pct_height,
            MetricField::PelvisPeakVelocityDps => m.pelvis_peak_velocity_dps,
            MetricField::TorsoPeakVelocityDps => m.torso_peak_velocity_dps,
            MetricField::ArmPeakVelocityDps => m.arm_peak_velocity_dps,
            MetricField::BatPeakVelocityDps => m.bat_peak_velocity_dps,
            MetricField::PelvisPeakTimingMs => m.pelvis_peak_timing_ms,
            MetricField::TorsoPeakTimingMs => m.torso_peak_timing_ms,
            MetricField::ArmPeakTimingMs => m.arm_peak_timing_ms,
            MetricField::BatPeakTimingMs => m.bat_peak_timing_ms,
            MetricField::PelvisTorsoGapMs => m.pelvis_torso_gap_ms,
            MetricField::TorsoArmGapMs => m.torso_arm_gap_ms,
            MetricField::ArmBatGapMs => m.arm_bat_gap_ms,
            MetricField::SequenceOrderScore => m.sequence_order_score,
            MetricField::SequenceScore => m.sequence_score,
            MetricField::OverallScore => m.overall_score,
            MetricField::Confidence => Some(m.confidence),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::LoadToLaunchMs => "load_to_launch_ms",
            MetricField::LaunchToImpactMs => "launch_to_impact_ms",
            MetricField::TotalSwingMs => "total_swing_ms",
            MetricField::BatSpeedMaxMph => "bat_speed_max_mph",
            MetricField::BatSpeedAvgMph => "bat_speed_avg_mph",
            MetricField::BatSpeedImpactMph => "bat_speed_impact_mph",
            MetricField::HipRotationImpactDeg => "hip_rotation_impact_deg",
            MetricField::PeakHipRotationDeg => "peak_hip_rotation_deg",
            MetricField::XFactorLaunchDeg => "x_factor_launch_deg",
            MetricField::XFactorMaxDeg => "x_factor_max_deg",
            MetricField::SpineTiltLaunchDeg => "spine_tilt_launch_deg",
            MetricField::SpineTiltImpactDeg => "spine_tilt_impact_deg",
            MetricField::PelvisAngleLaunchDeg => "pelvis_angle_launch_deg",
            MetricField::PelvisAngleImpactDeg => "pelvis_angle_impact_deg",
            MetricField::ShoulderAngleLaunchDeg => "shoulder_angle_launch_deg",
            MetricField::ShoulderAngleImpactDeg => "shoulder_angle_impact_deg",
            MetricField::BackKneeFlexionLaunchDeg => "back_knee_flexion_launch_deg",
            MetricField::FrontKneeAngleLaunchDeg => "front_knee_angle_launch_deg",
            MetricField::FrontKneeAngleImpactDeg => "front_knee_angle_impact_deg",
            MetricField::LeadElbowAngleLaunchDeg => "lead_elbow_angle_launch_deg",
            MetricField::LeadElbowAngleImpactDeg => "lead_elbow_angle_impact_deg",
            MetricField::RearElbowAngleLaunchDeg => "rear_elbow_angle_launch_deg",
            MetricField::RearElbowAngleImpactDeg => "rear_elbow_angle_impact_deg",
            MetricField::HeadDisplacementCm => "head_displacement_cm",
            MetricField::StrideLengthPctHeight => "stride_length_pct_height",
            MetricField::PelvisPeakVelocityDps => "pelvis_peak_velocity_dps",
            MetricField::TorsoPeakVelocityDps => "torso_peak_velocity_dps",
            MetricField::ArmPeakVelocityDps => "arm_peak_velocity_dps",
            MetricField::BatPeakVelocityDps => "bat_peak_velocity_dps",
            MetricField::PelvisPeakTimingMs => "pelvis_peak_timing_ms",
            MetricField::TorsoPeakTimingMs => "torso_peak_timing_ms",
            MetricField::ArmPeakTimingMs => "arm_peak_timing_ms",
            MetricField::BatPeakTimingMs => "bat_peak_timing_ms",
            MetricField::PelvisTorsoGapMs => "pelvis_torso_gap_ms",
            MetricField::TorsoArmGapMs => "torso_arm_gap_ms",
            MetricField::ArmBatGapMs => "arm_bat_gap_ms",
            MetricField::SequenceOrderScore => "sequence_order_score",
            MetricField::SequenceScore => "sequence_score",
            MetricField::OverallScore => "overall_score",
            MetricField::Confidence => "confidence",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
