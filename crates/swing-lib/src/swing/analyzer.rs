//! Per-swing metric aggregation
//!
//! Turns one [`Swing`] into a [`SwingMetrics`] record:
//! - Load and launch frame detection from hip height
//! - Motion: phase durations, bat-speed proxy, hip rotation, X-factor
//! - Stability: posture and joint angles at launch and impact
//! - Sequencing: kinematic chain peaks, gaps and score
//! - A weighted overall score over whichever components were measurable

use crate::calibration::Calibration;
use crate::error::AnalysisError;
use crate::kinematics::geometry::{
    back_knee_angle, fold_line_angle, front_knee_angle, lead_elbow_angle, line_angle,
    line_separation, rear_elbow_angle, spine_tilt,
};
use crate::kinematics::{bat_speed, hip_rotation, Joint, Segment, SequenceAnalyzer, Side};
use crate::models::{SkeletonFrame, Swing};
use crate::stats::weighted_average;
use crate::swing::metrics::SwingMetrics;
use tracing::debug;

/// Landmarks the analyzer reads; coverage of these drives the confidence
const REQUIRED_JOINTS: [Joint; 13] = [
    Joint::Nose,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

/// Computes per-swing metrics with an injected calibration
pub struct SwingAnalyzer {
    cal: Calibration,
    sequence: SequenceAnalyzer,
}

impl SwingAnalyzer {
    pub fn new(cal: Calibration) -> Self {
        let sequence = SequenceAnalyzer::new(cal.sequence.clone());
        Self { cal, sequence }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    /// Analyze one swing
    ///
    /// Fails only when the swing is structurally unusable. Missing or
    /// low-confidence keypoints leave the affected fields `None`.
    pub fn analyze_swing(&self, swing: &Swing) -> Result<SwingMetrics, AnalysisError> {
        self.validate(swing)?;

        let impact = swing.impact_frame;
        let ms = swing.ms_per_frame();
        let impact_frame = &swing.frames[impact];

        let load = self.detect_load_frame(swing);
        let launch = load.map(|l| self.detect_launch_frame(swing, l));
        let launch_frame = launch.map(|l| &swing.frames[l]);

        let mut m = SwingMetrics {
            swing_id: swing.id.clone(),
            impact_frame: impact,
            load_frame: load,
            launch_frame: launch,
            confidence: confidence(swing),
            ..Default::default()
        };

        // Phase durations
        if let (Some(load), Some(launch)) = (load, launch) {
            m.load_to_launch_ms = Some((launch - load) as f64 * ms);
            if launch <= impact {
                m.launch_to_impact_ms = Some((impact - launch) as f64 * ms);
            }
            m.total_swing_ms = Some(impact.saturating_sub(load) as f64 * ms);
        }

        if let Some(speed) = bat_speed(swing, &self.cal.swing) {
            m.bat_speed_max_mph = Some(speed.max_mph);
            m.bat_speed_avg_mph = Some(speed.avg_mph);
            m.bat_speed_impact_mph = Some(speed.impact_mph);
        }

        if let Some(rotation) = hip_rotation(swing) {
            m.hip_rotation_impact_deg = rotation.at_impact_deg;
            m.peak_hip_rotation_deg = Some(rotation.peak_deg);
        }

        m.x_factor_launch_deg = launch_frame.and_then(x_factor);
        let window_start = load.unwrap_or(0);
        m.x_factor_max_deg = swing.frames[window_start..=impact]
            .iter()
            .filter_map(x_factor)
            .reduce(f64::max);

        self.fill_stability(swing, launch_frame, impact_frame, &mut m);
        self.fill_sequence(swing, &mut m);

        let w = &self.cal.scoring.swing_weights;
        let scoring = &self.cal.scoring;
        m.overall_score = weighted_average(&[
            (m.sequence_score, w.sequence),
            (m.bat_speed_max_mph.map(|v| scoring.bat_speed_mph.score(v)), w.bat_speed),
            (m.total_swing_ms.map(|v| scoring.swing_duration_ms.score(v)), w.duration),
            (m.x_factor_max_deg.map(|v| scoring.x_factor_deg.score(v)), w.x_factor),
        ]);

        debug!(
            swing_id = %swing.id,
            frames = swing.frame_count(),
            load_frame = ?load,
            launch_frame = ?launch,
            overall_score = ?m.overall_score,
            confidence = m.confidence,
            "Analyzed swing"
        );

        Ok(m)
    }

    fn validate(&self, swing: &Swing) -> Result<(), AnalysisError> {
        if swing.frames.is_empty() {
            return Err(AnalysisError::missing_data(&swing.id, "swing has no frames"));
        }
        if !swing.frame_rate.is_finite() || swing.frame_rate <= 0.0 {
            return Err(AnalysisError::invalid_swing(
                &swing.id,
                format!("frame rate must be positive, got {}", swing.frame_rate),
            ));
        }
        if swing.impact_frame >= swing.frames.len() {
            return Err(AnalysisError::invalid_swing(
                &swing.id,
                format!(
                    "impact frame {} outside {} frames",
                    swing.impact_frame,
                    swing.frames.len()
                ),
            ));
        }
        if swing.frames.iter().all(|f| f.usable_count() == 0) {
            return Err(AnalysisError::missing_data(&swing.id, "no usable keypoints"));
        }
        if swing.frames[swing.impact_frame].usable_count() == 0 {
            return Err(AnalysisError::missing_data(
                &swing.id,
                format!("impact frame {} has no usable keypoints", swing.impact_frame),
            ));
        }
        Ok(())
    }

    /// Deepest hip position up to impact, minus the lead-in
    ///
    /// Image y grows downward, so the lowest hips have the largest mean y.
    /// `None` when no frame up to impact shows both hips.
    pub fn detect_load_frame(&self, swing: &Swing) -> Option<usize> {
        let last = swing.impact_frame.min(swing.frames.len().checked_sub(1)?);
        let deepest = swing.frames[..=last]
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.midpoint(Joint::LeftHip, Joint::RightHip).map(|p| (i, p.y)))
            .fold(None, |best: Option<(usize, f64)>, (i, y)| match best {
                Some((_, best_y)) if best_y >= y => best,
                _ => Some((i, y)),
            })?;
        Some(deepest.0.saturating_sub(self.cal.swing.load_lead_in_frames))
    }

    /// Fixed offset after the load, clamped to the last frame
    pub fn detect_launch_frame(&self, swing: &Swing, load: usize) -> usize {
        (load + self.cal.swing.launch_offset_frames).min(swing.frames.len().saturating_sub(1))
    }

    fn fill_stability(
        &self,
        swing: &Swing,
        launch: Option<&SkeletonFrame>,
        impact: &SkeletonFrame,
        m: &mut SwingMetrics,
    ) {
        let hand = swing.handedness;
        let lead = hand.lead_side();
        let rear = hand.rear_side();

        m.spine_tilt_launch_deg = launch.and_then(spine_tilt);
        m.spine_tilt_impact_deg = spine_tilt(impact);
        m.pelvis_angle_launch_deg = launch.and_then(pelvis_angle);
        m.pelvis_angle_impact_deg = pelvis_angle(impact);
        m.shoulder_angle_launch_deg = launch.and_then(shoulder_angle);
        m.shoulder_angle_impact_deg = shoulder_angle(impact);

        m.back_knee_flexion_launch_deg = launch
            .filter(|f| f.has_all(&leg(rear)))
            .map(|f| 180.0 - back_knee_angle(f, hand));
        m.front_knee_angle_launch_deg = launch
            .filter(|f| f.has_all(&leg(lead)))
            .map(|f| front_knee_angle(f, hand));
        m.front_knee_angle_impact_deg =
            Some(impact).filter(|f| f.has_all(&leg(lead))).map(|f| front_knee_angle(f, hand));

        m.lead_elbow_angle_launch_deg = launch
            .filter(|f| f.has_all(&arm(lead)))
            .map(|f| lead_elbow_angle(f, hand));
        m.lead_elbow_angle_impact_deg =
            Some(impact).filter(|f| f.has_all(&arm(lead))).map(|f| lead_elbow_angle(f, hand));
        m.rear_elbow_angle_launch_deg = launch
            .filter(|f| f.has_all(&arm(rear)))
            .map(|f| rear_elbow_angle(f, hand));
        m.rear_elbow_angle_impact_deg =
            Some(impact).filter(|f| f.has_all(&arm(rear))).map(|f| rear_elbow_angle(f, hand));

        let cm_per_unit = self.cal.swing.cm_per_unit;
        m.head_displacement_cm = swing
            .frames
            .iter()
            .find_map(|f| f.point(Joint::Nose))
            .zip(impact.point(Joint::Nose))
            .map(|(stance, contact)| stance.distance(contact) * cm_per_unit);

        m.stride_length_pct_height = swing
            .player_height_cm
            .filter(|h| h.is_finite() && *h > 0.0)
            .zip(impact.point(lead.ankle()).zip(impact.point(rear.ankle())))
            .map(|(height, (front, back))| (front.x - back.x).abs() * cm_per_unit / height * 100.0);
    }

    fn fill_sequence(&self, swing: &Swing, m: &mut SwingMetrics) {
        let Some(seq) = self.sequence.analyze(swing) else {
            debug!(swing_id = %swing.id, "Kinematic sequence unavailable");
            return;
        };

        let pelvis = seq.peak(Segment::Pelvis);
        let torso = seq.peak(Segment::Torso);
        let arm = seq.peak(Segment::Arm);
        let bat = seq.peak(Segment::Bat);

        m.pelvis_peak_velocity_dps = Some(pelvis.peak_velocity_dps);
        m.torso_peak_velocity_dps = Some(torso.peak_velocity_dps);
        m.arm_peak_velocity_dps = Some(arm.peak_velocity_dps);
        m.bat_peak_velocity_dps = Some(bat.peak_velocity_dps);
        m.pelvis_peak_timing_ms = Some(pelvis.timing_ms);
        m.torso_peak_timing_ms = Some(torso.timing_ms);
        m.arm_peak_timing_ms = Some(arm.timing_ms);
        m.bat_peak_timing_ms = Some(bat.timing_ms);
        m.pelvis_torso_gap_ms = Some(seq.pelvis_torso_gap_ms);
        m.torso_arm_gap_ms = Some(seq.torso_arm_gap_ms);
        m.arm_bat_gap_ms = Some(seq.arm_bat_gap_ms);
        m.sequence_order_correct = Some(seq.order_correct);

        let order_max = self.cal.sequence.order_points;
        if order_max > 0.0 {
            m.sequence_order_score = Some(seq.order_points / order_max * 100.0);
        }
        m.sequence_score = Some(seq.score);
    }
}

impl Default for SwingAnalyzer {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

fn leg(side: Side) -> [Joint; 3] {
    [side.hip(), side.knee(), side.ankle()]
}

fn arm(side: Side) -> [Joint; 3] {
    [side.shoulder(), side.elbow(), side.wrist()]
}

fn pelvis_angle(frame: &SkeletonFrame) -> Option<f64> {
    line_angle(frame, Joint::LeftHip, Joint::RightHip).map(fold_line_angle)
}

fn shoulder_angle(frame: &SkeletonFrame) -> Option<f64> {
    line_angle(frame, Joint::LeftShoulder, Joint::RightShoulder).map(fold_line_angle)
}

/// Hip-shoulder separation in one frame
fn x_factor(frame: &SkeletonFrame) -> Option<f64> {
    let pelvis = line_angle(frame, Joint::LeftHip, Joint::RightHip)?;
    let shoulders = line_angle(frame, Joint::LeftShoulder, Joint::RightShoulder)?;
    Some(line_separation(pelvis, shoulders))
}

/// Coverage of the required landmarks times their mean confidence
fn confidence(swing: &Swing) -> f64 {
    let slots = swing.frames.len() * REQUIRED_JOINTS.len();
    if slots == 0 {
        return 0.0;
    }
    let usable: Vec<f64> = swing
        .frames
        .iter()
        .flat_map(|f| REQUIRED_JOINTS.iter().filter_map(move |j| f.keypoint(*j)))
        .map(|k| k.confidence.min(1.0))
        .collect();
    if usable.is_empty() {
        return 0.0;
    }
    let coverage = usable.len() as f64 / slots as f64;
    let mean_confidence = usable.iter().sum::<f64>() / usable.len() as f64;
    coverage * mean_confidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Handedness;
    use crate::models::Keypoint;
    use crate::test_fixtures::SwingBuilder;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_load_and_launch_detection() {
        let swing = SwingBuilder::new().build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        // Hips are deepest at frame 10.
        assert_eq!(m.load_frame, Some(5));
        assert_eq!(m.launch_frame, Some(15));
        assert!(close(m.load_to_launch_ms.unwrap(), 100.0));
        assert!(close(m.launch_to_impact_ms.unwrap(), 300.0));
        assert!(close(m.total_swing_ms.unwrap(), 400.0));
    }

    #[test]
    fn test_load_clamped_at_first_frame() {
        let swing = SwingBuilder::new().hip_dip(Some(2)).build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert_eq!(m.load_frame, Some(0));
        assert_eq!(m.launch_frame, Some(10));
    }

    #[test]
    fn test_launch_clamped_to_last_frame() {
        let swing = SwingBuilder::new()
            .frames(15)
            .impact(12)
            .peaks(4, 6, 8, 10)
            .hip_dip(Some(12))
            .build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert_eq!(m.load_frame, Some(7));
        assert_eq!(m.launch_frame, Some(14));
        // Launch after impact: no launch-to-impact phase.
        assert!(m.launch_to_impact_ms.is_none());
        assert!(close(m.load_to_launch_ms.unwrap(), 70.0));
    }

    #[test]
    fn test_sequence_fields_from_canonical_chain() {
        let swing = SwingBuilder::new().build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert_eq!(m.sequence_order_correct, Some(true));
        assert!(close(m.sequence_order_score.unwrap(), 100.0));
        assert!(close(m.sequence_score.unwrap(), 100.0));
        assert!(close(m.pelvis_peak_timing_ms.unwrap(), 110.0));
        assert!(close(m.bat_peak_timing_ms.unwrap(), -10.0));
        assert!(close(m.pelvis_torso_gap_ms.unwrap(), 40.0));
    }

    #[test]
    fn test_stride_and_head() {
        let swing = SwingBuilder::new().stride(0.22).head_drift(0.059).build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert!(close(m.stride_length_pct_height.unwrap(), 0.22 * 200.0 / 180.0 * 100.0));
        // Nose drifts 0.059 units over 59 frames; impact is frame 45.
        assert!(close(m.head_displacement_cm.unwrap(), 0.045 * 200.0));
    }

    #[test]
    fn test_missing_height_leaves_stride_absent() {
        let swing = SwingBuilder::new().player_height(None).build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert!(m.stride_length_pct_height.is_none());
        assert!(m.head_displacement_cm.is_some());
    }

    #[test]
    fn test_partial_keypoints_degrade_fields() {
        let swing = SwingBuilder::new()
            .missing(Joint::Nose)
            .missing(Joint::RightKnee)
            .build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert!(m.head_displacement_cm.is_none());
        assert!(m.back_knee_flexion_launch_deg.is_none());
        // Front knee is the left one for a right-handed batter.
        assert!(m.front_knee_angle_impact_deg.is_some());
        assert!(m.sequence_score.is_some());
        assert!(m.confidence < 0.9);
    }

    #[test]
    fn test_x_factor_peaks_between_load_and_impact() {
        let swing = SwingBuilder::new().build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        let launch = m.x_factor_launch_deg.unwrap();
        let max = m.x_factor_max_deg.unwrap();
        assert!(launch < 5.0);
        assert!(max > 40.0 && max <= 90.0);
    }

    #[test]
    fn test_overall_score_renormalizes_components() {
        let swing = SwingBuilder::new().build();
        let analyzer = SwingAnalyzer::default();
        let m = analyzer.analyze_swing(&swing).unwrap();
        let s = &analyzer.calibration().scoring;
        let w = &s.swing_weights;
        let expected = weighted_average(&[
            (m.sequence_score, w.sequence),
            (m.bat_speed_max_mph.map(|v| s.bat_speed_mph.score(v)), w.bat_speed),
            (m.total_swing_ms.map(|v| s.swing_duration_ms.score(v)), w.duration),
            (m.x_factor_max_deg.map(|v| s.x_factor_deg.score(v)), w.x_factor),
        ])
        .unwrap();
        assert!(close(m.overall_score.unwrap(), expected));
    }

    #[test]
    fn test_overall_score_without_sequence_or_bat() {
        // No lead arm: no arm/bat segment and no bat speed.
        let swing = SwingBuilder::new()
            .without_bat()
            .missing(Joint::LeftWrist)
            .build();
        let analyzer = SwingAnalyzer::default();
        let m = analyzer.analyze_swing(&swing).unwrap();
        assert!(m.sequence_score.is_none());
        assert!(m.bat_speed_max_mph.is_none());
        let s = &analyzer.calibration().scoring;
        let duration = s.swing_duration_ms.score(m.total_swing_ms.unwrap());
        let x = s.x_factor_deg.score(m.x_factor_max_deg.unwrap());
        let expected = (duration * 0.15 + x * 0.15) / 0.30;
        assert!(close(m.overall_score.unwrap(), expected));
    }

    #[test]
    fn test_left_handed_mirror_keeps_sequence() {
        let swing = SwingBuilder::new().handedness(Handedness::Left).build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert_eq!(m.sequence_order_correct, Some(true));
        assert!(m.stride_length_pct_height.is_some());
        assert!(m.lead_elbow_angle_impact_deg.is_some());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let swing = SwingBuilder::new().head_drift(0.03).build();
        let analyzer = SwingAnalyzer::default();
        let a = analyzer.analyze_swing(&swing).unwrap();
        let b = analyzer.analyze_swing(&swing).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_confidence_reflects_keypoint_scores() {
        let swing = SwingBuilder::new().build();
        let m = SwingAnalyzer::default().analyze_swing(&swing).unwrap();
        assert!(close(m.confidence, 0.9));
    }

    #[test]
    fn test_no_frames_is_missing_data() {
        let swing = Swing {
            frames: Vec::new(),
            ..SwingBuilder::new().build()
        };
        let err = SwingAnalyzer::default().analyze_swing(&swing).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingData { .. }));
        assert!(err.is_swing_level());
    }

    #[test]
    fn test_no_usable_keypoints_is_missing_data() {
        let mut swing = SwingBuilder::new().frames(10).impact(5).build();
        for frame in &mut swing.frames {
            for kp in frame.keypoints.iter_mut().flatten() {
                *kp = Keypoint::new(kp.x, kp.y, 0.1);
            }
        }
        let err = SwingAnalyzer::default().analyze_swing(&swing).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingData { .. }));
    }

    #[test]
    fn test_empty_impact_frame_is_missing_data() {
        let mut swing = SwingBuilder::new().build();
        swing.frames[45] = SkeletonFrame::new(45, None);
        let err = SwingAnalyzer::default().analyze_swing(&swing).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingData { .. }));
    }

    #[test]
    fn test_impact_out_of_range_is_invalid() {
        let swing = SwingBuilder::new().frames(30).impact(30).peaks(10, 14, 18, 22).build();
        let err = SwingAnalyzer::default().analyze_swing(&swing).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSwing { .. }));
    }

    #[test]
    fn test_zero_frame_rate_is_invalid() {
        let swing = SwingBuilder::new().frame_rate(0.0).build();
        let err = SwingAnalyzer::default().analyze_swing(&swing).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSwing { .. }));
    }
}
