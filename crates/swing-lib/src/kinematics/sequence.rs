//! Kinematic sequence analysis
//!
//! Tracks four body segments (pelvis, torso, arm, bat) through a swing,
//! finds when each reaches its peak angular velocity and scores how closely
//! the firing order and spacing match the pelvis -> torso -> arm -> bat chain.
//!
//! Peak timings are expressed as milliseconds *before* impact:
//! `(impact_frame - peak_frame) * ms_per_frame`. A larger value therefore
//! means an earlier peak, and the observed order is obtained by sorting the
//! timings in descending order.

use crate::calibration::SequenceCalibration;
use crate::kinematics::geometry::line_angle;
use crate::kinematics::keypoints::{Handedness, Joint};
use crate::models::{SkeletonFrame, Swing};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotating body segment in the kinematic chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Pelvis,
    Torso,
    Arm,
    Bat,
}

impl Segment {
    /// Canonical firing order
    pub const CHAIN: [Segment; 4] = [Segment::Pelvis, Segment::Torso, Segment::Arm, Segment::Bat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Pelvis => "pelvis",
            Segment::Torso => "torso",
            Segment::Arm => "arm",
            Segment::Bat => "bat",
        }
    }

    /// Orientation of the segment in one frame
    ///
    /// The bat is the knob-to-tip line. Swings that never track the bat are
    /// handled by [`angle_series`], which substitutes the lead forearm.
    pub fn angle(&self, frame: &SkeletonFrame, hand: Handedness) -> Option<f64> {
        let lead = hand.lead_side();
        match self {
            Segment::Pelvis => line_angle(frame, Joint::LeftHip, Joint::RightHip),
            Segment::Torso => line_angle(frame, Joint::LeftShoulder, Joint::RightShoulder),
            Segment::Arm => line_angle(frame, lead.elbow(), lead.wrist()),
            Segment::Bat => line_angle(frame, Joint::BatKnob, Joint::BatTip),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Peak angular velocity of one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPeak {
    pub segment: Segment,
    /// Degrees per second, absolute
    pub peak_velocity_dps: f64,
    pub peak_frame: usize,
    /// Milliseconds before impact (negative after impact)
    pub timing_ms: f64,
}

/// Result of analyzing the kinematic chain of one swing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicSequence {
    /// Peaks in canonical chain order
    pub peaks: [SegmentPeak; 4],
    /// Segments sorted from earliest to latest peak
    pub observed_order: [Segment; 4],
    pub order_correct: bool,
    /// Points awarded for firing order (0 to `order_points`)
    pub order_points: f64,
    /// Points awarded for the three timing gaps (0 to `timing_points`)
    pub timing_points: f64,
    pub pelvis_torso_gap_ms: f64,
    pub torso_arm_gap_ms: f64,
    pub arm_bat_gap_ms: f64,
    /// Total sequence score, 0-100
    pub score: f64,
}

impl KinematicSequence {
    pub fn peak(&self, segment: Segment) -> &SegmentPeak {
        match segment {
            Segment::Pelvis => &self.peaks[0],
            Segment::Torso => &self.peaks[1],
            Segment::Arm => &self.peaks[2],
            Segment::Bat => &self.peaks[3],
        }
    }

    pub fn gaps(&self) -> [f64; 3] {
        [self.pelvis_torso_gap_ms, self.torso_arm_gap_ms, self.arm_bat_gap_ms]
    }
}

/// Per-frame orientation of a segment
///
/// The series is unwrapped so a line crossing ±180° does not produce a
/// spurious jump. Frames without the segment's keypoints repeat the previous
/// angle (the first usable angle is back-filled), which contributes no
/// rotation. Returns `None` when no frame has the segment.
///
/// The bat source is chosen once per swing: the knob-to-tip line when any
/// frame tracks it, otherwise the lead forearm for every frame.
pub fn angle_series(swing: &Swing, segment: Segment) -> Option<Vec<f64>> {
    let source = match segment {
        Segment::Bat if !tracks_bat(swing) => Segment::Arm,
        other => other,
    };
    let raw: Vec<Option<f64>> = swing
        .frames
        .iter()
        .map(|f| source.angle(f, swing.handedness))
        .collect();

    let first = raw.iter().flatten().next().copied()?;
    let mut series = Vec::with_capacity(raw.len());
    let mut prev_raw = first;
    let mut prev_unwrapped = first;
    for angle in raw {
        if let Some(a) = angle {
            let mut step = a - prev_raw;
            while step > 180.0 {
                step -= 360.0;
            }
            while step < -180.0 {
                step += 360.0;
            }
            prev_unwrapped += step;
            prev_raw = a;
        }
        series.push(prev_unwrapped);
    }
    Some(series)
}

/// Whether any frame carries both bat landmarks
pub fn tracks_bat(swing: &Swing) -> bool {
    swing
        .frames
        .iter()
        .any(|f| line_angle(f, Joint::BatKnob, Joint::BatTip).is_some())
}

/// Central-difference derivative of an angle series in degrees per second
///
/// The two boundary samples repeat their nearest interior neighbour. Needs
/// at least three samples.
pub fn angular_velocity(angles: &[f64], frame_interval_secs: f64) -> Option<Vec<f64>> {
    let n = angles.len();
    if n < 3 || frame_interval_secs <= 0.0 {
        return None;
    }
    let mut omega = vec![0.0; n];
    for i in 1..n - 1 {
        omega[i] = (angles[i + 1] - angles[i - 1]) / (2.0 * frame_interval_secs);
    }
    omega[0] = omega[1];
    omega[n - 1] = omega[n - 2];
    Some(omega)
}

/// Triangular proximity score for one timing gap
pub fn gap_score(gap_ms: f64, cal: &SequenceCalibration) -> f64 {
    cal.gap.score(gap_ms)
}

/// Analyzes the pelvis -> torso -> arm -> bat chain
pub struct SequenceAnalyzer {
    cal: SequenceCalibration,
}

impl SequenceAnalyzer {
    pub fn new(cal: SequenceCalibration) -> Self {
        Self { cal }
    }

    /// Locate the peak of one segment
    pub fn segment_peak(&self, swing: &Swing, segment: Segment) -> Option<SegmentPeak> {
        let angles = angle_series(swing, segment)?;
        let omega = angular_velocity(&angles, swing.frame_interval_secs())?;

        let (peak_frame, peak_velocity_dps) = omega
            .iter()
            .map(|w| w.abs())
            .enumerate()
            .fold((0usize, f64::MIN), |best, (i, w)| if w > best.1 { (i, w) } else { best });

        let timing_ms = swing.frames_to_ms(swing.impact_frame as f64 - peak_frame as f64);
        Some(SegmentPeak {
            segment,
            peak_velocity_dps,
            peak_frame,
            timing_ms,
        })
    }

    /// Analyze all four segments; `None` unless every segment is measurable
    pub fn analyze(&self, swing: &Swing) -> Option<KinematicSequence> {
        let peaks = [
            self.segment_peak(swing, Segment::Pelvis)?,
            self.segment_peak(swing, Segment::Torso)?,
            self.segment_peak(swing, Segment::Arm)?,
            self.segment_peak(swing, Segment::Bat)?,
        ];
        Some(self.score_peaks(peaks))
    }

    /// Score a set of peaks given in canonical chain order
    pub fn score_peaks(&self, peaks: [SegmentPeak; 4]) -> KinematicSequence {
        let mut sorted = peaks;
        // Stable sort keeps canonical order on ties.
        sorted.sort_by(|a, b| {
            b.timing_ms
                .partial_cmp(&a.timing_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let observed_order = sorted.map(|p| p.segment);

        let in_place = observed_order
            .iter()
            .zip(Segment::CHAIN.iter())
            .filter(|(observed, canonical)| observed == canonical)
            .count();
        let order_correct = in_place == Segment::CHAIN.len();
        let order_points = if order_correct {
            self.cal.order_points
        } else {
            self.cal.order_points / Segment::CHAIN.len() as f64 * in_place as f64
        };

        let pelvis_torso_gap_ms = peaks[0].timing_ms - peaks[1].timing_ms;
        let torso_arm_gap_ms = peaks[1].timing_ms - peaks[2].timing_ms;
        let arm_bat_gap_ms = peaks[2].timing_ms - peaks[3].timing_ms;
        let gaps = [pelvis_torso_gap_ms, torso_arm_gap_ms, arm_bat_gap_ms];
        let timing_points = gaps
            .iter()
            .map(|g| gap_score(*g, &self.cal) / 100.0 * self.cal.timing_points / gaps.len() as f64)
            .sum::<f64>();

        KinematicSequence {
            peaks,
            observed_order,
            order_correct,
            order_points,
            timing_points,
            pelvis_torso_gap_ms,
            torso_arm_gap_ms,
            arm_bat_gap_ms,
            score: order_points + timing_points,
        }
    }
}

impl Default for SequenceAnalyzer {
    fn default() -> Self {
        Self::new(SequenceCalibration::default())
    }
}
