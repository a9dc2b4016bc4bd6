//! Joint geometry and velocity extraction
//!
//! Pure functions over 2D keypoint positions. Missing keypoints never fail a
//! computation: per-frame joint angles fall back to 0.0 and window-based
//! measurements report `None` when nothing could be measured.

use crate::calibration::SwingCalibration;
use crate::kinematics::keypoints::{Handedness, Joint};
use crate::models::{SkeletonFrame, Swing};
use serde::{Deserialize, Serialize};

/// Centimetres per second to miles per hour
const CM_PER_SEC_TO_MPH: f64 = 0.022_369_4;

/// Position in frame coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Position with a capture time in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedPoint {
    pub point: Point,
    pub time_secs: f64,
}

impl TimedPoint {
    pub fn new(point: Point, time_secs: f64) -> Self {
        Self { point, time_secs }
    }
}

/// Angle at `vertex` between the rays towards `a` and `c`, in degrees
///
/// The cosine is clamped to [-1, 1] before `acos` so floating-point drift on
/// collinear points cannot leave the domain. A zero-length ray yields 0.0.
pub fn angle_between_three_points(a: Point, vertex: Point, c: Point) -> f64 {
    let v1 = (a.x - vertex.x, a.y - vertex.y);
    let v2 = (c.x - vertex.x, c.y - vertex.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < f64::EPSILON || mag2 < f64::EPSILON {
        return 0.0;
    }

    let cos_angle = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Planar speed between two timed points in units per second
///
/// Returns 0.0 when both points share a timestamp.
pub fn velocity(p1: TimedPoint, p2: TimedPoint) -> f64 {
    let dt = (p2.time_secs - p1.time_secs).abs();
    if dt < f64::EPSILON {
        return 0.0;
    }
    p1.point.distance(p2.point) / dt
}

/// Orientation of the line `from -> to` in degrees, in (-180, 180]
pub fn line_angle(frame: &SkeletonFrame, from: Joint, to: Joint) -> Option<f64> {
    let a = frame.point(from)?;
    let b = frame.point(to)?;
    if a.distance(b) < f64::EPSILON {
        return None;
    }
    Some((b.y - a.y).atan2(b.x - a.x).to_degrees())
}

/// Wrap an angle difference into [-180, 180]
pub fn wrap_degrees(delta: f64) -> f64 {
    let mut d = delta % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

/// Fold a line orientation into (-90, 90]
///
/// A line has no direction, so 170° and -10° describe the same tilt.
pub fn fold_line_angle(angle: f64) -> f64 {
    let mut a = wrap_degrees(angle);
    if a > 90.0 {
        a -= 180.0;
    } else if a <= -90.0 {
        a += 180.0;
    }
    a
}

/// Unsigned angle between two lines in [0, 90]
pub fn line_separation(a: f64, b: f64) -> f64 {
    fold_line_angle(a - b).abs()
}

/// Angle at the middle joint of a triple, 0.0 when any keypoint is missing
pub fn joint_angle(frame: &SkeletonFrame, a: Joint, vertex: Joint, c: Joint) -> f64 {
    match (frame.point(a), frame.point(vertex), frame.point(c)) {
        (Some(a), Some(v), Some(c)) => angle_between_three_points(a, v, c),
        _ => 0.0,
    }
}

/// Hip-knee-ankle angle of the front leg
pub fn front_knee_angle(frame: &SkeletonFrame, hand: Handedness) -> f64 {
    let side = hand.lead_side();
    joint_angle(frame, side.hip(), side.knee(), side.ankle())
}

/// Hip-knee-ankle angle of the back leg
pub fn back_knee_angle(frame: &SkeletonFrame, hand: Handedness) -> f64 {
    let side = hand.rear_side();
    joint_angle(frame, side.hip(), side.knee(), side.ankle())
}

/// Shoulder-elbow-wrist angle of the lead arm
pub fn lead_elbow_angle(frame: &SkeletonFrame, hand: Handedness) -> f64 {
    let side = hand.lead_side();
    joint_angle(frame, side.shoulder(), side.elbow(), side.wrist())
}

/// Shoulder-elbow-wrist angle of the rear arm
pub fn rear_elbow_angle(frame: &SkeletonFrame, hand: Handedness) -> f64 {
    let side = hand.rear_side();
    joint_angle(frame, side.shoulder(), side.elbow(), side.wrist())
}

/// Tilt of the hip-midpoint to shoulder-midpoint vector away from vertical
pub fn spine_tilt(frame: &SkeletonFrame) -> Option<f64> {
    let hips = frame.midpoint(Joint::LeftHip, Joint::RightHip)?;
    let shoulders = frame.midpoint(Joint::LeftShoulder, Joint::RightShoulder)?;
    // Straight up in image coordinates.
    let up = Point::new(hips.x, hips.y - 1.0);
    if hips.distance(shoulders) < f64::EPSILON {
        return None;
    }
    Some(angle_between_three_points(up, hips, shoulders))
}

/// Bat-speed proxy around impact, in mph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatSpeed {
    pub max_mph: f64,
    pub avg_mph: f64,
    /// Mean of the final velocities of the window, closest to contact
    pub impact_mph: f64,
}

/// Measure lead-wrist speed over the frames around impact
///
/// Consecutive frames where the wrist is usable in both produce one velocity
/// sample. Frame-coordinate speed is scaled to centimetres, converted to mph
/// and multiplied by the hand-to-barrel lever ratio.
pub fn bat_speed(swing: &Swing, cal: &SwingCalibration) -> Option<BatSpeed> {
    if swing.frames.is_empty() {
        return None;
    }
    let wrist = swing.handedness.lead_side().wrist();
    let last = swing.frames.len() - 1;
    let start = swing.impact_frame.saturating_sub(cal.bat_speed_window_frames);
    let end = (swing.impact_frame + cal.bat_speed_window_frames).min(last);

    let mut speeds = Vec::new();
    for i in start..end {
        let (Some(p1), Some(p2)) = (swing.frames[i].point(wrist), swing.frames[i + 1].point(wrist))
        else {
            continue;
        };
        let units_per_sec = velocity(
            TimedPoint::new(p1, swing.frame_time_secs(i)),
            TimedPoint::new(p2, swing.frame_time_secs(i + 1)),
        );
        speeds.push(units_per_sec * cal.cm_per_unit * CM_PER_SEC_TO_MPH * cal.bat_to_hand_speed_ratio);
    }

    if speeds.is_empty() {
        return None;
    }

    let max_mph = speeds.iter().copied().fold(f64::MIN, f64::max);
    let avg_mph = speeds.iter().sum::<f64>() / speeds.len() as f64;
    let tail = &speeds[speeds.len().saturating_sub(cal.impact_speed_frames)..];
    let impact_mph = tail.iter().sum::<f64>() / tail.len() as f64;

    Some(BatSpeed {
        max_mph,
        avg_mph,
        impact_mph,
    })
}

/// Hip-line rotation relative to the stance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HipRotation {
    pub at_impact_deg: Option<f64>,
    /// Largest rotation seen in any frame, which may fall before or after impact
    pub peak_deg: f64,
}

/// Compare the hip line of every frame with the first frame that has both hips
pub fn hip_rotation(swing: &Swing) -> Option<HipRotation> {
    let angles: Vec<Option<f64>> = swing
        .frames
        .iter()
        .map(|f| line_angle(f, Joint::LeftHip, Joint::RightHip))
        .collect();

    let baseline = angles.iter().flatten().next().copied()?;
    let peak_deg = angles
        .iter()
        .flatten()
        .map(|a| wrap_degrees(a - baseline).abs())
        .fold(0.0, f64::max);
    let at_impact_deg = angles
        .get(swing.impact_frame)
        .copied()
        .flatten()
        .map(|a| wrap_degrees(a - baseline).abs());

    Some(HipRotation {
        at_impact_deg,
        peak_deg,
    })
}
