//! Synthetic swings for tests
//!
//! Each segment's orientation follows `amplitude * tanh((frame - peak) / width)`,
//! whose central-difference derivative is largest exactly at `peak`, so tests
//! can place segment peaks on chosen frames.

use crate::calibration::{ScoringCalibration, CALIBRATION_VERSION};
use crate::kinematics::{Handedness, Joint};
use crate::models::{
    AssessmentSession, BattedBallEvent, CompetitionLevel, Keypoint, SessionStatus, SkeletonFrame,
    Swing,
};
use crate::report::{AssessmentReport, FieldAggregate};
use crate::swing::MetricField;
use chrono::{DateTime, Duration, TimeZone, Utc};

const PEAK_WIDTH: f64 = 3.0;

pub struct SwingBuilder {
    id: String,
    frames: usize,
    frame_rate: f64,
    impact: usize,
    peaks: [usize; 4],
    hip_dip_frame: Option<usize>,
    handedness: Handedness,
    player_height_cm: Option<f64>,
    with_bat: bool,
    bat_offset_deg: f64,
    stride: f64,
    head_drift: f64,
    missing: Vec<Joint>,
}

impl SwingBuilder {
    pub fn new() -> Self {
        Self {
            id: "swing-1".to_string(),
            frames: 60,
            frame_rate: 100.0,
            impact: 45,
            peaks: [34, 38, 42, 46],
            hip_dip_frame: Some(10),
            handedness: Handedness::Right,
            player_height_cm: Some(180.0),
            with_bat: true,
            bat_offset_deg: 0.0,
            stride: 0.22,
            head_drift: 0.0,
            missing: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn frames(mut self, n: usize) -> Self {
        self.frames = n;
        self
    }

    pub fn frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = fps;
        self
    }

    pub fn impact(mut self, frame: usize) -> Self {
        self.impact = frame;
        self
    }

    /// Peak frames for pelvis, torso, arm and bat
    pub fn peaks(mut self, pelvis: usize, torso: usize, arm: usize, bat: usize) -> Self {
        self.peaks = [pelvis, torso, arm, bat];
        self
    }

    pub fn hip_dip(mut self, frame: Option<usize>) -> Self {
        self.hip_dip_frame = frame;
        self
    }

    pub fn handedness(mut self, hand: Handedness) -> Self {
        self.handedness = hand;
        self
    }

    pub fn player_height(mut self, cm: Option<f64>) -> Self {
        self.player_height_cm = cm;
        self
    }

    pub fn without_bat(mut self) -> Self {
        self.with_bat = false;
        self
    }

    /// Constant rotation of the bat away from the lead forearm
    pub fn bat_offset(mut self, deg: f64) -> Self {
        self.bat_offset_deg = deg;
        self
    }

    /// Horizontal ankle separation in frame units
    pub fn stride(mut self, units: f64) -> Self {
        self.stride = units;
        self
    }

    /// Horizontal nose travel between stance and the last frame
    pub fn head_drift(mut self, units: f64) -> Self {
        self.head_drift = units;
        self
    }

    pub fn missing(mut self, joint: Joint) -> Self {
        self.missing.push(joint);
        self
    }

    pub fn build(self) -> Swing {
        let frames = (0..self.frames).map(|f| self.frame(f)).collect();
        Swing {
            id: self.id,
            frames,
            frame_rate: self.frame_rate,
            impact_frame: self.impact,
            player_height_cm: self.player_height_cm,
            handedness: self.handedness,
        }
    }

    fn frame(&self, f: usize) -> SkeletonFrame {
        let t = |peak: usize| ((f as f64 - peak as f64) / PEAK_WIDTH).tanh();
        let pelvis = (40.0 * t(self.peaks[0])).to_radians();
        let torso = (40.0 * t(self.peaks[1])).to_radians();
        let arm = (60.0 * t(self.peaks[2])).to_radians();
        let bat = (60.0 * t(self.peaks[3]) + self.bat_offset_deg).to_radians();

        let dip = self
            .hip_dip_frame
            .map(|d| 0.03 * (-((f as f64 - d as f64) / 4.0).powi(2)).exp())
            .unwrap_or(0.0);
        let progress = if self.frames > 1 {
            f as f64 / (self.frames - 1) as f64
        } else {
            0.0
        };

        let mut frame = SkeletonFrame::new(f as u32, None);
        let mut put = |joint: Joint, x: f64, y: f64| {
            if !self.missing.contains(&joint) {
                frame.set(joint, Keypoint::new(x, y, 0.9));
            }
        };

        let (hx, hy, hr) = (0.5, 0.6 + dip, 0.08);
        put(Joint::LeftHip, hx - hr * pelvis.cos(), hy - hr * pelvis.sin());
        put(Joint::RightHip, hx + hr * pelvis.cos(), hy + hr * pelvis.sin());

        let (sx, sy, sr) = (0.5, 0.35, 0.1);
        put(Joint::LeftShoulder, sx - sr * torso.cos(), sy - sr * torso.sin());
        put(Joint::RightShoulder, sx + sr * torso.cos(), sy + sr * torso.sin());

        put(Joint::Nose, 0.5 + self.head_drift * progress, 0.25);

        let lead = self.handedness.lead_side();
        let rear = self.handedness.rear_side();
        let (lead_x, rear_x) = match self.handedness {
            Handedness::Right => (0.42, 0.58),
            Handedness::Left => (0.58, 0.42),
        };

        let elbow = (lead_x, 0.45);
        let wrist = (elbow.0 + 0.12 * arm.cos(), elbow.1 + 0.12 * arm.sin());
        put(lead.elbow(), elbow.0, elbow.1);
        put(lead.wrist(), wrist.0, wrist.1);
        put(rear.elbow(), rear_x, 0.46);
        put(rear.wrist(), rear_x - 0.03, 0.40);

        if self.with_bat {
            put(Joint::BatKnob, wrist.0, wrist.1);
            put(Joint::BatTip, wrist.0 + 0.3 * bat.cos(), wrist.1 + 0.3 * bat.sin());
        }

        let half_stride = self.stride / 2.0;
        put(lead.knee(), 0.5 - half_stride * 0.8, 0.76);
        put(lead.ankle(), 0.5 - half_stride, 0.92);
        put(rear.knee(), 0.5 + half_stride * 0.6, 0.77);
        put(rear.ankle(), 0.5 + half_stride, 0.92);

        frame
    }
}

impl Default for SwingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 15, 0, 0).unwrap()
}

pub fn event(id: &str, ev: f64, la: f64) -> BattedBallEvent {
    BattedBallEvent {
        id: id.to_string(),
        swing_id: None,
        exit_velocity_mph: ev,
        launch_angle_deg: la,
        is_fair: ev > 0.0,
        is_foul: false,
        is_miss: ev <= 0.0,
        in_zone: None,
        level: None,
        recorded_at: None,
    }
}

pub fn foul(id: &str, ev: f64, la: f64) -> BattedBallEvent {
    BattedBallEvent {
        is_fair: false,
        is_foul: true,
        ..event(id, ev, la)
    }
}

pub fn session(id: &str, athlete: &str, created_at: DateTime<Utc>, swings: Vec<Swing>) -> AssessmentSession {
    AssessmentSession {
        id: id.to_string(),
        athlete_id: athlete.to_string(),
        created_at,
        status: SessionStatus::Processing,
        level: CompetitionLevel::HighSchool,
        swings,
        events: Vec::new(),
    }
}

/// A few slightly varied well-sequenced swings
pub fn sample_swings(count: usize) -> Vec<Swing> {
    (0..count)
        .map(|i| {
            SwingBuilder::new()
                .id(&format!("swing-{}", i))
                .stride(0.2 + 0.01 * i as f64)
                .build()
        })
        .collect()
}

pub fn later(base: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    base + Duration::days(days)
}

/// Empty report shell for comparison tests
pub fn report(session_id: &str, athlete: &str) -> AssessmentReport {
    AssessmentReport {
        session_id: session_id.to_string(),
        athlete_id: athlete.to_string(),
        generated_at: ts(1),
        calibration_version: CALIBRATION_VERSION.to_string(),
        ..Default::default()
    }
}

/// Set a single-sample aggregate on a report
pub fn set_mean(report: &mut AssessmentReport, field: MetricField, value: f64) {
    if let Some(agg) = FieldAggregate::from_values(&[value], &ScoringCalibration::default()) {
        report.aggregates.insert(field, agg);
    }
}
