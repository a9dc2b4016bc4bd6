//! Core data models for swing assessment
//!
//! Inputs supplied by collaborators: keypoint frames from the pose pipeline,
//! batted-ball events from ball-flight capture and the session that groups
//! them.

use crate::kinematics::geometry::Point;
use crate::kinematics::keypoints::{Handedness, Joint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Keypoints below this confidence are treated as missing
pub const MIN_KEYPOINT_CONFIDENCE: f64 = 0.3;

/// One tracked landmark in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default = "default_confidence", alias = "visibility")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            confidence,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.confidence >= MIN_KEYPOINT_CONFIDENCE
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// All keypoints of one video frame, indexed by [`Joint`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    pub frame_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<f64>,
    pub keypoints: Vec<Option<Keypoint>>,
}

impl SkeletonFrame {
    pub fn new(frame_index: u32, timestamp_ms: Option<f64>) -> Self {
        Self {
            frame_index,
            timestamp_ms,
            keypoints: vec![None; Joint::ALL.len()],
        }
    }

    /// Set a landmark, growing the keypoint list if needed
    pub fn set(&mut self, joint: Joint, keypoint: Keypoint) {
        let idx = joint.index();
        if self.keypoints.len() <= idx {
            self.keypoints.resize(idx + 1, None);
        }
        self.keypoints[idx] = Some(keypoint);
    }

    pub fn with(mut self, joint: Joint, x: f64, y: f64) -> Self {
        self.set(joint, Keypoint::new(x, y, 1.0));
        self
    }

    /// Usable keypoint for a joint
    pub fn keypoint(&self, joint: Joint) -> Option<&Keypoint> {
        self.keypoints
            .get(joint.index())
            .and_then(|k| k.as_ref())
            .filter(|k| k.is_usable())
    }

    /// Position of a joint, `None` when missing or low-confidence
    pub fn point(&self, joint: Joint) -> Option<Point> {
        self.keypoint(joint).map(Keypoint::point)
    }

    pub fn has_all(&self, joints: &[Joint]) -> bool {
        joints.iter().all(|j| self.keypoint(*j).is_some())
    }

    pub fn usable_count(&self) -> usize {
        self.keypoints
            .iter()
            .flatten()
            .filter(|k| k.is_usable())
            .count()
    }

    /// Midpoint of two joints when both are present
    pub fn midpoint(&self, a: Joint, b: Joint) -> Option<Point> {
        Some(self.point(a)?.midpoint(self.point(b)?))
    }
}

/// One batting attempt as produced by the pose pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swing {
    pub id: String,
    pub frames: Vec<SkeletonFrame>,
    pub frame_rate: f64,
    pub impact_frame: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_height_cm: Option<f64>,
    #[serde(default)]
    pub handedness: Handedness,
}

impl Swing {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn ms_per_frame(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Capture time of a frame in seconds
    ///
    /// Uses the producer timestamp when present, otherwise derives it from
    /// the position in the sequence and the frame rate.
    pub fn frame_time_secs(&self, position: usize) -> f64 {
        self.frames
            .get(position)
            .and_then(|f| f.timestamp_ms)
            .filter(|t| t.is_finite())
            .map(|t| t / 1000.0)
            .unwrap_or(position as f64 / self.frame_rate)
    }

    /// Convert a frame count into milliseconds
    pub fn frames_to_ms(&self, frames: f64) -> f64 {
        frames * self.ms_per_frame()
    }
}

/// Competition level used to pick barrel thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompetitionLevel {
    Pro,
    College,
    HighSchool,
    #[default]
    Youth,
}

impl CompetitionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::Pro => "pro",
            CompetitionLevel::College => "college",
            CompetitionLevel::HighSchool => "hs",
            CompetitionLevel::Youth => "youth",
        }
    }
}

impl FromStr for CompetitionLevel {
    type Err = Infallible;

    /// Unknown levels fall back to [`CompetitionLevel::Youth`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "pro" | "mlb" | "milb" | "indy" | "professional" => CompetitionLevel::Pro,
            "college" | "ncaa" | "juco" | "d1" | "d2" | "d3" => CompetitionLevel::College,
            "hs" | "high_school" | "highschool" | "high school" => CompetitionLevel::HighSchool,
            _ => CompetitionLevel::Youth,
        };
        Ok(level)
    }
}

impl From<String> for CompetitionLevel {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl From<CompetitionLevel> for String {
    fn from(level: CompetitionLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ball-contact outcome from ball-flight capture or manual entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattedBallEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing_id: Option<String>,
    /// 0 for a swing-and-miss
    #[serde(default)]
    pub exit_velocity_mph: f64,
    #[serde(default)]
    pub launch_angle_deg: f64,
    #[serde(default)]
    pub is_fair: bool,
    #[serde(default)]
    pub is_foul: bool,
    #[serde(default)]
    pub is_miss: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_zone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CompetitionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl BattedBallEvent {
    pub fn is_ball_in_play(&self) -> bool {
        self.exit_velocity_mph > 0.0
    }
}

/// Lifecycle of an assessment session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

/// All swings and ball events for one athlete on one occasion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: String,
    pub athlete_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub level: CompetitionLevel,
    #[serde(default)]
    pub swings: Vec<Swing>,
    #[serde(default)]
    pub events: Vec<BattedBallEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_confidence_keypoint_is_missing() {
        let mut frame = SkeletonFrame::new(0, None);
        frame.set(Joint::Nose, Keypoint::new(0.5, 0.2, 0.1));
        frame.set(Joint::LeftHip, Keypoint::new(0.4, 0.6, 0.9));
        assert!(frame.point(Joint::Nose).is_none());
        assert!(frame.point(Joint::LeftHip).is_some());
        assert_eq!(frame.usable_count(), 1);
    }

    #[test]
    fn test_short_keypoint_list_reads_as_missing() {
        let frame = SkeletonFrame {
            frame_index: 0,
            timestamp_ms: None,
            keypoints: vec![Some(Keypoint::new(0.5, 0.2, 1.0))],
        };
        assert!(frame.point(Joint::Nose).is_some());
        assert!(frame.point(Joint::RightAnkle).is_none());
    }

    #[test]
    fn test_frame_time_falls_back_to_frame_rate() {
        let swing = Swing {
            id: "s".to_string(),
            frames: vec![
                SkeletonFrame::new(0, None),
                SkeletonFrame::new(1, Some(7.0)),
            ],
            frame_rate: 100.0,
            impact_frame: 0,
            player_height_cm: None,
            handedness: Handedness::Right,
        };
        assert!((swing.frame_time_secs(0) - 0.0).abs() < 1e-12);
        assert!((swing.frame_time_secs(1) - 0.007).abs() < 1e-12);
        assert!((swing.ms_per_frame() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("HS".parse::<CompetitionLevel>().unwrap(), CompetitionLevel::HighSchool);
        assert_eq!("mlb".parse::<CompetitionLevel>().unwrap(), CompetitionLevel::Pro);
        assert_eq!("ncaa".parse::<CompetitionLevel>().unwrap(), CompetitionLevel::College);
        assert_eq!("tee-ball".parse::<CompetitionLevel>().unwrap(), CompetitionLevel::Youth);
    }

    #[test]
    fn test_event_deserializes_with_defaults() {
        let json = r#"{"id":"e1","exit_velocity_mph":92.0,"launch_angle_deg":28.0,"is_fair":true,"level":"hs"}"#;
        let event: BattedBallEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_fair);
        assert!(!event.is_foul);
        assert_eq!(event.level, Some(CompetitionLevel::HighSchool));
        assert!(event.in_zone.is_none());
    }
}
