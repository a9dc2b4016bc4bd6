//! Anatomical keypoint numbering and batter handedness
//!
//! Every geometry function addresses landmarks through [`Joint`], so the
//! index layout of a [`SkeletonFrame`](crate::models::SkeletonFrame) is
//! declared exactly once. The body landmarks follow the COCO-17 order; two
//! optional bat landmarks follow them when the pose pipeline tracks the bat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of body landmarks in the COCO layout
pub const BODY_JOINT_COUNT: usize = 17;

/// Fixed anatomical keypoint indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
    BatKnob = 17,
    BatTip = 18,
}

impl Joint {
    /// All landmarks in index order
    pub const ALL: [Joint; 19] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
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
        Joint::BatKnob,
        Joint::BatTip,
    ];

    /// Position of this landmark in a frame's keypoint list
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftEye => "left_eye",
            Joint::RightEye => "right_eye",
            Joint::LeftEar => "left_ear",
            Joint::RightEar => "right_ear",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::BatKnob => "bat_knob",
            Joint::BatTip => "bat_tip",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical body side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn pick(self, left: Joint, right: Joint) -> Joint {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }

    pub fn shoulder(self) -> Joint {
        self.pick(Joint::LeftShoulder, Joint::RightShoulder)
    }

    pub fn elbow(self) -> Joint {
        self.pick(Joint::LeftElbow, Joint::RightElbow)
    }

    pub fn wrist(self) -> Joint {
        self.pick(Joint::LeftWrist, Joint::RightWrist)
    }

    pub fn hip(self) -> Joint {
        self.pick(Joint::LeftHip, Joint::RightHip)
    }

    pub fn knee(self) -> Joint {
        self.pick(Joint::LeftKnee, Joint::RightKnee)
    }

    pub fn ankle(self) -> Joint {
        self.pick(Joint::LeftAnkle, Joint::RightAnkle)
    }
}

/// Batting side of the athlete
///
/// A right-handed batter faces the pitcher with the left side of the body,
/// so the lead (front) side is the left one. Left-handed batters mirror this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Side facing the pitcher: front leg, lead arm
    pub fn lead_side(self) -> Side {
        match self {
            Handedness::Right => Side::Left,
            Handedness::Left => Side::Right,
        }
    }

    /// Side nearest the catcher: back leg, rear arm
    pub fn rear_side(self) -> Side {
        match self {
            Handedness::Right => Side::Right,
            Handedness::Left => Side::Left,
        }
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "right" | "rhb" => Ok(Handedness::Right),
            "l" | "left" | "lhb" => Ok(Handedness::Left),
            other => Err(format!("unknown handedness '{}'", other)),
        }
    }
}
