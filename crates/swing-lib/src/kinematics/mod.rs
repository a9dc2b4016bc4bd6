//! Keypoint geometry and kinematic sequence extraction
//!
//! This module provides:
//! - The fixed anatomical keypoint numbering and lead/rear side mapping
//! - Joint angles, planar velocities, bat-speed proxy and hip rotation
//! - Segment angular velocities and kinematic sequence scoring

pub mod geometry;
pub mod keypoints;
mod sequence;

pub use geometry::{
    angle_between_three_points, bat_speed, hip_rotation, velocity, BatSpeed, HipRotation, Point,
    TimedPoint,
};
pub use keypoints::{Handedness, Joint, Side};
pub use sequence::{
    angle_series, angular_velocity, gap_score, KinematicSequence, Segment, SegmentPeak,
    SequenceAnalyzer,
};
