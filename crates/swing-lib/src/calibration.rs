//! Calibration tables for swing scoring
//!
//! All tunable constants (ideal timings, tolerances, normalization ranges,
//! barrel windows, comparison thresholds) live here as immutable, versioned
//! data. Analyzers receive a [`Calibration`] instead of reading literals, so
//! a recalibration is a data change.

use crate::models::CompetitionLevel;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version stamped into every report generated with the default tables
pub const CALIBRATION_VERSION: &str = "2024.1";

/// Deviation-from-ideal scoring rule
///
/// Scores 100 within `tolerance` of `ideal`, then loses `penalty_per_unit`
/// points per unit of additional deviation, floored at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub ideal: f64,
    pub tolerance: f64,
    pub penalty_per_unit: f64,
}

impl Target {
    pub const fn new(ideal: f64, tolerance: f64, penalty_per_unit: f64) -> Self {
        Self {
            ideal,
            tolerance,
            penalty_per_unit,
        }
    }

    pub fn score(&self, value: f64) -> f64 {
        let excess = ((value - self.ideal).abs() - self.tolerance).max(0.0);
        (100.0 - excess * self.penalty_per_unit).clamp(0.0, 100.0)
    }
}

/// Linear normalization of a value onto 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub low: f64,
    pub high: f64,
}

impl ScoreRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn score(&self, value: f64) -> f64 {
        if self.high <= self.low {
            return 0.0;
        }
        ((value - self.low) / (self.high - self.low) * 100.0).clamp(0.0, 100.0)
    }
}

/// Frame windows and unit conversions used by the per-swing extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingCalibration {
    /// Frames on each side of impact used for the bat-speed proxy
    pub bat_speed_window_frames: usize,
    /// Trailing velocity samples averaged into the impact speed
    pub impact_speed_frames: usize,
    /// Frames subtracted from the deepest hip position to find the load
    pub load_lead_in_frames: usize,
    /// Frames between load and launch
    pub launch_offset_frames: usize,
    /// Centimetres represented by one normalized frame unit
    pub cm_per_unit: f64,
    /// Barrel speed relative to lead-hand speed
    pub bat_to_hand_speed_ratio: f64,
}

impl Default for SwingCalibration {
    fn default() -> Self {
        Self {
            bat_speed_window_frames: 5,
            impact_speed_frames: 3,
            load_lead_in_frames: 5,
            launch_offset_frames: 10,
            cm_per_unit: 200.0,
            bat_to_hand_speed_ratio: 3.0,
        }
    }
}

impl SwingCalibration {
    /// Frame windows are non-empty and conversions positive
    pub fn validate(&self) -> Result<()> {
        for (name, frames) in [
            ("bat_speed_window_frames", self.bat_speed_window_frames),
            ("impact_speed_frames", self.impact_speed_frames),
            ("launch_offset_frames", self.launch_offset_frames),
        ] {
            if frames == 0 {
                bail!("swing calibration {} must be at least 1", name);
            }
        }
        for (name, value) in [
            ("cm_per_unit", self.cm_per_unit),
            ("bat_to_hand_speed_ratio", self.bat_to_hand_speed_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("swing calibration {} must be positive, got {}", name, value);
            }
        }
        Ok(())
    }
}

/// Kinematic sequence scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceCalibration {
    /// Points for firing order
    pub order_points: f64,
    /// Points split across the three adjacent timing gaps
    pub timing_points: f64,
    /// Ideal spacing between consecutive segment peaks
    pub gap: Target,
}

impl Default for SequenceCalibration {
    fn default() -> Self {
        Self {
            order_points: 50.0,
            timing_points: 50.0,
            gap: Target::new(40.0, 10.0, 2.0),
        }
    }
}

/// Weights of the per-swing overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingScoreWeights {
    pub sequence: f64,
    pub bat_speed: f64,
    pub duration: f64,
    pub x_factor: f64,
}

/// Weights of the session overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScoreWeights {
    pub bat_speed: f64,
    pub sequence: f64,
    pub consistency: f64,
    pub exit_velocity: f64,
    pub barrel_rate: f64,
}

/// Motion / stability / sequencing split of one category score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub motion: f64,
    pub stability: f64,
    pub sequencing: f64,
}

impl CategoryWeights {
    pub const fn new(motion: f64, stability: f64, sequencing: f64) -> Self {
        Self {
            motion,
            stability,
            sequencing,
        }
    }
}

/// Overall-score cut-offs for the narrative tier label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub elite: f64,
    pub advanced: f64,
    pub intermediate: f64,
}

/// Ideals and ranges used by per-swing and session scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringCalibration {
    pub swing_weights: SwingScoreWeights,
    pub session_weights: SessionScoreWeights,
    pub anchor_weights: CategoryWeights,
    pub engine_weights: CategoryWeights,
    pub whip_weights: CategoryWeights,
    pub bat_speed_mph: ScoreRange,
    pub exit_velocity_mph: ScoreRange,
    pub swing_duration_ms: Target,
    pub x_factor_deg: Target,
    pub load_to_launch_ms: Target,
    pub pelvis_peak_timing_ms: Target,
    pub torso_peak_timing_ms: Target,
    pub bat_peak_timing_ms: Target,
    /// Multiplier applied to the standard deviation in consistency scores
    pub consistency_std_multiplier: f64,
    pub tiers: TierThresholds,
}

impl Default for ScoringCalibration {
    fn default() -> Self {
        Self {
            swing_weights: SwingScoreWeights {
                sequence: 0.40,
                bat_speed: 0.30,
                duration: 0.15,
                x_factor: 0.15,
            },
            session_weights: SessionScoreWeights {
                bat_speed: 0.25,
                sequence: 0.25,
                consistency: 0.15,
                exit_velocity: 0.20,
                barrel_rate: 0.15,
            },
            anchor_weights: CategoryWeights::new(0.4, 0.4, 0.2),
            engine_weights: CategoryWeights::new(0.4, 0.4, 0.2),
            whip_weights: CategoryWeights::new(0.4, 0.3, 0.3),
            bat_speed_mph: ScoreRange::new(60.0, 80.0),
            exit_velocity_mph: ScoreRange::new(70.0, 95.0),
            swing_duration_ms: Target::new(500.0, 0.0, 0.2),
            x_factor_deg: Target::new(50.0, 5.0, 2.0),
            load_to_launch_ms: Target::new(185.0, 20.0, 1.0),
            pelvis_peak_timing_ms: Target::new(110.0, 15.0, 1.0),
            torso_peak_timing_ms: Target::new(70.0, 15.0, 1.0),
            bat_peak_timing_ms: Target::new(0.0, 10.0, 1.0),
            consistency_std_multiplier: 2.0,
            tiers: TierThresholds {
                elite: 85.0,
                advanced: 70.0,
                intermediate: 55.0,
            },
        }
    }
}

impl ScoringCalibration {
    /// `max(0, 100 - k * stddev)`
    pub fn consistency(&self, std_dev: f64) -> f64 {
        (100.0 - self.consistency_std_multiplier * std_dev).max(0.0)
    }
}

/// Inclusive launch-angle window in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleWindow {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl AngleWindow {
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min_deg && angle <= self.max_deg
    }

    pub fn width(&self) -> f64 {
        self.max_deg - self.min_deg
    }
}

/// One step of the barrel table, valid from `min_exit_velocity_mph` upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrelStep {
    pub min_exit_velocity_mph: f64,
    pub window: AngleWindow,
}

/// Minimum barrel exit velocity per competition level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub pro: f64,
    pub college: f64,
    pub high_school: f64,
    pub youth: f64,
}

impl LevelThresholds {
    pub fn for_level(&self, level: CompetitionLevel) -> f64 {
        match level {
            CompetitionLevel::Pro => self.pro,
            CompetitionLevel::College => self.college,
            CompetitionLevel::HighSchool => self.high_school,
            CompetitionLevel::Youth => self.youth,
        }
    }
}

/// Level-adjusted barrel lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrelTable {
    pub levels: LevelThresholds,
    /// Threshold of the scale the step table is expressed in
    pub canonical_threshold_mph: f64,
    /// Steps sorted by exit velocity, windows widening with speed
    pub steps: Vec<BarrelStep>,
}

const fn step(ev: f64, min_deg: f64, max_deg: f64) -> BarrelStep {
    BarrelStep {
        min_exit_velocity_mph: ev,
        window: AngleWindow { min_deg, max_deg },
    }
}

const DEFAULT_BARREL_STEPS: [BarrelStep; 18] = [
    step(98.0, 26.0, 30.0),
    step(99.0, 25.0, 31.0),
    step(100.0, 24.0, 33.0),
    step(101.0, 23.0, 34.0),
    step(102.0, 22.0, 35.0),
    step(103.0, 21.0, 36.0),
    step(104.0, 20.0, 37.0),
    step(105.0, 19.0, 38.0),
    step(106.0, 18.0, 39.0),
    step(107.0, 17.0, 40.0),
    step(108.0, 16.0, 41.0),
    step(109.0, 15.0, 42.0),
    step(110.0, 14.0, 43.0),
    step(111.0, 13.0, 44.0),
    step(112.0, 12.0, 45.0),
    step(113.0, 11.0, 46.0),
    step(114.0, 10.0, 48.0),
    step(115.0, 8.0, 50.0),
];

impl Default for BarrelTable {
    fn default() -> Self {
        Self {
            levels: LevelThresholds {
                pro: 98.0,
                college: 92.0,
                high_school: 92.0,
                youth: 85.0,
            },
            canonical_threshold_mph: 98.0,
            steps: DEFAULT_BARREL_STEPS.to_vec(),
        }
    }
}

impl BarrelTable {
    /// Window for a velocity already projected onto the canonical scale
    pub fn window_for(&self, projected_mph: f64) -> Option<AngleWindow> {
        self.steps
            .iter()
            .take_while(|s| s.min_exit_velocity_mph <= projected_mph)
            .last()
            .map(|s| s.window)
    }

    /// Steps ascend in velocity and never narrow
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            bail!("barrel table has no steps");
        }
        for pair in self.steps.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.min_exit_velocity_mph <= a.min_exit_velocity_mph {
                bail!(
                    "barrel steps must ascend: {} then {}",
                    a.min_exit_velocity_mph,
                    b.min_exit_velocity_mph
                );
            }
            if b.window.width() < a.window.width() {
                bail!(
                    "barrel window narrows at {} mph ({} < {})",
                    b.min_exit_velocity_mph,
                    b.window.width(),
                    a.window.width()
                );
            }
        }
        Ok(())
    }
}

/// Minimum absolute change that counts as an improvement or decline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonThresholds {
    /// 0-100 scores
    pub score_points: f64,
    /// Speeds in mph
    pub speed_mph: f64,
    /// Distances in cm
    pub distance_cm: f64,
    /// Fractions such as barrel rate
    pub rate: f64,
}

impl Default for ComparisonThresholds {
    fn default() -> Self {
        Self {
            score_points: 2.0,
            speed_mph: 1.0,
            distance_cm: 1.0,
            rate: 0.02,
        }
    }
}

/// Complete calibration set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub version: String,
    pub swing: SwingCalibration,
    pub sequence: SequenceCalibration,
    pub scoring: ScoringCalibration,
    pub barrel: BarrelTable,
    pub comparison: ComparisonThresholds,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            version: CALIBRATION_VERSION.to_string(),
            swing: SwingCalibration::default(),
            sequence: SequenceCalibration::default(),
            scoring: ScoringCalibration::default(),
            barrel: BarrelTable::default(),
            comparison: ComparisonThresholds::default(),
        }
    }
}

impl Calibration {
    /// Parse a calibration document; omitted sections keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let cal: Calibration =
            serde_json::from_str(json).context("Failed to parse calibration")?;
        cal.swing.validate()?;
        cal.barrel.validate()?;
        Ok(cal)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read calibration file {}", path.display()))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_triangle() {
        let t = Target::new(40.0, 10.0, 2.0);
        assert_eq!(t.score(40.0), 100.0);
        assert_eq!(t.score(49.9), 100.0);
        assert!((t.score(60.0) - 80.0).abs() < 1e-9);
        assert_eq!(t.score(1000.0), 0.0);
    }

    #[test]
    fn test_range_clamps() {
        let r = ScoreRange::new(60.0, 80.0);
        assert_eq!(r.score(50.0), 0.0);
        assert_eq!(r.score(70.0), 50.0);
        assert_eq!(r.score(90.0), 100.0);
    }

    #[test]
    fn test_default_barrel_table_widens() {
        let table = BarrelTable::default();
        table.validate().unwrap();
        let first = table.window_for(98.0).unwrap();
        assert_eq!((first.min_deg, first.max_deg), (26.0, 30.0));
        let widest = table.window_for(130.0).unwrap();
        assert_eq!((widest.min_deg, widest.max_deg), (8.0, 50.0));
        assert!(table.window_for(97.9).is_none());
    }

    #[test]
    fn test_window_step_lookup_uses_floor() {
        let table = BarrelTable::default();
        let w = table.window_for(100.7).unwrap();
        assert_eq!((w.min_deg, w.max_deg), (24.0, 33.0));
    }

    #[test]
    fn test_narrowing_table_rejected() {
        let mut table = BarrelTable::default();
        table.steps[3].window = AngleWindow {
            min_deg: 27.0,
            max_deg: 29.0,
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cal = Calibration::from_json(r#"{"version":"test","swing":{"cm_per_unit":150.0}}"#)
            .unwrap();
        assert_eq!(cal.version, "test");
        assert_eq!(cal.swing.cm_per_unit, 150.0);
        assert_eq!(cal.swing.launch_offset_frames, 10);
        assert_eq!(cal.barrel, BarrelTable::default());
    }

    #[test]
    fn test_degenerate_swing_windows_rejected() {
        SwingCalibration::default().validate().unwrap();
        for doc in [
            r#"{"swing":{"impact_speed_frames":0}}"#,
            r#"{"swing":{"bat_speed_window_frames":0}}"#,
            r#"{"swing":{"launch_offset_frames":0}}"#,
            r#"{"swing":{"cm_per_unit":0.0}}"#,
            r#"{"swing":{"cm_per_unit":-200.0}}"#,
        ] {
            assert!(Calibration::from_json(doc).is_err(), "{} should be rejected", doc);
        }
        assert!(Calibration::from_json(r#"{"swing":{"load_lead_in_frames":0}}"#).is_ok());
    }

    #[test]
    fn test_consistency_is_bounded() {
        let s = ScoringCalibration::default();
        assert_eq!(s.consistency(0.0), 100.0);
        assert_eq!(s.consistency(10.0), 80.0);
        assert_eq!(s.consistency(80.0), 0.0);
    }
}
