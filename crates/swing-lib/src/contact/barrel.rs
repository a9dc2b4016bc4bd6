//! Level-adjusted barrel classification
//!
//! A batted ball is a barrel when it clears its level's exit-velocity
//! threshold and its launch angle falls inside the window the step table
//! allows for that velocity. Velocities are first projected onto the
//! top-level scale so one table serves every level.

use crate::calibration::{AngleWindow, BarrelTable};
use crate::models::{BattedBallEvent, CompetitionLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrelThresholds {
    pub level: CompetitionLevel,
    pub min_exit_velocity_mph: f64,
    /// Exit velocity on the top-level scale, absent when below threshold
    pub projected_exit_velocity_mph: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrelResult {
    pub is_barrel: bool,
    pub angle_window: Option<AngleWindow>,
    pub thresholds: BarrelThresholds,
}

/// Barrel classifier over a calibration table
#[derive(Debug, Clone, Default)]
pub struct BarrelClassifier {
    table: BarrelTable,
}

impl BarrelClassifier {
    pub fn new(table: BarrelTable) -> Self {
        Self { table }
    }

    pub fn threshold(&self, level: CompetitionLevel) -> f64 {
        self.table.levels.for_level(level)
    }

    pub fn classify(
        &self,
        exit_velocity_mph: f64,
        launch_angle_deg: f64,
        is_fair: bool,
        level: CompetitionLevel,
    ) -> BarrelResult {
        let min_ev = self.threshold(level);
        let mut result = BarrelResult {
            is_barrel: false,
            angle_window: None,
            thresholds: BarrelThresholds {
                level,
                min_exit_velocity_mph: min_ev,
                projected_exit_velocity_mph: None,
            },
        };

        if !is_fair || !exit_velocity_mph.is_finite() || exit_velocity_mph < min_ev {
            return result;
        }

        let projected = exit_velocity_mph - (min_ev - self.table.canonical_threshold_mph);
        result.thresholds.projected_exit_velocity_mph = Some(projected);
        result.angle_window = self.table.window_for(projected);
        result.is_barrel = result
            .angle_window
            .is_some_and(|w| launch_angle_deg.is_finite() && w.contains(launch_angle_deg));
        result
    }

    /// Classify a recorded event; its own level wins over the fallback
    pub fn classify_event(&self, event: &BattedBallEvent, fallback: CompetitionLevel) -> BarrelResult {
        self.classify(
            event.exit_velocity_mph,
            event.launch_angle_deg,
            event.is_fair,
            event.level.unwrap_or(fallback),
        )
    }
}

/// Classify one batted ball with the default barrel table
pub fn compute_is_barrel(
    exit_velocity_mph: f64,
    launch_angle_deg: f64,
    is_fair: bool,
    level: CompetitionLevel,
) -> BarrelResult {
    BarrelClassifier::default().classify(exit_velocity_mph, launch_angle_deg, is_fair, level)
}
