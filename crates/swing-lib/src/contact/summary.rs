//! Session-level contact quality
//!
//! Partitions batted-ball events into balls in play, fair balls, fouls,
//! misses and (when zone data exists) in-zone pitches, then summarizes
//! exit velocity, launch angle and barrel rate for each subset.

use crate::contact::barrel::BarrelClassifier;
use crate::models::{BattedBallEvent, CompetitionLevel};
use crate::stats::{mean, population_std_dev, ratio};
use serde::{Deserialize, Serialize};

/// Exit-velocity and launch-angle statistics over balls in play
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattedBallStats {
    pub balls_in_play: usize,
    pub avg_exit_velocity_mph: Option<f64>,
    pub exit_velocity_std_dev_mph: Option<f64>,
    pub max_exit_velocity_mph: Option<f64>,
    pub avg_launch_angle_deg: Option<f64>,
    pub launch_angle_std_dev_deg: Option<f64>,
}

impl BattedBallStats {
    fn from_events<'a>(events: impl Iterator<Item = &'a BattedBallEvent>) -> Self {
        let in_play: Vec<&BattedBallEvent> = events.filter(|e| e.is_ball_in_play()).collect();
        let ev: Vec<f64> = in_play.iter().map(|e| e.exit_velocity_mph).collect();
        let la: Vec<f64> = in_play.iter().map(|e| e.launch_angle_deg).collect();
        Self {
            balls_in_play: in_play.len(),
            avg_exit_velocity_mph: mean(&ev),
            exit_velocity_std_dev_mph: population_std_dev(&ev),
            max_exit_velocity_mph: ev.iter().copied().reduce(f64::max),
            avg_launch_angle_deg: mean(&la),
            launch_angle_std_dev_deg: population_std_dev(&la),
        }
    }
}

/// Statistics for pitches in the strike zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub events: usize,
    pub fair_count: usize,
    pub barrel_count: usize,
    pub barrel_rate: Option<f64>,
    #[serde(flatten)]
    pub batted: BattedBallStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactQualitySummary {
    pub level: CompetitionLevel,
    pub total_events: usize,
    pub fair_count: usize,
    pub foul_count: usize,
    pub miss_count: usize,
    pub barrel_count: usize,
    /// Barrels per fair ball; absent without fair balls
    pub barrel_rate: Option<f64>,
    /// Balls in play at or above the level's barrel velocity
    pub hard_hit_rate: Option<f64>,
    #[serde(flatten)]
    pub batted: BattedBallStats,
    pub fair_pct: Option<f64>,
    pub foul_pct: Option<f64>,
    pub miss_pct: Option<f64>,
    pub zone: Option<ZoneSummary>,
}

/// Builds contact summaries with a given barrel classifier
#[derive(Debug, Clone, Default)]
pub struct ContactSummarizer {
    classifier: BarrelClassifier,
}

impl ContactSummarizer {
    pub fn new(classifier: BarrelClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &BarrelClassifier {
        &self.classifier
    }

    pub fn summarize(&self, events: &[BattedBallEvent], level: CompetitionLevel) -> ContactQualitySummary {
        let total = events.len();
        let fair_count = events.iter().filter(|e| e.is_fair).count();
        let foul_count = events.iter().filter(|e| e.is_foul).count();
        let miss_count = events.iter().filter(|e| e.is_miss).count();
        let barrel_count = self.count_barrels(events.iter(), level);

        let batted = BattedBallStats::from_events(events.iter());
        let hard_hits = events
            .iter()
            .filter(|e| e.is_ball_in_play())
            .filter(|e| e.exit_velocity_mph >= self.classifier.threshold(e.level.unwrap_or(level)))
            .count();

        let zone = events.iter().any(|e| e.in_zone.is_some()).then(|| {
            let in_zone = || events.iter().filter(|e| e.in_zone == Some(true));
            let zone_fair = in_zone().filter(|e| e.is_fair).count();
            let zone_barrels = self.count_barrels(in_zone(), level);
            ZoneSummary {
                events: in_zone().count(),
                fair_count: zone_fair,
                barrel_count: zone_barrels,
                barrel_rate: ratio(zone_barrels, zone_fair),
                batted: BattedBallStats::from_events(in_zone()),
            }
        });

        ContactQualitySummary {
            level,
            total_events: total,
            fair_count,
            foul_count,
            miss_count,
            barrel_count,
            barrel_rate: ratio(barrel_count, fair_count),
            hard_hit_rate: ratio(hard_hits, batted.balls_in_play),
            batted,
            fair_pct: ratio(fair_count, total),
            foul_pct: ratio(foul_count, total),
            miss_pct: ratio(miss_count, total),
            zone,
        }
    }

    fn count_barrels<'a>(
        &self,
        events: impl Iterator<Item = &'a BattedBallEvent>,
        level: CompetitionLevel,
    ) -> usize {
        events
            .filter(|e| self.classifier.classify_event(e, level).is_barrel)
            .count()
    }
}

/// Summarize a session's batted balls with the default barrel table
pub fn compute_contact_quality_summary(
    events: &[BattedBallEvent],
    level: CompetitionLevel,
) -> ContactQualitySummary {
    ContactSummarizer::default().summarize(events, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{event, foul};

    fn miss(id: &str) -> BattedBallEvent {
        event(id, 0.0, 0.0)
    }

    #[test]
    fn test_barrel_rate_absent_without_fair_balls() {
        let events = vec![foul("f1", 88.0, 40.0), miss("m1"), foul("f2", 75.0, 60.0)];
        let s = compute_contact_quality_summary(&events, CompetitionLevel::HighSchool);
        assert_eq!(s.fair_count, 0);
        assert_eq!(s.barrel_count, 0);
        assert!(s.barrel_rate.is_none());
        // Fouls still count as balls in play.
        assert_eq!(s.batted.balls_in_play, 2);
        assert!((s.batted.avg_exit_velocity_mph.unwrap() - 81.5).abs() < 1e-9);
    }

    #[test]
    fn test_event_type_percentages_sum_to_one() {
        let events = vec![
            event("a", 95.0, 27.0),
            event("b", 80.0, 5.0),
            foul("c", 70.0, 50.0),
            miss("d"),
            miss("e"),
        ];
        let s = compute_contact_quality_summary(&events, CompetitionLevel::HighSchool);
        let sum = s.fair_pct.unwrap() + s.foul_pct.unwrap() + s.miss_pct.unwrap();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((s.fair_pct.unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_over_balls_in_play() {
        let events = vec![
            event("a", 90.0, 10.0),
            event("b", 100.0, 30.0),
            miss("c"),
        ];
        let s = compute_contact_quality_summary(&events, CompetitionLevel::Pro);
        assert_eq!(s.batted.balls_in_play, 2);
        assert!((s.batted.avg_exit_velocity_mph.unwrap() - 95.0).abs() < 1e-9);
        assert!((s.batted.exit_velocity_std_dev_mph.unwrap() - 5.0).abs() < 1e-9);
        assert!((s.batted.launch_angle_std_dev_deg.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(s.batted.max_exit_velocity_mph, Some(100.0));
    }

    #[test]
    fn test_barrel_rate_over_fair_balls() {
        let events = vec![
            event("a", 92.0, 28.0),
            event("b", 92.0, 10.0),
            event("c", 85.0, 28.0),
            event("d", 99.0, 26.0),
            foul("e", 99.0, 28.0),
        ];
        let s = compute_contact_quality_summary(&events, CompetitionLevel::HighSchool);
        assert_eq!(s.barrel_count, 2);
        assert!((s.barrel_rate.unwrap() - 0.5).abs() < 1e-12);
        // a, b, d and the foul reach 92 mph.
        assert!((s.hard_hit_rate.unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_empty_session_has_no_statistics() {
        let s = compute_contact_quality_summary(&[], CompetitionLevel::Youth);
        assert_eq!(s.total_events, 0);
        assert!(s.fair_pct.is_none());
        assert!(s.batted.avg_exit_velocity_mph.is_none());
        assert!(s.hard_hit_rate.is_none());
        assert!(s.zone.is_none());
    }

    #[test]
    fn test_zone_block_mirrors_statistics() {
        let mut a = event("a", 92.0, 28.0);
        a.in_zone = Some(true);
        let mut b = event("b", 80.0, 15.0);
        b.in_zone = Some(false);
        let mut c = event("c", 96.0, 20.0);
        c.in_zone = Some(true);
        let s = compute_contact_quality_summary(&[a, b, c], CompetitionLevel::HighSchool);
        let zone = s.zone.unwrap();
        assert_eq!(zone.events, 2);
        assert_eq!(zone.barrel_count, 1);
        assert!((zone.barrel_rate.unwrap() - 0.5).abs() < 1e-12);
        assert!((zone.batted.avg_exit_velocity_mph.unwrap() - 94.0).abs() < 1e-9);
    }

    #[test]
    fn test_absent_values_serialize_as_null() {
        let s = compute_contact_quality_summary(&[miss("m")], CompetitionLevel::Youth);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["barrel_rate"].is_null());
        assert!(json["avg_exit_velocity_mph"].is_null());
        assert_eq!(json["miss_pct"], 1.0);
    }
}
