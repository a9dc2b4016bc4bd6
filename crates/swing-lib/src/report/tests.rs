//! Scenario tests for session reports
//!
//! These tests build whole sessions from synthetic swings and run them
//! through the generator, with and without the in-memory store.

#[cfg(test)]
mod scoring_tests {
    use crate::calibration::Calibration;
    use crate::kinematics::Joint;
    use crate::report::{Priority, ReportGenerator, Tier};
    use crate::store::InMemoryStore;
    use crate::swing::MetricField;
    use crate::test_fixtures::{event, foul, sample_swings, session, ts, SwingBuilder};
    use std::sync::Arc;

    fn generator() -> ReportGenerator {
        ReportGenerator::new(Arc::new(InMemoryStore::new()), Calibration::default())
    }

    #[test]
    fn test_report_over_sample_swings() {
        let s = session("s1", "ath", ts(1), sample_swings(4));
        let report = generator().build_report(&s).unwrap();

        assert_eq!(report.swings_analyzed, 4);
        assert_eq!(report.swings_excluded, 0);
        assert_eq!(report.swings.len(), 4);
        assert!(report.anchor.score.is_some());
        assert!(report.engine.score.is_some());
        assert!(report.whip.score.is_some());
        assert!(report.overall_score.is_some());
        assert!(report.tier.is_some());
        assert!(report.comparison.is_none());

        let seq = report.aggregate(MetricField::SequenceScore).unwrap();
        assert_eq!(seq.count, 4);
        assert!((seq.mean - 100.0).abs() < 1e-9);
        assert!((seq.consistency - 100.0).abs() < 1e-9);
        // Strides differ between swings, so stride is not perfectly repeatable.
        assert!(report.aggregate(MetricField::StrideLengthPctHeight).unwrap().consistency < 100.0);
    }

    #[test]
    fn test_failed_swing_is_excluded_not_fatal() {
        let mut swings = sample_swings(2);
        let mut broken = SwingBuilder::new().id("broken").build();
        broken.impact_frame = 500;
        swings.push(broken);
        let s = session("s1", "ath", ts(1), swings);

        let report = generator().build_report(&s).unwrap();
        assert_eq!(report.swings_analyzed, 2);
        assert_eq!(report.swings_excluded, 1);
        assert_eq!(report.excluded[0].swing_id, "broken");
        assert!(report.narrative.headline.contains("1 swing(s) could not be analyzed"));
    }

    #[test]
    fn test_all_swings_excluded_still_reports_contact() {
        let mut broken = SwingBuilder::new().build();
        broken.frames.clear();
        let mut s = session("s1", "ath", ts(1), vec![broken]);
        s.events = vec![event("e1", 95.0, 27.0)];

        let report = generator().build_report(&s).unwrap();
        assert_eq!(report.swings_analyzed, 0);
        assert!(report.aggregates.is_empty());
        assert!(report.anchor.score.is_none());
        assert_eq!(report.contact.total_events, 1);
        assert!(report.overall_score.is_some());
    }

    #[test]
    fn test_empty_session_is_error() {
        let s = session("s1", "ath", ts(1), vec![]);
        let err = generator().build_report(&s).unwrap_err();
        assert!(matches!(err, crate::error::AnalysisError::EmptySession(_)));
    }

    #[test]
    fn test_overall_uses_only_available_inputs() {
        // No lead wrist: no bat speed and no sequence. Only fouls: no barrel rate.
        let swings = (0..3)
            .map(|i| {
                SwingBuilder::new()
                    .id(&format!("s{}", i))
                    .without_bat()
                    .missing(Joint::LeftWrist)
                    .build()
            })
            .collect();
        let mut s = session("s1", "ath", ts(1), swings);
        s.events = vec![foul("f1", 80.0, 40.0), foul("f2", 90.0, 45.0)];

        let generator = generator();
        let report = generator.build_report(&s).unwrap();
        assert!(report.aggregate(MetricField::BatSpeedMaxMph).is_none());
        assert!(report.aggregate(MetricField::SequenceScore).is_none());
        assert!(report.contact.barrel_rate.is_none());

        let cal = generator.calibration();
        let consistency = report.consistency_score.unwrap();
        let ev = cal.scoring.exit_velocity_mph.score(85.0);
        let expected = (consistency * 0.15 + ev * 0.20) / 0.35;
        assert!((report.overall_score.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_earliest_peak_has_largest_timing_in_every_consumer() {
        let canonical = session("c", "ath", ts(1), vec![SwingBuilder::new().build()]);
        let reversed = session(
            "r",
            "ath",
            ts(1),
            vec![SwingBuilder::new().peaks(46, 42, 38, 34).build()],
        );
        let generator = generator();
        let good = generator.build_report(&canonical).unwrap();
        let bad = generator.build_report(&reversed).unwrap();

        // Pelvis peaking 11 frames before impact reads as +110 ms, the ideal.
        let pelvis = good.aggregate(MetricField::PelvisPeakTimingMs).unwrap().mean;
        assert!((pelvis - 110.0).abs() < 1e-9);
        assert_eq!(good.anchor.sequencing, Some(100.0));
        assert!(bad.anchor.sequencing.unwrap() < 10.0);
        assert!(good.engine.motion.unwrap() > bad.engine.motion.unwrap());
        assert!(good.whip.sequencing.unwrap() > bad.whip.sequencing.unwrap());
    }

    #[test]
    fn test_insights_follow_threshold_rules() {
        let mut s = session("s1", "ath", ts(1), sample_swings(3));
        s.events = vec![
            event("a", 70.0, 10.0),
            event("b", 72.0, 5.0),
            event("c", 60.0, 30.0),
        ];
        let report = generator().build_report(&s).unwrap();

        let strength_areas: Vec<&str> = report.strengths.iter().map(|i| i.area.as_str()).collect();
        assert!(strength_areas.contains(&"Kinematic sequence"));
        assert!(report.strengths.iter().all(|i| i.priority.is_none()));

        // Synthetic hands are slow: well under 70 mph.
        let bat = report.weaknesses.iter().find(|i| i.area == "Bat speed").unwrap();
        assert_eq!(bat.priority, Some(Priority::High));
        let ev = report.weaknesses.iter().find(|i| i.area == "Exit velocity").unwrap();
        assert_eq!(ev.priority, Some(Priority::High));
        assert!(report.weaknesses.iter().any(|i| i.area == "Barrel rate"));

        let priorities: Vec<Priority> = report.weaknesses.iter().filter_map(|i| i.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_tier_matches_overall_score() {
        let s = session("s1", "ath", ts(1), sample_swings(2));
        let generator = generator();
        let report = generator.build_report(&s).unwrap();
        let expected = Tier::from_score(report.overall_score.unwrap(), &generator.calibration().scoring.tiers);
        assert_eq!(report.tier, Some(expected));
        assert!(report.narrative.headline.starts_with(expected.as_str()));
    }

    #[test]
    fn test_report_serializes_absent_as_null() {
        let s = session("s1", "ath", ts(1), sample_swings(1));
        let report = generator().build_report(&s).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["contact"]["barrel_rate"].is_null());
        assert!(json["comparison"].is_null());
        assert!(json["aggregates"]["sequence_score"]["mean"].is_number());
    }
}

#[cfg(test)]
mod generation_tests {
    use crate::calibration::Calibration;
    use crate::comparison::OverallTrend;
    use crate::error::AnalysisError;
    use crate::models::SessionStatus;
    use crate::report::ReportGenerator;
    use crate::store::{AssessmentStore, InMemoryStore};
    use crate::test_fixtures::{later, sample_swings, session, ts, SwingBuilder};
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryStore>, ReportGenerator) {
        let store = Arc::new(InMemoryStore::new());
        let generator = ReportGenerator::new(store.clone(), Calibration::default());
        (store, generator)
    }

    #[test]
    fn test_generation_persists_and_completes() {
        let (store, generator) = setup();
        store
            .insert_session(session("s1", "ath", ts(1), sample_swings(3)))
            .unwrap();

        let report = generator.generate_assessment_report("s1").unwrap();
        assert!(report.comparison.is_none());
        assert_eq!(store.report("s1").unwrap().unwrap(), report);
        assert_eq!(store.session("s1").unwrap().unwrap().status, SessionStatus::Completed);
    }

    #[test]
    fn test_regeneration_replaces_report() {
        let (store, generator) = setup();
        store
            .insert_session(session("s1", "ath", ts(1), sample_swings(2)))
            .unwrap();
        generator.generate_assessment_report("s1").unwrap();
        generator.generate_assessment_report("s1").unwrap();
        assert_eq!(store.report_count(), 1);
    }

    #[test]
    fn test_second_session_compares_with_first() {
        let (store, generator) = setup();
        let first_swings = (0..3)
            .map(|i| SwingBuilder::new().id(&format!("a{}", i)).peaks(38, 34, 42, 46).build())
            .collect();
        store
            .insert_session(session("s1", "ath", ts(1), first_swings))
            .unwrap();
        generator.generate_assessment_report("s1").unwrap();

        store
            .insert_session(session("s2", "ath", later(ts(1), 7), sample_swings(3)))
            .unwrap();
        let report = generator.generate_assessment_report("s2").unwrap();

        let comparison = report.comparison.as_ref().unwrap();
        assert_eq!(comparison.previous_session_id, "s1");
        assert_eq!(comparison.overall_trend, OverallTrend::Improving);
        assert!(report.narrative.comparison.is_some());

        let via_comparator = generator
            .comparator()
            .compare_assessments("ath", "s2")
            .unwrap()
            .unwrap();
        assert_eq!(via_comparator.previous_session_id, "s1");
    }

    #[test]
    fn test_empty_session_marks_failed() {
        let (store, generator) = setup();
        store.insert_session(session("s1", "ath", ts(1), vec![])).unwrap();
        let err = generator.generate_assessment_report("s1").unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySession(_)));
        assert_eq!(store.session("s1").unwrap().unwrap().status, SessionStatus::Failed);
        assert!(store.report("s1").unwrap().is_none());
    }

    #[test]
    fn test_unknown_session() {
        let (_store, generator) = setup();
        assert!(matches!(
            generator.generate_assessment_report("nope"),
            Err(AnalysisError::SessionNotFound(_))
        ));
    }
}
