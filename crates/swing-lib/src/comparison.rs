//! Session-over-session progress
//!
//! Compares a fixed set of headline metrics between a report and the report
//! of the athlete's previous completed session. Having no earlier session is
//! a normal outcome, not an error.

use crate::calibration::ComparisonThresholds;
use crate::error::AnalysisError;
use crate::models::AssessmentSession;
use crate::observability::{EngineMetrics, StructuredLogger};
use crate::report::AssessmentReport;
use crate::stats::average_available;
use crate::store::AssessmentStore;
use crate::swing::MetricField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedMetric {
    OverallScore,
    Anchor,
    Engine,
    Whip,
    BatSpeed,
    HeadStability,
    OverallStability,
    SequenceScore,
    ExitVelocity,
    BarrelRate,
}

impl TrackedMetric {
    pub const ALL: [TrackedMetric; 10] = [
        TrackedMetric::OverallScore,
        TrackedMetric::Anchor,
        TrackedMetric::Engine,
        TrackedMetric::Whip,
        TrackedMetric::BatSpeed,
        TrackedMetric::HeadStability,
        TrackedMetric::OverallStability,
        TrackedMetric::SequenceScore,
        TrackedMetric::ExitVelocity,
        TrackedMetric::BarrelRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedMetric::OverallScore => "overall_score",
            TrackedMetric::Anchor => "anchor",
            TrackedMetric::Engine => "engine",
            TrackedMetric::Whip => "whip",
            TrackedMetric::BatSpeed => "bat_speed",
            TrackedMetric::HeadStability => "head_stability",
            TrackedMetric::OverallStability => "overall_stability",
            TrackedMetric::SequenceScore => "sequence_score",
            TrackedMetric::ExitVelocity => "exit_velocity",
            TrackedMetric::BarrelRate => "barrel_rate",
        }
    }

    /// Head stability is measured as displacement, so smaller is better
    pub fn lower_is_better(&self) -> bool {
        matches!(self, TrackedMetric::HeadStability)
    }

    pub fn threshold(&self, t: &ComparisonThresholds) -> f64 {
        match self {
            TrackedMetric::BatSpeed | TrackedMetric::ExitVelocity => t.speed_mph,
            TrackedMetric::HeadStability => t.distance_cm,
            TrackedMetric::BarrelRate => t.rate,
            _ => t.score_points,
        }
    }

    pub fn value(&self, report: &AssessmentReport) -> Option<f64> {
        let field_mean = |f: MetricField| report.aggregates.get(&f).map(|a| a.mean);
        let v = match self {
            TrackedMetric::OverallScore => report.overall_score,
            TrackedMetric::Anchor => report.anchor.score,
            TrackedMetric::Engine => report.engine.score,
            TrackedMetric::Whip => report.whip.score,
            TrackedMetric::BatSpeed => field_mean(MetricField::BatSpeedMaxMph),
            TrackedMetric::HeadStability => field_mean(MetricField::HeadDisplacementCm),
            TrackedMetric::OverallStability => average_available(&[
                report.anchor.stability,
                report.engine.stability,
                report.whip.stability,
            ]),
            TrackedMetric::SequenceScore => field_mean(MetricField::SequenceScore),
            TrackedMetric::ExitVelocity => report.contact.batted.avg_exit_velocity_mph,
            TrackedMetric::BarrelRate => report.contact.barrel_rate,
        };
        v.filter(|v| v.is_finite())
    }
}

impl fmt::Display for TrackedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improvement,
    Decline,
    Unchanged,
    Unavailable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improvement => "improvement",
            Trend::Decline => "decline",
            Trend::Unchanged => "unchanged",
            Trend::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallTrend {
    Improving,
    Declining,
    Stable,
}

impl OverallTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallTrend::Improving => "improving",
            OverallTrend::Declining => "declining",
            OverallTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for OverallTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: TrackedMetric,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub delta: Option<f64>,
    /// Absent when the previous value is zero
    pub percent_change: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub previous_session_id: String,
    pub previous_generated_at: DateTime<Utc>,
    pub metrics: Vec<MetricComparison>,
    pub improvements: usize,
    pub declines: usize,
    pub overall_trend: OverallTrend,
}

impl ComparisonSummary {
    pub fn metric(&self, metric: TrackedMetric) -> Option<&MetricComparison> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

fn compare_metric(
    metric: TrackedMetric,
    current: &AssessmentReport,
    previous: &AssessmentReport,
    thresholds: &ComparisonThresholds,
) -> MetricComparison {
    let cur = metric.value(current);
    let prev = metric.value(previous);
    let (Some(c), Some(p)) = (cur, prev) else {
        return MetricComparison {
            metric,
            current: cur,
            previous: prev,
            delta: None,
            percent_change: None,
            trend: Trend::Unavailable,
        };
    };

    let delta = c - p;
    let percent_change = (p != 0.0).then(|| delta / p * 100.0);
    let threshold = metric.threshold(thresholds);
    let trend = if delta.abs() < threshold {
        Trend::Unchanged
    } else if (delta > 0.0) != metric.lower_is_better() {
        Trend::Improvement
    } else {
        Trend::Decline
    };

    MetricComparison {
        metric,
        current: cur,
        previous: prev,
        delta: Some(delta),
        percent_change,
        trend,
    }
}

/// Compare two reports with explicit thresholds
pub fn compare_reports_with(
    current: &AssessmentReport,
    previous: &AssessmentReport,
    thresholds: &ComparisonThresholds,
) -> ComparisonSummary {
    let metrics: Vec<MetricComparison> = TrackedMetric::ALL
        .iter()
        .map(|m| compare_metric(*m, current, previous, thresholds))
        .collect();
    let improvements = metrics.iter().filter(|m| m.trend == Trend::Improvement).count();
    let declines = metrics.iter().filter(|m| m.trend == Trend::Decline).count();
    let overall_trend = if improvements > declines && improvements > 0 {
        OverallTrend::Improving
    } else if declines > improvements && declines > 0 {
        OverallTrend::Declining
    } else {
        OverallTrend::Stable
    };

    ComparisonSummary {
        previous_session_id: previous.session_id.clone(),
        previous_generated_at: previous.generated_at,
        metrics,
        improvements,
        declines,
        overall_trend,
    }
}

/// Compare two reports with the default thresholds
pub fn compare_reports(current: &AssessmentReport, previous: &AssessmentReport) -> ComparisonSummary {
    compare_reports_with(current, previous, &ComparisonThresholds::default())
}

/// Finds an athlete's previous assessment and compares against it
#[derive(Clone)]
pub struct SessionComparator {
    store: Arc<dyn AssessmentStore>,
    thresholds: ComparisonThresholds,
    metrics: EngineMetrics,
    logger: StructuredLogger,
}

impl SessionComparator {
    pub fn new(store: Arc<dyn AssessmentStore>, thresholds: ComparisonThresholds) -> Self {
        Self {
            store,
            thresholds,
            metrics: EngineMetrics::new(),
            logger: StructuredLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Most recent other completed session created strictly earlier, with a report
    pub fn previous_report(
        &self,
        current: &AssessmentSession,
    ) -> Result<Option<AssessmentReport>, AnalysisError> {
        let mut candidates: Vec<AssessmentSession> = self
            .store
            .sessions_for_athlete(&current.athlete_id)?
            .into_iter()
            .filter(|s| s.id != current.id)
            .filter(|s| s.status.is_completed())
            .filter(|s| s.created_at < current.created_at)
            .collect();
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        for candidate in candidates {
            if let Some(report) = self.store.report(&candidate.id)? {
                return Ok(Some(report));
            }
            debug!(session_id = %candidate.id, "Completed session has no stored report");
        }
        Ok(None)
    }

    /// Compare a freshly built report with the previous assessment
    pub fn compare_with_previous(
        &self,
        session: &AssessmentSession,
        report: &AssessmentReport,
    ) -> Result<Option<ComparisonSummary>, AnalysisError> {
        let Some(previous) = self.previous_report(session)? else {
            debug!(session_id = %session.id, "No previous assessment to compare against");
            return Ok(None);
        };
        let summary = compare_reports_with(report, &previous, &self.thresholds);
        self.metrics.record_comparison(summary.overall_trend.as_str());
        self.logger.log_comparison(
            &session.id,
            &summary.previous_session_id,
            summary.overall_trend.as_str(),
            summary.improvements,
            summary.declines,
        );
        Ok(Some(summary))
    }

    /// Compare a stored session's report with the athlete's previous one
    ///
    /// `Ok(None)` when either side has no report yet.
    pub fn compare_assessments(
        &self,
        athlete_id: &str,
        session_id: &str,
    ) -> Result<Option<ComparisonSummary>, AnalysisError> {
        let session = self
            .store
            .session(session_id)?
            .filter(|s| s.athlete_id == athlete_id)
            .ok_or_else(|| AnalysisError::SessionNotFound(session_id.to_string()))?;
        let Some(report) = self.store.report(session_id)? else {
            debug!(session_id = %session_id, "Session has no report yet");
            return Ok(None);
        };
        self.compare_with_previous(&session, &report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use crate::store::InMemoryStore;
    use crate::test_fixtures::{report, session, set_mean, ts};

    #[test]
    fn test_trend_classification() {
        let mut prev = report("s1", "a");
        let mut cur = report("s2", "a");
        prev.overall_score = Some(70.0);
        cur.overall_score = Some(75.0);
        prev.anchor.score = Some(60.0);
        cur.anchor.score = Some(61.5);
        prev.engine.score = Some(80.0);
        cur.engine.score = Some(78.0);
        set_mean(&mut prev, MetricField::BatSpeedMaxMph, 70.0);
        set_mean(&mut cur, MetricField::BatSpeedMaxMph, 72.0);
        cur.whip.score = Some(50.0);

        let summary = compare_reports(&cur, &prev);
        let overall = summary.metric(TrackedMetric::OverallScore).unwrap();
        assert_eq!(overall.trend, Trend::Improvement);
        assert_eq!(overall.delta, Some(5.0));
        assert!((overall.percent_change.unwrap() - 5.0 / 70.0 * 100.0).abs() < 1e-9);

        assert_eq!(summary.metric(TrackedMetric::Anchor).unwrap().trend, Trend::Unchanged);
        // A delta equal to the threshold counts as a change.
        assert_eq!(summary.metric(TrackedMetric::Engine).unwrap().trend, Trend::Decline);
        assert_eq!(summary.metric(TrackedMetric::BatSpeed).unwrap().trend, Trend::Improvement);
        let whip = summary.metric(TrackedMetric::Whip).unwrap();
        assert_eq!(whip.trend, Trend::Unavailable);
        assert!(whip.delta.is_none());

        assert_eq!(summary.improvements, 2);
        assert_eq!(summary.declines, 1);
        assert_eq!(summary.overall_trend, OverallTrend::Improving);
        assert_eq!(summary.metrics.len(), 10);
    }

    #[test]
    fn test_head_displacement_lower_is_better() {
        let mut prev = report("s1", "a");
        let mut cur = report("s2", "a");
        set_mean(&mut prev, MetricField::HeadDisplacementCm, 12.0);
        set_mean(&mut cur, MetricField::HeadDisplacementCm, 6.0);
        let summary = compare_reports(&cur, &prev);
        let head = summary.metric(TrackedMetric::HeadStability).unwrap();
        assert_eq!(head.trend, Trend::Improvement);
        assert_eq!(head.delta, Some(-6.0));
    }

    #[test]
    fn test_percent_change_absent_for_zero_previous() {
        let mut prev = report("s1", "a");
        let mut cur = report("s2", "a");
        prev.contact.barrel_rate = Some(0.0);
        cur.contact.barrel_rate = Some(0.1);
        let summary = compare_reports(&cur, &prev);
        let barrel = summary.metric(TrackedMetric::BarrelRate).unwrap();
        assert_eq!(barrel.trend, Trend::Improvement);
        assert!(barrel.percent_change.is_none());
    }

    #[test]
    fn test_balanced_changes_are_stable() {
        let mut prev = report("s1", "a");
        let mut cur = report("s2", "a");
        prev.overall_score = Some(70.0);
        cur.overall_score = Some(80.0);
        prev.anchor.score = Some(70.0);
        cur.anchor.score = Some(60.0);
        let summary = compare_reports(&cur, &prev);
        assert_eq!(summary.overall_trend, OverallTrend::Stable);

        let empty = compare_reports(&report("x", "a"), &report("y", "a"));
        assert_eq!(empty.overall_trend, OverallTrend::Stable);
        assert!(empty.metrics.iter().all(|m| m.trend == Trend::Unavailable));
    }

    fn store_with(sessions: Vec<(AssessmentSession, Option<AssessmentReport>)>) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        for (s, r) in sessions {
            if let Some(r) = r {
                store.upsert_report(r).unwrap();
            }
            store.insert_session(s).unwrap();
        }
        store
    }

    fn completed(id: &str, athlete: &str, day: u32) -> AssessmentSession {
        let mut s = session(id, athlete, ts(day), vec![]);
        s.status = SessionStatus::Completed;
        s
    }

    #[test]
    fn test_no_previous_session_is_none() {
        let store = store_with(vec![(completed("s1", "a", 5), Some(report("s1", "a")))]);
        let comparator = SessionComparator::new(store, ComparisonThresholds::default());
        assert!(comparator.compare_assessments("a", "s1").unwrap().is_none());
    }

    #[test]
    fn test_previous_must_be_earlier_and_completed() {
        let mut pending = completed("s0", "a", 2);
        pending.status = SessionStatus::Failed;
        let store = store_with(vec![
            (completed("s1", "a", 3), Some(report("s1", "a"))),
            (pending, Some(report("s0", "a"))),
            (completed("s2", "a", 5), Some(report("s2", "a"))),
            (completed("s3", "a", 9), Some(report("s3", "a"))),
            (completed("other", "b", 4), Some(report("other", "b"))),
        ]);
        let comparator = SessionComparator::new(store, ComparisonThresholds::default());
        let summary = comparator.compare_assessments("a", "s2").unwrap().unwrap();
        assert_eq!(summary.previous_session_id, "s1");
    }

    #[test]
    fn test_previous_without_report_is_skipped() {
        let store = store_with(vec![
            (completed("s1", "a", 1), Some(report("s1", "a"))),
            (completed("s2", "a", 2), None),
            (completed("s3", "a", 3), Some(report("s3", "a"))),
        ]);
        let comparator = SessionComparator::new(store, ComparisonThresholds::default());
        let summary = comparator.compare_assessments("a", "s3").unwrap().unwrap();
        assert_eq!(summary.previous_session_id, "s1");
    }

    #[test]
    fn test_unknown_session_or_athlete() {
        let store = store_with(vec![(completed("s1", "a", 1), Some(report("s1", "a")))]);
        let comparator = SessionComparator::new(store, ComparisonThresholds::default());
        assert!(matches!(
            comparator.compare_assessments("a", "missing"),
            Err(AnalysisError::SessionNotFound(_))
        ));
        assert!(matches!(
            comparator.compare_assessments("b", "s1"),
            Err(AnalysisError::SessionNotFound(_))
        ));
    }
}
