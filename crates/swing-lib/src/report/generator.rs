//! Session report generation
//!
//! Joins every swing of a session into one [`AssessmentReport`]: swings are
//! analyzed independently, swings with unusable data are excluded and
//! counted, and the remaining records are aggregated with the session's
//! batted-ball events. Generation against the store also compares with the
//! previous assessment, persists the report and completes the session.

use crate::calibration::Calibration;
use crate::comparison::SessionComparator;
use crate::contact::{BarrelClassifier, ContactSummarizer};
use crate::error::AnalysisError;
use crate::models::{AssessmentSession, SessionStatus};
use crate::observability::{EngineMetrics, StructuredLogger};
use crate::report::categories::{anchor_score, engine_score, session_consistency, whip_score};
use crate::report::insights::derive_insights;
use crate::report::{aggregate_fields, AssessmentReport, ExcludedSwing, Narrative, Tier};
use crate::stats::weighted_average;
use crate::store::AssessmentStore;
use crate::swing::{MetricField, SwingAnalyzer};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct ReportGenerator {
    store: Arc<dyn AssessmentStore>,
    analyzer: SwingAnalyzer,
    contact: ContactSummarizer,
    comparator: SessionComparator,
    metrics: EngineMetrics,
    logger: StructuredLogger,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn AssessmentStore>, cal: Calibration) -> Self {
        let contact = ContactSummarizer::new(BarrelClassifier::new(cal.barrel.clone()));
        let comparator = SessionComparator::new(store.clone(), cal.comparison.clone());
        Self {
            store,
            analyzer: SwingAnalyzer::new(cal),
            contact,
            comparator,
            metrics: EngineMetrics::new(),
            logger: StructuredLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.comparator = self.comparator.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    pub fn calibration(&self) -> &Calibration {
        self.analyzer.calibration()
    }

    pub fn analyzer(&self) -> &SwingAnalyzer {
        &self.analyzer
    }

    pub fn contact(&self) -> &ContactSummarizer {
        &self.contact
    }

    pub fn comparator(&self) -> &SessionComparator {
        &self.comparator
    }

    /// Score a session without touching the store
    ///
    /// The returned report has no comparison block.
    pub fn build_report(&self, session: &AssessmentSession) -> Result<AssessmentReport, AnalysisError> {
        if session.swings.is_empty() {
            return Err(AnalysisError::EmptySession(session.id.clone()));
        }
        let cal = self.calibration();

        let mut swings = Vec::with_capacity(session.swings.len());
        let mut excluded = Vec::new();
        for swing in &session.swings {
            let start = Instant::now();
            let result = self.analyzer.analyze_swing(swing);
            self.metrics.observe_swing_latency(start.elapsed().as_secs_f64());
            match result {
                Ok(m) => {
                    self.metrics.inc_swings_analyzed();
                    self.logger
                        .log_swing_analyzed(&session.id, &swing.id, m.overall_score, m.confidence);
                    swings.push(m);
                }
                Err(e) if e.is_swing_level() => {
                    let label = match &e {
                        AnalysisError::InvalidSwing { .. } => "invalid_swing",
                        _ => "missing_data",
                    };
                    self.metrics.inc_swings_excluded(label);
                    self.logger.log_swing_excluded(&session.id, &swing.id, &e.to_string());
                    excluded.push(ExcludedSwing {
                        swing_id: swing.id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let aggregates = aggregate_fields(&swings, &cal.scoring);
        let contact = self.contact.summarize(&session.events, session.level);
        let anchor = anchor_score(&aggregates, cal);
        let engine = engine_score(&aggregates, cal);
        let whip = whip_score(&aggregates, cal);
        let consistency_score = session_consistency(&aggregates);

        let s = &cal.scoring;
        let w = &s.session_weights;
        let mean = |f: MetricField| aggregates.get(&f).map(|a| a.mean);
        let overall_score = weighted_average(&[
            (mean(MetricField::BatSpeedMaxMph).map(|v| s.bat_speed_mph.score(v)), w.bat_speed),
            (mean(MetricField::SequenceScore), w.sequence),
            (consistency_score, w.consistency),
            (
                contact
                    .batted
                    .avg_exit_velocity_mph
                    .map(|v| s.exit_velocity_mph.score(v)),
                w.exit_velocity,
            ),
            (
                contact.barrel_rate.map(|r| (r * 100.0).clamp(0.0, 100.0)),
                w.barrel_rate,
            ),
        ]);

        let mut report = AssessmentReport {
            session_id: session.id.clone(),
            athlete_id: session.athlete_id.clone(),
            generated_at: Utc::now(),
            calibration_version: cal.version.clone(),
            level: session.level,
            swings_analyzed: swings.len(),
            swings_excluded: excluded.len(),
            excluded,
            anchor,
            engine,
            whip,
            consistency_score,
            overall_score,
            tier: overall_score.map(|v| Tier::from_score(v, &s.tiers)),
            aggregates,
            swings,
            contact,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            narrative: Narrative::default(),
            comparison: None,
        };

        let (strengths, weaknesses) = derive_insights(&report);
        report.strengths = strengths;
        report.weaknesses = weaknesses;
        report.narrative = Narrative::for_report(&report);
        Ok(report)
    }

    /// Generate, compare and persist the report of a stored session
    ///
    /// The session moves to `Processing`, then `Completed` on success or
    /// `Failed` when scoring or persistence fails.
    pub fn generate_assessment_report(&self, session_id: &str) -> Result<AssessmentReport, AnalysisError> {
        let start = Instant::now();
        let session = self
            .store
            .session(session_id)?
            .ok_or_else(|| AnalysisError::SessionNotFound(session_id.to_string()))?;

        self.store.set_status(session_id, SessionStatus::Processing)?;

        match self.generate_and_store(&session) {
            Ok(report) => {
                let elapsed = start.elapsed();
                self.metrics.observe_report_latency(elapsed.as_secs_f64());
                self.metrics.inc_reports_generated();
                self.logger.log_report_generated(
                    &session.id,
                    &session.athlete_id,
                    report.swings_analyzed,
                    report.swings_excluded,
                    report.overall_score,
                    elapsed.as_secs_f64() * 1000.0,
                );
                Ok(report)
            }
            Err(e) => {
                self.metrics.inc_report_failures();
                self.logger.log_report_failed(&session.id, &e.to_string());
                if let Err(status_err) = self.store.set_status(session_id, SessionStatus::Failed) {
                    warn!(session_id = %session_id, error = %status_err, "Failed to mark session as failed");
                }
                Err(e)
            }
        }
    }

    fn generate_and_store(&self, session: &AssessmentSession) -> Result<AssessmentReport, AnalysisError> {
        let mut report = self.build_report(session)?;

        report.comparison = self.comparator.compare_with_previous(session, &report)?;
        if report.comparison.is_some() {
            report.narrative = Narrative::for_report(&report);
        }

        self.store.upsert_report(report.clone())?;
        self.store.set_status(&session.id, SessionStatus::Completed)?;
        info!(
            session_id = %session.id,
            overall_score = ?report.overall_score,
            tier = ?report.tier,
            "Stored assessment report"
        );
        Ok(report)
    }
}
