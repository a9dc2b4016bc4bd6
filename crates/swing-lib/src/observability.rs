//! Observability for the assessment engine
//!
//! Provides:
//! - Prometheus metrics (analysis and report latency, swing/report counters,
//!   barrel classifications, comparison trends, calibration version)
//! - Structured logging of significant engine events with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    swing_analysis_latency_seconds: Histogram,
    report_generation_latency_seconds: Histogram,
    swings_analyzed: IntCounter,
    swings_excluded: IntCounterVec,
    reports_generated: IntCounter,
    report_failures: IntCounter,
    barrel_classifications: IntCounterVec,
    comparisons: IntCounterVec,
    calibration_version_info: GaugeVec,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            swing_analysis_latency_seconds: register_histogram!(
                "swing_engine_swing_analysis_latency_seconds",
                "Time spent computing metrics for one swing",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register swing_analysis_latency_seconds"),

            report_generation_latency_seconds: register_histogram!(
                "swing_engine_report_generation_latency_seconds",
                "Time spent generating a session report",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register report_generation_latency_seconds"),

            swings_analyzed: register_int_counter!(
                "swing_engine_swings_analyzed_total",
                "Swings that produced a metrics record"
            )
            .expect("Failed to register swings_analyzed"),

            swings_excluded: register_int_counter_vec!(
                "swing_engine_swings_excluded_total",
                "Swings excluded from aggregation",
                &["reason"]
            )
            .expect("Failed to register swings_excluded"),

            reports_generated: register_int_counter!(
                "swing_engine_reports_generated_total",
                "Assessment reports generated"
            )
            .expect("Failed to register reports_generated"),

            report_failures: register_int_counter!(
                "swing_engine_report_failures_total",
                "Report generations that failed"
            )
            .expect("Failed to register report_failures"),

            barrel_classifications: register_int_counter_vec!(
                "swing_engine_barrel_classifications_total",
                "Batted balls classified",
                &["result"]
            )
            .expect("Failed to register barrel_classifications"),

            comparisons: register_int_counter_vec!(
                "swing_engine_comparisons_total",
                "Session comparisons computed",
                &["trend"]
            )
            .expect("Failed to register comparisons"),

            calibration_version_info: register_gauge_vec!(
                "swing_engine_calibration_version_info",
                "Calibration tables in use",
                &["version"]
            )
            .expect("Failed to register calibration_version_info"),
        }
    }
}

/// Handle to the engine's Prometheus metrics
///
/// Clones share the same process-wide registrations.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &'static EngineMetricsInner {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new)
    }

    pub fn observe_swing_latency(&self, duration_secs: f64) {
        self.inner().swing_analysis_latency_seconds.observe(duration_secs);
    }

    pub fn observe_report_latency(&self, duration_secs: f64) {
        self.inner().report_generation_latency_seconds.observe(duration_secs);
    }

    pub fn inc_swings_analyzed(&self) {
        self.inner().swings_analyzed.inc();
    }

    /// `reason` is a short machine label such as `missing_data`
    pub fn inc_swings_excluded(&self, reason: &str) {
        self.inner().swings_excluded.with_label_values(&[reason]).inc();
    }

    pub fn inc_reports_generated(&self) {
        self.inner().reports_generated.inc();
    }

    pub fn inc_report_failures(&self) {
        self.inner().report_failures.inc();
    }

    pub fn record_barrel_classification(&self, is_barrel: bool) {
        let label = if is_barrel { "barrel" } else { "non_barrel" };
        self.inner().barrel_classifications.with_label_values(&[label]).inc();
    }

    pub fn record_comparison(&self, trend: &str) {
        self.inner().comparisons.with_label_values(&[trend]).inc();
    }

    pub fn set_calibration_version(&self, version: &str) {
        self.inner().calibration_version_info.reset();
        self.inner()
            .calibration_version_info
            .with_label_values(&[version])
            .set(1.0);
    }
}

/// Structured logger for engine events
///
/// Every event carries an `event` field so log pipelines can filter on it.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new("swing-engine")
    }
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn log_swing_analyzed(
        &self,
        session_id: &str,
        swing_id: &str,
        overall_score: Option<f64>,
        confidence: f64,
    ) {
        info!(
            event = "swing_analyzed",
            service = %self.service_name,
            session_id = %session_id,
            swing_id = %swing_id,
            overall_score = ?overall_score,
            confidence = confidence,
            "Swing analyzed"
        );
    }

    pub fn log_swing_excluded(&self, session_id: &str, swing_id: &str, reason: &str) {
        warn!(
            event = "swing_excluded",
            service = %self.service_name,
            session_id = %session_id,
            swing_id = %swing_id,
            reason = %reason,
            "Swing excluded from session aggregation"
        );
    }

    pub fn log_report_generated(
        &self,
        session_id: &str,
        athlete_id: &str,
        swings_analyzed: usize,
        swings_excluded: usize,
        overall_score: Option<f64>,
        duration_ms: f64,
    ) {
        info!(
            event = "report_generated",
            service = %self.service_name,
            session_id = %session_id,
            athlete_id = %athlete_id,
            swings_analyzed = swings_analyzed,
            swings_excluded = swings_excluded,
            overall_score = ?overall_score,
            duration_ms = duration_ms,
            "Assessment report generated"
        );
    }

    pub fn log_report_failed(&self, session_id: &str, error: &str) {
        warn!(
            event = "report_failed",
            service = %self.service_name,
            session_id = %session_id,
            error = %error,
            "Assessment report generation failed"
        );
    }

    pub fn log_comparison(
        &self,
        session_id: &str,
        previous_session_id: &str,
        overall_trend: &str,
        improvements: usize,
        declines: usize,
    ) {
        info!(
            event = "comparison_computed",
            service = %self.service_name,
            session_id = %session_id,
            previous_session_id = %previous_session_id,
            overall_trend = %overall_trend,
            improvements = improvements,
            declines = declines,
            "Compared session with previous assessment"
        );
    }

    pub fn log_startup(&self, version: &str, calibration_version: &str, port: u16) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            calibration_version = %calibration_version,
            port = port,
            "Swing assessment service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Swing assessment service shutting down"
        );
    }
}
