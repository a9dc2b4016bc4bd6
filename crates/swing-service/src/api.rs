//! HTTP API for swing assessment, health checks and Prometheus metrics

use crate::health::{components, ComponentStatus, HealthRegistry};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swing_lib::{
    AnalysisError, AssessmentSession, AssessmentStore, BarrelResult, BattedBallEvent,
    ComparisonSummary, CompetitionLevel, ContactQualitySummary, EngineMetrics, ReportGenerator,
    SessionExists, SessionStatus, Swing, SwingMetrics,
};
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub store: Arc<dyn AssessmentStore>,
    pub generator: ReportGenerator,
    pub default_level: CompetitionLevel,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        store: Arc<dyn AssessmentStore>,
        generator: ReportGenerator,
        default_level: CompetitionLevel,
    ) -> Self {
        Self {
            health_registry,
            metrics: EngineMetrics::new(),
            store,
            generator,
            default_level,
        }
    }
}

/// Error body returned by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub enum ApiError {
    Analysis(AnalysisError),
    NotFound(String),
    Conflict(String),
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Analysis(AnalysisError::Storage(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Analysis(e) => {
                let status = match &e {
                    AnalysisError::MissingData { .. }
                    | AnalysisError::InvalidSwing { .. }
                    | AnalysisError::EmptySession(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    AnalysisError::SessionNotFound(_) => StatusCode::NOT_FOUND,
                    AnalysisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct BarrelRequest {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    #[serde(default = "default_true")]
    pub is_fair: bool,
    #[serde(default)]
    pub level: Option<CompetitionLevel>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactQualityRequest {
    pub events: Vec<BattedBallEvent>,
    #[serde(default)]
    pub level: Option<CompetitionLevel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub id: String,
    pub athlete_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: Option<CompetitionLevel>,
    #[serde(default)]
    pub swings: Vec<Swing>,
    #[serde(default)]
    pub events: Vec<BattedBallEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub status: SessionStatus,
    pub swings: usize,
    pub events: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub session_id: String,
    /// `null` when there is no earlier completed assessment
    pub comparison: Option<ComparisonSummary>,
}

async fn analyze_swing(
    State(state): State<Arc<AppState>>,
    Json(swing): Json<Swing>,
) -> ApiResult<SwingMetrics> {
    let metrics = state.generator.analyzer().analyze_swing(&swing)?;
    state.metrics.inc_swings_analyzed();
    Ok(Json(metrics))
}

async fn classify_barrel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BarrelRequest>,
) -> Json<BarrelResult> {
    let result = state.generator.contact().classifier().classify(
        req.exit_velocity_mph,
        req.launch_angle_deg,
        req.is_fair,
        req.level.unwrap_or(state.default_level),
    );
    state.metrics.record_barrel_classification(result.is_barrel);
    Json(result)
}

async fn contact_quality(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContactQualityRequest>,
) -> Json<ContactQualitySummary> {
    let level = req.level.unwrap_or(state.default_level);
    Json(state.generator.contact().summarize(&req.events, level))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let session = AssessmentSession {
        id: req.id,
        athlete_id: req.athlete_id,
        created_at: req.created_at.unwrap_or_else(Utc::now),
        status: SessionStatus::Pending,
        level: req.level.unwrap_or(state.default_level),
        swings: req.swings,
        events: req.events,
    };
    let created = SessionCreated {
        session_id: session.id.clone(),
        status: session.status,
        swings: session.swings.len(),
        events: session.events.len(),
    };
    info!(
        session_id = %session.id,
        athlete_id = %session.athlete_id,
        swings = created.swings,
        "Session received"
    );
    match state.store.insert_session(session) {
        Err(e) if e.downcast_ref::<SessionExists>().is_some() => {
            Err(ApiError::Conflict(e.to_string()))
        }
        result => {
            store_call(&state, result).await?;
            Ok((StatusCode::CREATED, Json(created)))
        }
    }
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<AssessmentSession> {
    let session = store_call(&state, state.store.session(&session_id)).await?;
    session
        .map(Json)
        .ok_or_else(|| AnalysisError::SessionNotFound(session_id).into())
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    match state.generator.generate_assessment_report(&session_id) {
        Ok(report) => Ok(Json(report).into_response()),
        Err(AnalysisError::Storage(e)) => {
            state
                .health_registry
                .set_degraded(components::STORE, e.to_string())
                .await;
            Err(AnalysisError::Storage(e).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    match store_call(&state, state.store.report(&session_id)).await? {
        Some(report) => Ok(Json(report).into_response()),
        None => Err(ApiError::NotFound(format!(
            "no report for session {}",
            session_id
        ))),
    }
}

async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Path((athlete_id, session_id)): Path<(String, String)>,
) -> ApiResult<ComparisonResponse> {
    let comparison = state
        .generator
        .comparator()
        .compare_assessments(&athlete_id, &session_id)?;
    Ok(Json(ComparisonResponse {
        session_id,
        comparison,
    }))
}

/// Run a store operation, flagging the store component when it fails
async fn store_call<T>(state: &AppState, result: anyhow::Result<T>) -> Result<T, ApiError> {
    match result {
        Ok(v) => Ok(v),
        Err(e) => {
            warn!(error = %e, "Store operation failed");
            state
                .health_registry
                .set_degraded(components::STORE, e.to_string())
                .await;
            Err(e.into())
        }
    }
}

/// Health check response - returns 200 if operational, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/swings/analyze", post(analyze_swing))
        .route("/api/v1/barrel", post(classify_barrel))
        .route("/api/v1/contact-quality", post(contact_quality))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route(
            "/api/v1/sessions/:id/report",
            post(generate_report).get(get_report),
        )
        .route(
            "/api/v1/athletes/:athlete_id/sessions/:id/comparison",
            get(get_comparison),
        )
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server; returns once `shutdown` resolves
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
