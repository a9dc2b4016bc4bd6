//! Swing assessment service
//!
//! Serves the assessment API over HTTP with an in-memory session store,
//! alongside health, readiness and Prometheus endpoints.

use anyhow::Result;
use std::sync::Arc;
use swing_lib::{
    AssessmentStore, Calibration, EngineMetrics, InMemoryStore, ReportGenerator, StructuredLogger,
};
use swing_service::{
    api,
    config::ServiceConfig,
    health::{components, HealthRegistry},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServiceConfig::load()?;
    info!(service_name = %config.service_name, port = config.port, "Service configured");

    let (calibration, calibration_error) = match config.calibration() {
        Ok(cal) => (cal, None),
        Err(e) => {
            warn!(error = %e, "Falling back to default calibration");
            (Calibration::default(), Some(e.to_string()))
        }
    };

    let health_registry = HealthRegistry::new(&calibration.version);
    health_registry.register(components::ANALYZER).await;
    health_registry.register(components::STORE).await;
    if let Some(e) = calibration_error {
        health_registry
            .set_degraded(components::ANALYZER, format!("default calibration in use: {}", e))
            .await;
    }

    let metrics = EngineMetrics::new();
    metrics.set_calibration_version(&calibration.version);

    let logger = StructuredLogger::new(&config.service_name);
    logger.log_startup(SERVICE_VERSION, &calibration.version, config.port);

    let store: Arc<dyn AssessmentStore> = Arc::new(InMemoryStore::new());
    let generator = ReportGenerator::new(store.clone(), calibration).with_logger(logger.clone());
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        store,
        generator,
        config.level(),
    ));

    health_registry.set_ready(true).await;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
    };
    api::serve(config.port, app_state, shutdown).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    Ok(())
}
