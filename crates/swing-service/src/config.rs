//! Service configuration
//!
//! Read from `SWING_*` environment variables:
//! - `SWING_PORT`: HTTP port for the API, health and metrics
//! - `SWING_SERVICE_NAME`: name stamped on structured log events
//! - `SWING_DEFAULT_LEVEL`: competition level when a request names none
//! - `SWING_CALIBRATION_PATH`: optional calibration JSON replacing the defaults

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use swing_lib::{Calibration, CompetitionLevel};

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Free-form level name, parsed leniently
    #[serde(default = "default_level")]
    pub default_level: String,

    #[serde(default)]
    pub calibration_path: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "swing-engine".to_string()
}

fn default_level() -> String {
    "hs".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            service_name: default_service_name(),
            default_level: default_level(),
            calibration_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SWING").try_parsing(true))
            .build()
            .context("Failed to read SWING_* environment")?;

        config
            .try_deserialize()
            .context("Invalid service configuration")
    }

    pub fn level(&self) -> CompetitionLevel {
        CompetitionLevel::from(self.default_level.clone())
    }

    /// Calibration tables from `calibration_path`, or the built-in defaults
    pub fn calibration(&self) -> Result<Calibration> {
        match &self.calibration_path {
            Some(path) => Calibration::load(Path::new(path)),
            None => Ok(Calibration::default()),
        }
    }
}
