//! Subcommand implementations

pub mod analyze;
pub mod barrel;
pub mod compare;
pub mod contact;
pub mod report;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use swing_lib::Calibration;

/// Parse a JSON input file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_calibration(path: Option<&Path>) -> Result<Calibration> {
    match path {
        Some(p) => Calibration::load(p),
        None => Ok(Calibration::default()),
    }
}
