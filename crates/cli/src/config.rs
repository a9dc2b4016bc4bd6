//! User defaults from `~/.config/swingscore/config.json`

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swing_lib::CompetitionLevel;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Level used when `--level` is not given
    pub default_level: Option<String>,
    /// `table` or `json`
    pub default_format: Option<String>,
}

impl Config {
    /// Load the user config; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse config file")
    }

    pub fn level(&self) -> CompetitionLevel {
        self.default_level
            .clone()
            .map(CompetitionLevel::from)
            .unwrap_or(CompetitionLevel::HighSchool)
    }

    /// Unknown format names fall back to a table
    pub fn format(&self) -> OutputFormat {
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or_default()
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("swingscore").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.level(), CompetitionLevel::HighSchool);
        assert!(matches!(config.format(), OutputFormat::Table));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_level": "college", "default_format": "JSON"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.level(), CompetitionLevel::College);
        assert!(matches!(config.format(), OutputFormat::Json));
    }
}
