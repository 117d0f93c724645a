//! User settings for FinTrack
//!
//! Stored as JSON. Every field has a default so a partial or missing file is
//! always usable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FinanceError, FinanceResult};

/// How expense dates and budget months are interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DateMode {
    /// Raw strings: exact match for dates, prefix match for months
    #[default]
    Lexical,
    /// Dates are parsed as calendar dates and stored in canonical form
    Calendar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Settings {
    /// Overrides the default database location in the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) database_path: Option<PathBuf>,

    #[serde(default)]
    pub(crate) date_mode: DateMode,

    #[serde(default = "default_currency")]
    pub(crate) currency_symbol: String,

    /// Log every SQL statement at debug level
    #[serde(default)]
    pub(crate) echo_sql: bool,
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            date_mode: DateMode::default(),
            currency_symbol: default_currency(),
            echo_sql: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist.
    pub(crate) fn load(path: &Path) -> FinanceResult<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            FinanceError::Config(format!("Invalid settings file {}: {e}", path.display()))
        })
    }

    pub(crate) fn save(&self, path: &Path) -> FinanceResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.date_mode, DateMode::Lexical);
        assert_eq!(settings.currency_symbol, "₹");
        assert!(settings.database_path.is_none());
        assert!(!settings.echo_sql);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings.date_mode, DateMode::Lexical);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"date_mode": "calendar"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.date_mode, DateMode::Calendar);
        assert_eq!(settings.currency_symbol, "₹");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            database_path: Some(dir.path().join("money.db")),
            currency_symbol: "$".into(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.database_path, settings.database_path);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, FinanceError::Config(_)));
    }
}
