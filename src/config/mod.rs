mod settings;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) use settings::{DateMode, Settings};

/// Where the running process reads its settings and database from.
pub(crate) struct Paths {
    pub(crate) settings: PathBuf,
    pub(crate) database: PathBuf,
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fintrack", "FinTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

pub(crate) fn default_settings_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("settings.json"))
}

/// Resolve where the database lives: explicit path first, then the settings
/// file, then `fintrack.db` in the platform data directory.
pub(crate) fn resolve_db_path(explicit: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    if let Some(path) = explicit.or(settings.database_path.as_deref()) {
        return Ok(path.to_path_buf());
    }
    let proj_dirs = project_dirs()?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fintrack.db"))
}
