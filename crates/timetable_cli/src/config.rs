//! Runtime configuration for the CLI: where data and logs live.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment override for the data directory.
pub const DATA_DIR_ENV: &str = "TIMETABLE_DATA_DIR";
const DB_FILE_NAME: &str = "timetable.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolves the data directory: explicit flag, then env var, then the
    /// platform data directory.
    pub fn resolve(
        data_dir_flag: Option<&Path>,
        env_value: Option<String>,
        log_level: &str,
    ) -> Result<Self> {
        let data_dir = match (data_dir_flag, non_blank(env_value)) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(value)) => PathBuf::from(value),
            (None, None) => default_data_dir()?,
        };
        let data_dir = absolutize(data_dir)?;

        Ok(Self {
            data_dir,
            log_level: log_level.to_string(),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "timetable", "timetable")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
