//! XDG-style path utilities for configuration and data directories.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "buddy";

/// Environment variable that overrides the session database location.
pub const DB_PATH_ENV: &str = "BUDDY_DB";

/// Returns the configuration directory for buddy.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/buddy` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/buddy` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

/// Returns the data directory for buddy.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/buddy` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/buddy` otherwise
pub fn data_dir() -> Result<PathBuf> {
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".local").join("share").join(APP_DIR)),
    }
}

/// Returns the path of the session database.
///
/// `$BUDDY_DB` wins over the data directory.
pub fn database_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DB_PATH_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    Ok(data_dir()?.join("buddy.db"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
