//! Unified path management for periscope files on disk.
//!
//! All persisted client data is resolved via AppPaths from the
//! version-migrate crate so preference storage and exports agree on
//! locations across platforms.

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for periscope.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/periscope/         # Config directory (AppPaths default)
/// └── ui_prefs.toml            # Persisted UI preferences
///
/// ~/.local/share/periscope/    # Data directory
/// └── exports/                 # Exported conversation transcripts
///     └── periscope-chat-<timestamp>.md
/// ```
pub struct PeriscopePaths;

impl PeriscopePaths {
    /// Returns a configured AppPaths instance for periscope.
    fn app_paths() -> AppPaths {
        AppPaths::new("periscope")
    }

    /// Returns the periscope configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/periscope/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the periscope data directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to data directory (e.g., `~/.local/share/periscope/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to the persisted UI preferences file.
    pub fn prefs_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("ui_prefs.toml"))
    }

    /// Returns the directory conversation exports are written to.
    pub fn exports_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("exports"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_file_is_under_config_dir() {
        let prefs = PeriscopePaths::prefs_file().unwrap();
        let config = PeriscopePaths::config_dir().unwrap();
        assert!(prefs.starts_with(&config));
        assert!(prefs.ends_with("ui_prefs.toml"));
    }

    #[test]
    fn test_exports_dir_is_under_data_dir() {
        let exports = PeriscopePaths::exports_dir().unwrap();
        let data = PeriscopePaths::data_dir().unwrap();
        assert!(exports.starts_with(&data));
        assert!(exports.ends_with("exports"));
    }
}
