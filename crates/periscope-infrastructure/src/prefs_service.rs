//! UI preference persistence.
//!
//! This module provides a service for the small set of preferences that
//! survive client restarts (currently the color theme).

use crate::dto::create_ui_prefs_migrator;
use crate::paths::PeriscopePaths;
use periscope_core::theme::{Theme, UiPrefs};
use periscope_core::{PeriscopeError, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

/// Service for reading and writing persisted UI preferences.
///
/// Preferences are stored through FileStorage and cached in memory so the
/// hot path (theme lookups) never touches the disk.
///
/// # Example
///
/// ```ignore
/// use periscope_infrastructure::prefs_service::PrefsService;
///
/// let service = PrefsService::new()?;
/// service.set_theme(Theme::Hacker)?;
/// let theme = service.theme();
/// ```
#[derive(Clone)]
pub struct PrefsService {
    /// Cached preferences loaded from storage.
    /// Uses RwLock for thread-safe lazy loading.
    prefs: Arc<RwLock<Option<UiPrefs>>>,
    /// FileStorage instance for persistence.
    /// Wrapped in Mutex for interior mutability.
    storage: Arc<Mutex<FileStorage>>,
}

impl PrefsService {
    /// Creates a PrefsService backed by the default preferences file.
    ///
    /// The file is created with default values on first use via
    /// LoadBehavior::CreateIfMissing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be resolved or the
    /// storage file cannot be opened.
    pub fn new() -> Result<Self> {
        let file_path =
            PeriscopePaths::prefs_file().map_err(|e| PeriscopeError::config(e.to_string()))?;
        Self::new_at(file_path)
    }

    /// Creates a PrefsService backed by an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// storage file cannot be opened.
    pub fn new_at(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let migrator = create_ui_prefs_migrator();

        // Storage strategy: TOML format, CreateIfMissing
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        let storage = FileStorage::new(file_path, migrator, strategy)
            .map_err(|e| PeriscopeError::migration(format!("Failed to open prefs storage: {e}")))?;

        Ok(Self {
            prefs: Arc::new(RwLock::new(None)),
            storage: Arc::new(Mutex::new(storage)),
        })
    }

    /// Returns the persisted theme.
    pub fn theme(&self) -> Theme {
        self.load_prefs().theme
    }

    /// Persists a new theme selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences file cannot be written.
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let mut prefs = self.load_prefs();
        prefs.theme = theme;
        self.save_prefs(&prefs)
    }

    /// Loads preferences from storage if not already cached.
    fn load_prefs(&self) -> UiPrefs {
        {
            let read_lock = self.prefs.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = Self::load_from_storage(&self.storage).unwrap_or_else(|e| {
            tracing::debug!(target: "prefs", "Falling back to default preferences: {}", e);
            UiPrefs::default()
        });

        {
            let mut write_lock = self.prefs.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Saves preferences to storage and refreshes the cache.
    fn save_prefs(&self, prefs: &UiPrefs) -> Result<()> {
        let mut storage = self.storage.lock().unwrap();

        storage
            .update_and_save("ui_prefs", vec![prefs.clone()])
            .map_err(|e| PeriscopeError::migration(format!("Failed to save ui_prefs: {e}")))?;

        {
            let mut write_lock = self.prefs.write().unwrap();
            *write_lock = Some(prefs.clone());
        }

        Ok(())
    }

    /// Loads preferences from FileStorage.
    fn load_from_storage(storage: &Mutex<FileStorage>) -> Result<UiPrefs> {
        let storage = storage.lock().unwrap();

        let entries: Vec<UiPrefs> = storage
            .query("ui_prefs")
            .map_err(|e| PeriscopeError::migration(format!("Failed to query ui_prefs: {e}")))?;

        // ui_prefs is a single object, take first or return default
        Ok(entries.into_iter().next().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> PrefsService {
        PrefsService::new_at(dir.path().join("ui_prefs.toml")).unwrap()
    }

    #[test]
    fn test_fresh_store_uses_default_theme() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        assert_eq!(service.theme(), Theme::Dark);
    }

    #[test]
    fn test_set_theme_is_visible_immediately() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.set_theme(Theme::Light).unwrap();
        assert_eq!(service.theme(), Theme::Light);
    }

    #[test]
    fn test_theme_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let service = service_in(&dir);
            service.set_theme(Theme::Hacker).unwrap();
        }
        let reopened = service_in(&dir);
        assert_eq!(reopened.theme(), Theme::Hacker);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("nested").join("ui_prefs.toml");
        let service = PrefsService::new_at(nested);
        assert!(service.is_ok());
    }
}
