//! UiPrefs DTOs and migrations
//!
//! This module defines versioned DTOs for UI preferences that persist
//! across client restarts, such as the selected color theme.

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use periscope_core::theme::{Theme, UiPrefs};

/// UI preferences V1.0.0 (initial version).
///
/// Early clients only knew light and dark and stored the choice as a
/// boolean toggle.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct UiPrefsV1_0 {
    /// Whether the dark theme was enabled.
    #[serde(default)]
    pub dark_mode: bool,
}

/// UI preferences V2.0.0.
///
/// Replaced the `dark_mode` boolean with a named `theme` so additional
/// themes can exist without another schema change.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
pub struct UiPrefsV2_0 {
    /// Name of the selected theme ("light", "dark", "hacker").
    pub theme: String,
}

/// Type alias for the latest UiPrefs version.
pub type UiPrefsDTO = UiPrefsV2_0;

impl Default for UiPrefsV1_0 {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Default for UiPrefsV2_0 {
    fn default() -> Self {
        Self {
            theme: Theme::default().to_string(),
        }
    }
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from UiPrefsV1_0 to UiPrefsV2_0.
/// Maps the boolean toggle onto the equivalent named theme.
impl version_migrate::MigratesTo<UiPrefsV2_0> for UiPrefsV1_0 {
    fn migrate(self) -> UiPrefsV2_0 {
        let theme = if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        };
        UiPrefsV2_0 {
            theme: theme.to_string(),
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert UiPrefsV2_0 DTO to domain model.
///
/// Unrecognized theme names (written by a newer client, or corrupted by
/// hand-editing) fall back to the default theme instead of failing.
impl IntoDomain<UiPrefs> for UiPrefsV2_0 {
    fn into_domain(self) -> UiPrefs {
        UiPrefs {
            theme: Theme::from_saved(&self.theme),
        }
    }
}

/// Convert domain model to UiPrefsV2_0 DTO for persistence.
impl version_migrate::FromDomain<UiPrefs> for UiPrefsV2_0 {
    fn from_domain(prefs: UiPrefs) -> Self {
        UiPrefsV2_0 {
            theme: prefs.theme.to_string(),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for UiPrefs entities.
///
/// # Migration Path
///
/// - V1.0 → V2.0: Maps `dark_mode` boolean onto the named `theme`
/// - V2.0 → UiPrefs: Converts DTO to domain model
pub fn create_ui_prefs_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0 -> V2.0 -> UiPrefs
    let ui_prefs_path = version_migrate::Migrator::define("ui_prefs")
        .from::<UiPrefsV1_0>()
        .step::<UiPrefsV2_0>()
        .into_with_save::<UiPrefs>();

    migrator
        .register(ui_prefs_path)
        .expect("Failed to register ui_prefs migration path");

    migrator
}
