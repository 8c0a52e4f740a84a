//! UI theme selection and the persisted preference record.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use version_migrate::DeriveQueryable as Queryable;

/// Color theme chosen by the user.
///
/// Persisted preference files written by old client versions may carry
/// strings this enum no longer recognizes; those fall back to `Dark`
/// rather than failing the load.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Hacker,
}

impl Theme {
    /// Parses a persisted theme string, falling back to the default for
    /// anything unrecognized.
    pub fn from_saved(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Whether this theme renders on a dark background.
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark | Self::Hacker)
    }
}

/// User preferences that persist across client restarts.
///
/// # File Location
///
/// - macOS: `~/Library/Application Support/periscope/ui_prefs.toml`
/// - Linux: `~/.config/periscope/ui_prefs.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "ui_prefs")]
pub struct UiPrefs {
    /// Selected color theme.
    pub theme: Theme,
}

impl UiPrefs {
    /// Creates preferences with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(UiPrefs::new().theme, Theme::Dark);
    }

    #[test]
    fn test_from_saved_accepts_known_names() {
        assert_eq!(Theme::from_saved("light"), Theme::Light);
        assert_eq!(Theme::from_saved("dark"), Theme::Dark);
        assert_eq!(Theme::from_saved("hacker"), Theme::Hacker);
    }

    #[test]
    fn test_from_saved_falls_back_to_dark() {
        assert_eq!(Theme::from_saved("solarized"), Theme::Dark);
        assert_eq!(Theme::from_saved(""), Theme::Dark);
    }

    #[test]
    fn test_display_round_trips_through_from_saved() {
        for theme in [Theme::Light, Theme::Dark, Theme::Hacker] {
            assert_eq!(Theme::from_saved(&theme.to_string()), theme);
        }
    }

    #[test]
    fn test_hacker_counts_as_dark() {
        assert!(Theme::Hacker.is_dark());
        assert!(!Theme::Light.is_dark());
    }
}
