//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### UiPrefs Version History
//! - **1.0.0**: Initial schema with a boolean `dark_mode` toggle
//! - **2.0.0**: Replaced `dark_mode` with a named `theme` string

pub mod ui_prefs;

pub use ui_prefs::{UiPrefsDTO, create_ui_prefs_migrator};
