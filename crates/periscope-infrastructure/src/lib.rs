pub mod dto;
pub mod paths;
pub mod prefs_service;

pub use crate::paths::PeriscopePaths;
pub use crate::prefs_service::PrefsService;
