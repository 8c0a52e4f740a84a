pub mod command;
pub mod connection;
pub mod error;
pub mod message;
pub mod metadata;
pub mod snapshot;
pub mod theme;
pub mod view;

// Re-export common error type
pub use error::{PeriscopeError, Result};
