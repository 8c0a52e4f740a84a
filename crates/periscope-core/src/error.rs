//! Error types for the periscope client.

use thiserror::Error;

/// A shared error type for the entire periscope client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum PeriscopeError {
    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Backend answered with a non-success HTTP status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Command registry rejected an unknown identifier
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PeriscopeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates an UnknownCommand error
    pub fn unknown_command(id: impl Into<String>) -> Self {
        Self::UnknownCommand(id.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error means the backend is unreachable or unhealthy.
    ///
    /// Returns true for:
    /// - `Transport` errors (connection-level failures)
    /// - `Backend` errors with a 5xx status
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<reqwest::Error> for PeriscopeError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else {
            "request"
        };
        Self::Transport {
            message: format!("{err} (kind: {kind})"),
        }
    }
}

impl From<std::io::Error> for PeriscopeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PeriscopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PeriscopeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PeriscopeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for PeriscopeError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) => Self::Serialization {
                format: "migration".to_string(),
                message: err.to_string(),
            },
            MigrationError::SerializationError(_) => Self::Serialization {
                format: "migration".to_string(),
                message: err.to_string(),
            },
            MigrationError::TomlParseError(_) | MigrationError::TomlSerializeError(_) => {
                Self::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for PeriscopeError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, PeriscopeError>`.
pub type Result<T> = std::result::Result<T, PeriscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_check_covers_transport_and_server_errors() {
        assert!(PeriscopeError::transport("connection refused").is_connectivity());
        assert!(PeriscopeError::backend(503, "unavailable").is_connectivity());
        assert!(!PeriscopeError::backend(404, "missing").is_connectivity());
        assert!(!PeriscopeError::config("bad url").is_connectivity());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: PeriscopeError = io.into();
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_unknown_command_message() {
        let err = PeriscopeError::unknown_command("dance");
        assert_eq!(err.to_string(), "Unknown command: 'dance'");
    }
}
