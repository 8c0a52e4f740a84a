//! Connection health as observed by the most recent probe.

use serde::{Deserialize, Serialize};

/// Result of the latest health probe.
///
/// The probe is memoryless: each observation overwrites the previous one
/// outright, so this struct never accumulates history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub is_online: bool,
    /// Round-trip time of the last successful request, if any
    pub latency_ms: Option<u64>,
}

impl ConnectionState {
    pub fn online(latency_ms: u64) -> Self {
        Self {
            is_online: true,
            latency_ms: Some(latency_ms),
        }
    }

    pub fn offline() -> Self {
        Self {
            is_online: false,
            latency_ms: None,
        }
    }
}
