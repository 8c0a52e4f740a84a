//! The backend abstraction the sync engine polls against.

use async_trait::async_trait;
use periscope_core::Result;
use periscope_core::snapshot::AnswerSnapshot;

/// Operations the remote agent backend exposes to clients.
///
/// Every method maps to a single request. Implementations must not retry
/// or buffer: the engine's poll loop provides the retry cadence, and a
/// failed call simply waits for the next tick.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Cheap liveness check.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    async fn check_health(&self) -> Result<()>;

    /// Fetches the backend's latest-answer document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unparseable document.
    async fn latest_answer(&self) -> Result<AnswerSnapshot>;

    /// Submits a user query and waits for the backend to acknowledge it.
    ///
    /// The returned snapshot is whatever answer state the backend chose to
    /// include in its acknowledgement. It often carries no answer text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn submit_query(&self, query: &str) -> Result<AnswerSnapshot>;

    /// Asks the backend to halt the currently running task.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend did not acknowledge the request.
    async fn request_stop(&self) -> Result<()>;

    /// Downloads the current screenshot.
    ///
    /// `timestamp_ms` is attached to the request so intermediate caches
    /// never serve a stale image.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn fetch_screenshot(&self, timestamp_ms: i64) -> Result<Vec<u8>>;
}
