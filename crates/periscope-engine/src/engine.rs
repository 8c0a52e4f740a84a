//! The sync engine: owns the mirrored state and drives the poll loop.

use crate::blob::BlobStore;
use crate::cursor::SyncCursor;
use crate::state::EngineState;
use chrono::Utc;
use periscope_client::AgentBackend;
use periscope_core::connection::ConnectionState;
use periscope_core::message::Message;
use periscope_core::metadata::ScreenshotRef;
use periscope_core::theme::Theme;
use periscope_core::view::View;
use periscope_core::Result;
use periscope_infrastructure::PrefsService;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

/// How often the poll loop fires unless overridden.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Message appended to the log when a submission fails.
const SUBMIT_ERROR_MESSAGE: &str = "Error: Unable to get a response.";
/// Sticky error flag raised when a submission fails.
const SUBMIT_ERROR_FLAG: &str = "Failed to process query.";
/// Status line shown once the backend acknowledges a stop request.
const STOP_PENDING_STATUS: &str = "Requesting stop...";

/// State plus the synchronizer's private dedup cursor, guarded together
/// so merge-check-append happens atomically under one lock.
struct Inner {
    state: EngineState,
    cursor: SyncCursor,
}

/// Client-side mirror of a remote agent backend.
///
/// The engine polls the backend on a fixed cadence and folds every
/// observation into a single [`EngineState`] value that consumers read
/// via [`snapshot`](Self::snapshot). All mutations funnel through one
/// write lock, and every mutation re-checks the cancellation token while
/// holding it, so once [`stop`](Self::stop) returns the state is frozen
/// no matter how many responses are still in flight.
pub struct SyncEngine {
    backend: Arc<dyn AgentBackend>,
    blobs: Arc<dyn BlobStore>,
    prefs: Arc<PrefsService>,
    inner: Arc<RwLock<Inner>>,
    cancel: CancellationToken,
    poll_interval: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl SyncEngine {
    /// Creates an engine over the given backend and blob store.
    ///
    /// The initial theme comes from the persisted preferences; everything
    /// else starts from the pre-first-poll defaults.
    pub fn new(
        backend: Arc<dyn AgentBackend>,
        blobs: Arc<dyn BlobStore>,
        prefs: Arc<PrefsService>,
    ) -> Self {
        let theme = prefs.theme();
        Self {
            backend,
            blobs,
            prefs,
            inner: Arc::new(RwLock::new(Inner {
                state: EngineState::new(theme),
                cursor: SyncCursor::default(),
            })),
            cancel: CancellationToken::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            ticker: Mutex::new(None),
        }
    }

    /// Overrides the poll cadence.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Starts the background poll loop.
    ///
    /// Each tick fires the health probe, the answer sync and the
    /// screenshot fetch as independent tasks; a slow response never
    /// delays the next tick. Calling `start` while the loop is already
    /// running (or after `stop`) is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut ticker_guard = self.ticker.lock().unwrap();
        if ticker_guard.is_some() {
            tracing::warn!(target: "poll", "Scheduler already running, skipping");
            return;
        }
        if self.cancel.is_cancelled() {
            tracing::warn!(target: "poll", "Engine already stopped, not starting");
            return;
        }

        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(engine.poll_interval);
            tracing::info!(
                target: "poll",
                "Scheduler started ({} ms interval)",
                engine.poll_interval.as_millis()
            );

            loop {
                tokio::select! {
                    _ = engine.cancel.cancelled() => {
                        tracing::info!(target: "poll", "Scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        tracing::trace!(target: "poll", "Tick");
                        engine.dispatch_tick();
                    }
                }
            }
        });
        *ticker_guard = Some(handle);
    }

    fn dispatch_tick(self: &Arc<Self>) {
        let health = Arc::clone(self);
        tokio::spawn(async move { health.check_health().await });

        let sync = Arc::clone(self);
        tokio::spawn(async move { sync.fetch_latest_answer().await });

        let screenshot = Arc::clone(self);
        tokio::spawn(async move { screenshot.fetch_screenshot().await });
    }

    /// Stops the poll loop and freezes the state.
    ///
    /// Responses still in flight when this returns are discarded: every
    /// mutation path re-checks the cancellation token under the write
    /// lock, and this method acquires that lock once so in-progress
    /// critical sections drain before it returns.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let handle = self.ticker.lock().unwrap().take();
        if let Some(handle) = handle {
            handle.abort();
        }

        let _barrier = self.inner.write().await;
        tracing::info!(target: "poll", "Engine stopped");
    }

    /// Whether the poll loop is currently running.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.ticker.lock().unwrap().is_some()
    }

    // ============================================================================
    // Poll operations
    // ============================================================================

    /// Probes backend health and overwrites the connection observation.
    ///
    /// The probe is memoryless: one success flips the mirror online, one
    /// failure flips it offline, regardless of history.
    pub async fn check_health(&self) {
        let started = Instant::now();
        let result = self.backend.check_health().await;

        let mut inner = self.inner.write().await;
        if self.cancel.is_cancelled() {
            return;
        }
        match result {
            Ok(()) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                inner.state.connection = ConnectionState::online(latency_ms);
                tracing::trace!(target: "health", "Backend online ({} ms)", latency_ms);
            }
            Err(e) => {
                inner.state.connection = ConnectionState::offline();
                tracing::debug!(target: "health", "Backend offline: {}", e);
            }
        }
    }

    /// Fetches the latest-answer document and folds it into the mirror.
    ///
    /// Metadata is merged from every successful poll. The conversation
    /// log only grows when the snapshot carries a non-empty answer with
    /// a uid the dedup cursor has not seen before. Failures leave the
    /// mirror untouched; the next tick retries naturally.
    pub async fn fetch_latest_answer(&self) {
        let started = Instant::now();
        let result = self.backend.latest_answer().await;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(target: "sync", "Poll failed: {}", e);
                return;
            }
        };
        let latency_ms = started.elapsed().as_millis() as u64;

        let mut inner = self.inner.write().await;
        if self.cancel.is_cancelled() {
            return;
        }

        inner.state.connection.latency_ms = Some(latency_ms);
        inner.state.metadata.absorb(&snapshot);

        if !snapshot.has_answer() {
            return;
        }
        let Some(uid) = snapshot.uid.as_deref() else {
            tracing::debug!(target: "sync", "Answer without uid, not appending");
            return;
        };
        if !inner.cursor.advance(uid) {
            tracing::trace!(target: "sync", "Answer {} already mirrored", uid);
            return;
        }

        inner.state.status = snapshot.status.clone();
        inner.state.messages.push(Message::agent(&snapshot));
        tracing::info!(target: "sync", "Mirrored agent answer {}", uid);
    }

    /// Downloads the current screenshot while the visual view is active.
    ///
    /// The previous live handle is released exactly once whether the
    /// fetch succeeds (replaced by the new handle) or fails (replaced by
    /// the placeholder). The capture timestamp advances either way so
    /// consumers can tell a stale image from a fresh failure.
    pub async fn fetch_screenshot(&self) {
        {
            let inner = self.inner.read().await;
            if inner.state.view != View::Screenshot {
                return;
            }
        }

        let timestamp_ms = Utc::now().timestamp_millis();
        let result = self.backend.fetch_screenshot(timestamp_ms).await;

        let new_ref = match result {
            Ok(bytes) => {
                let id = self.blobs.store(bytes).await;
                ScreenshotRef::Blob(id)
            }
            Err(e) => {
                tracing::debug!(target: "screenshot", "Fetch failed: {}", e);
                ScreenshotRef::Placeholder
            }
        };

        let mut inner = self.inner.write().await;
        if self.cancel.is_cancelled() {
            drop(inner);
            if let ScreenshotRef::Blob(id) = new_ref {
                self.blobs.release(id).await;
            }
            return;
        }
        let previous = std::mem::replace(&mut inner.state.metadata.screenshot, new_ref);
        inner.state.metadata.screenshot_captured_at = Some(Utc::now());
        drop(inner);

        if let ScreenshotRef::Blob(id) = previous {
            self.blobs.release(id).await;
        }
    }

    // ============================================================================
    // User actions
    // ============================================================================

    /// Submits the current input buffer as a query.
    ///
    /// A blank buffer is rejected silently: no request is made and no
    /// state changes. Otherwise the user's message is appended
    /// optimistically, the buffer and any previous error flag are
    /// cleared, and further submissions are blocked until the backend
    /// answers. The acknowledgement only feeds the metadata mirror; the
    /// agent's actual answer arrives through the poll loop. On failure a
    /// local error message joins the log and the sticky error flag is
    /// raised.
    pub async fn submit(self: &Arc<Self>) {
        if self.cancel.is_cancelled() {
            return;
        }

        let query = {
            let mut inner = self.inner.write().await;
            if inner.state.submitting {
                tracing::debug!(target: "submit", "Submission already in flight, ignoring");
                return;
            }
            let query = inner.state.input.trim().to_string();
            if query.is_empty() {
                tracing::debug!(target: "submit", "Empty query, ignoring");
                return;
            }
            inner.state.messages.push(Message::user(query.clone()));
            inner.state.input.clear();
            inner.state.error = None;
            inner.state.submitting = true;
            query
        };

        let probe = Arc::clone(self);
        tokio::spawn(async move { probe.check_health().await });

        tracing::info!(target: "submit", "Submitting query ({} chars)", query.len());
        let result = self.backend.submit_query(&query).await;

        let mut inner = self.inner.write().await;
        if self.cancel.is_cancelled() {
            return;
        }
        match result {
            Ok(snapshot) => {
                inner.state.metadata.absorb(&snapshot);
                tracing::info!(target: "submit", "Query accepted");
            }
            Err(e) => {
                tracing::warn!(target: "submit", "Query failed: {}", e);
                inner.state.messages.push(Message::error(SUBMIT_ERROR_MESSAGE));
                inner.state.error = Some(SUBMIT_ERROR_FLAG.to_string());
            }
        }
        inner.state.submitting = false;
        inner.state.input.clear();
    }

    /// Asks the backend to halt the running task.
    ///
    /// Clears the submitting flag and error state up front so the UI
    /// unblocks immediately. The status line only changes if the backend
    /// acknowledges; a failed stop request is absorbed.
    pub async fn request_stop(self: &Arc<Self>) {
        if self.cancel.is_cancelled() {
            return;
        }

        {
            let mut inner = self.inner.write().await;
            inner.state.submitting = false;
            inner.state.error = None;
        }

        let probe = Arc::clone(self);
        tokio::spawn(async move { probe.check_health().await });

        match self.backend.request_stop().await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                if self.cancel.is_cancelled() {
                    return;
                }
                inner.state.status = Some(STOP_PENDING_STATUS.to_string());
                tracing::info!(target: "stop", "Stop requested");
            }
            Err(e) => {
                tracing::warn!(target: "stop", "Stop request failed: {}", e);
            }
        }
    }

    // ============================================================================
    // Local state accessors and mutators
    // ============================================================================

    /// Returns a point-in-time copy of the mirrored state.
    pub async fn snapshot(&self) -> EngineState {
        self.inner.read().await.state.clone()
    }

    /// Returns the conversation log.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.read().await.state.messages.clone()
    }

    /// Returns the latest connection observation.
    pub async fn connection(&self) -> ConnectionState {
        self.inner.read().await.state.connection
    }

    /// Returns the bytes of the current screenshot, if a live one exists.
    pub async fn screenshot_bytes(&self) -> Option<Vec<u8>> {
        let id = {
            self.inner
                .read()
                .await
                .state
                .metadata
                .screenshot
                .blob_id()
        }?;
        self.blobs.get(id).await
    }

    /// Replaces the input buffer.
    pub async fn set_input(&self, input: impl Into<String>) {
        self.inner.write().await.state.input = input.into();
    }

    /// Switches the active sideband view.
    pub async fn set_view(&self, view: View) {
        self.inner.write().await.state.view = view;
        tracing::debug!(target: "view", "Active view set to {}", view);
    }

    /// Adjusts the pane split, clamped to 0..=100 percent.
    pub async fn set_split_position(&self, percent: u8) {
        self.inner.write().await.state.split_position = percent.min(100);
    }

    /// Switches the theme and persists the choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written; the
    /// in-memory theme is left unchanged in that case.
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.prefs.set_theme(theme)?;
        self.inner.write().await.state.theme = theme;
        tracing::debug!(target: "prefs", "Theme set to {}", theme);
        Ok(())
    }

    /// Clears the conversation log.
    ///
    /// Metadata, connection state and the dedup cursor are untouched, so
    /// an answer that was already mirrored stays deduplicated even after
    /// a clear.
    pub async fn clear_history(&self) {
        self.inner.write().await.state.messages.clear();
        tracing::debug!(target: "command", "Conversation cleared");
    }
}
