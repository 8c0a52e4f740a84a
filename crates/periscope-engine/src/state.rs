//! The mirrored view of the backend, as one plain value.

use periscope_core::connection::ConnectionState;
use periscope_core::message::Message;
use periscope_core::metadata::ResponseMetadata;
use periscope_core::theme::Theme;
use periscope_core::view::View;
use serde::Serialize;

/// Status line shown before the first poll lands.
pub const INITIAL_STATUS: &str = "Agents ready";

/// Split position (percent) given to the conversation pane by default.
pub const BALANCED_SPLIT: u8 = 50;

/// Everything a consumer needs to render the client, mirrored from the
/// backend plus local-only UI state.
///
/// The engine hands out clones of this struct. A clone is a consistent
/// point-in-time view; it never changes after being handed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineState {
    /// Conversation log in arrival order.
    pub messages: Vec<Message>,
    /// Sideband metadata (blocks, progress, screenshot handle).
    pub metadata: ResponseMetadata,
    /// Latest health probe observation.
    pub connection: ConnectionState,
    /// Human-readable status line, if the backend reported one.
    pub status: Option<String>,
    /// Whether a submission is currently in flight.
    pub submitting: bool,
    /// Sticky submission error flag, cleared on the next submission.
    pub error: Option<String>,
    /// Text the user has typed but not yet submitted.
    pub input: String,
    /// Which sideband panel is active.
    pub view: View,
    /// Percent of the window given to the conversation pane.
    pub split_position: u8,
    /// Active color theme.
    pub theme: Theme,
}

impl EngineState {
    /// Creates the pre-first-poll state.
    pub fn new(theme: Theme) -> Self {
        Self {
            messages: Vec::new(),
            metadata: ResponseMetadata::default(),
            connection: ConnectionState::default(),
            status: Some(INITIAL_STATUS.to_string()),
            submitting: false,
            error: None,
            input: String::new(),
            view: View::default(),
            split_position: BALANCED_SPLIT,
            theme,
        }
    }
}
