//! Wire-level snapshot of the backend's most recent answer.
//!
//! The backend exposes a single "latest answer" document that is re-fetched
//! on every poll. Every field is optional on the wire: an idle backend, a
//! backend mid-task, and a backend that restarted all produce different
//! partial documents, and the client must accept all of them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One tool execution reported by the backend (a code run, a shell command,
/// a web search and so on), keyed by an opaque identifier in the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBlock {
    /// Which tool produced the block ("code", "bash", "web_search", ...)
    #[serde(default)]
    pub tool_type: String,
    /// The tool input, e.g. the source that was executed
    #[serde(default, rename = "block")]
    pub code: String,
    /// Tool output or interpreter feedback
    #[serde(default)]
    pub feedback: String,
    /// Whether the backend judged the execution successful
    #[serde(default)]
    pub success: bool,
}

/// The latest-answer document as served by the backend.
///
/// A snapshot may describe a brand new answer, repeat an answer the client
/// has already seen (polling is stateless on the server side), or carry no
/// answer at all while agents are still working.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    /// Final answer text, absent or empty while agents are working
    #[serde(default)]
    pub answer: Option<String>,
    /// Chain-of-thought / reasoning trace attached to the answer
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Name of the agent that produced the answer
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Human-readable backend status line
    #[serde(default)]
    pub status: Option<String>,
    /// Unique identifier of the answer, stable across repeated polls
    #[serde(default)]
    pub uid: Option<String>,
    /// Tool executions that contributed to the answer
    #[serde(default)]
    pub blocks: Option<HashMap<String, ExecutionBlock>>,
    /// Whether the backend considers the current task finished
    #[serde(default)]
    pub done: Option<bool>,
}

impl AnswerSnapshot {
    /// Whether the snapshot carries a displayable answer.
    ///
    /// An absent answer and a whitespace-only answer are equivalent: both
    /// mean "nothing to show yet".
    pub fn has_answer(&self) -> bool {
        self.answer
            .as_deref()
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false)
    }
}
