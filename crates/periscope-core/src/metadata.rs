//! Sideband metadata mirrored alongside the conversation log.

use crate::snapshot::{AnswerSnapshot, ExecutionBlock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Handle to the most recent screenshot.
///
/// `Placeholder` means "no live image": either nothing was fetched yet or
/// the last fetch failed. `Blob` points into the blob store and its holder
/// is responsible for releasing the previous handle when replacing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenshotRef {
    #[default]
    Placeholder,
    Blob(Uuid),
}

impl ScreenshotRef {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// The blob id, if this handle points at a live image.
    pub fn blob_id(&self) -> Option<Uuid> {
        match self {
            Self::Blob(id) => Some(*id),
            Self::Placeholder => None,
        }
    }
}

/// The non-conversational slice of the mirror: execution blocks, task
/// progress and the current screenshot handle.
///
/// `absorb` applies one polled snapshot. Blocks are sticky so a transient
/// snapshot without blocks does not blank the panel the user is looking
/// at; every other field tracks the wire verbatim, including going back
/// to absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub blocks: Option<HashMap<String, ExecutionBlock>>,
    pub done: Option<bool>,
    pub answer: Option<String>,
    pub agent_name: Option<String>,
    pub status: Option<String>,
    pub last_uid: Option<String>,
    pub screenshot: ScreenshotRef,
    pub screenshot_captured_at: Option<DateTime<Utc>>,
}

impl ResponseMetadata {
    /// Merges one snapshot into the metadata view.
    ///
    /// The screenshot fields are owned by the screenshot fetcher and are
    /// never touched here.
    pub fn absorb(&mut self, snapshot: &AnswerSnapshot) {
        if let Some(blocks) = &snapshot.blocks {
            self.blocks = Some(blocks.clone());
        }
        self.done = snapshot.done;
        self.answer = snapshot.answer.clone();
        self.agent_name = snapshot.agent_name.clone();
        self.status = snapshot.status.clone();
        self.last_uid = snapshot.uid.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(code: &str) -> ExecutionBlock {
        ExecutionBlock {
            tool_type: "bash".to_string(),
            code: code.to_string(),
            feedback: String::new(),
            success: true,
        }
    }

    #[test]
    fn test_absorb_keeps_previous_blocks_when_snapshot_has_none() {
        let mut metadata = ResponseMetadata::default();
        metadata.absorb(&AnswerSnapshot {
            blocks: Some(HashMap::from([("0".to_string(), block("ls"))])),
            done: Some(false),
            ..Default::default()
        });
        metadata.absorb(&AnswerSnapshot {
            blocks: None,
            done: Some(true),
            ..Default::default()
        });

        let blocks = metadata.blocks.as_ref().unwrap();
        assert_eq!(blocks["0"].code, "ls");
        assert_eq!(metadata.done, Some(true));
    }

    #[test]
    fn test_absorb_replaces_blocks_when_snapshot_has_some() {
        let mut metadata = ResponseMetadata::default();
        metadata.absorb(&AnswerSnapshot {
            blocks: Some(HashMap::from([("0".to_string(), block("ls"))])),
            ..Default::default()
        });
        metadata.absorb(&AnswerSnapshot {
            blocks: Some(HashMap::from([("1".to_string(), block("pwd"))])),
            ..Default::default()
        });

        let blocks = metadata.blocks.as_ref().unwrap();
        assert!(!blocks.contains_key("0"));
        assert_eq!(blocks["1"].code, "pwd");
    }

    #[test]
    fn test_absorb_clears_scalar_fields_absent_from_snapshot() {
        let mut metadata = ResponseMetadata::default();
        metadata.absorb(&AnswerSnapshot {
            agent_name: Some("Coder".to_string()),
            status: Some("working".to_string()),
            uid: Some("u1".to_string()),
            ..Default::default()
        });
        metadata.absorb(&AnswerSnapshot::default());

        assert!(metadata.agent_name.is_none());
        assert!(metadata.status.is_none());
        assert!(metadata.last_uid.is_none());
    }

    #[test]
    fn test_absorb_never_touches_screenshot_fields() {
        let id = Uuid::new_v4();
        let mut metadata = ResponseMetadata {
            screenshot: ScreenshotRef::Blob(id),
            ..Default::default()
        };
        metadata.absorb(&AnswerSnapshot::default());
        assert_eq!(metadata.screenshot.blob_id(), Some(id));
    }
}
