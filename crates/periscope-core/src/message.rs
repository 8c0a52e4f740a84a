//! Conversation messages mirrored from the backend.

use crate::snapshot::AnswerSnapshot;
use serde::{Deserialize, Serialize};

/// Who a message belongs to in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed locally by the user
    User,
    /// Produced by a backend agent
    Agent,
    /// Local placeholder recorded when a submission fails
    Error,
}

/// One entry in the mirrored conversation log.
///
/// Agent messages carry the optional wire metadata they were born with so
/// exports can reconstruct attribution and reasoning. User and error
/// messages only ever have content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
            reasoning: None,
            agent_name: None,
            status: None,
            uid: None,
        }
    }

    /// Creates an agent message from a polled snapshot.
    pub fn agent(snapshot: &AnswerSnapshot) -> Self {
        Self {
            kind: MessageKind::Agent,
            content: snapshot.answer.clone().unwrap_or_default(),
            reasoning: snapshot.reasoning.clone(),
            agent_name: snapshot.agent_name.clone(),
            status: snapshot.status.clone(),
            uid: snapshot.uid.clone(),
        }
    }

    /// Creates a local error message.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            content: content.into(),
            reasoning: None,
            agent_name: None,
            status: None,
            uid: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_message_copies_snapshot_fields() {
        let snapshot = AnswerSnapshot {
            answer: Some("Done.".to_string()),
            reasoning: Some("It was easy.".to_string()),
            agent_name: Some("Coder".to_string()),
            status: Some("done".to_string()),
            uid: Some("u1".to_string()),
            ..Default::default()
        };
        let message = Message::agent(&snapshot);
        assert_eq!(message.kind, MessageKind::Agent);
        assert_eq!(message.content, "Done.");
        assert_eq!(message.agent_name.as_deref(), Some("Coder"));
        assert_eq!(message.uid.as_deref(), Some("u1"));
    }

    #[test]
    fn test_user_message_has_no_metadata() {
        let message = Message::user("hello");
        assert_eq!(message.kind, MessageKind::User);
        assert!(message.reasoning.is_none());
        assert!(message.uid.is_none());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MessageKind::Agent).unwrap();
        assert_eq!(json, "\"agent\"");
    }
}
