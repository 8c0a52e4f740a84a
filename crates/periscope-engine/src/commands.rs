//! Command dispatch and conversation export.

use crate::engine::SyncEngine;
use crate::state::BALANCED_SPLIT;
use chrono::Utc;
use periscope_core::message::{Message, MessageKind};
use periscope_core::theme::Theme;
use periscope_core::{PeriscopeError, Result};
use periscope_infrastructure::PeriscopePaths;
use std::path::{Path, PathBuf};

/// Pane split when the conversation gets the wide side.
const CHAT_FOCUS_SPLIT: u8 = 70;
/// Pane split when the code panel gets the wide side.
const CODE_FOCUS_SPLIT: u8 = 30;

impl SyncEngine {
    /// Runs a palette command by id.
    ///
    /// The ids are the ones listed in
    /// [`periscope_core::command::COMMANDS`].
    ///
    /// # Errors
    ///
    /// Returns [`PeriscopeError::UnknownCommand`] for an unrecognized id,
    /// and propagates persistence errors from the theme and export
    /// commands.
    pub async fn run_command(&self, id: &str) -> Result<()> {
        tracing::debug!(target: "command", "Running command '{}'", id);
        match id {
            "clear" => {
                self.clear_history().await;
                Ok(())
            }
            "export" => self.export_transcript().await.map(|_| ()),
            "theme-light" => self.set_theme(Theme::Light).await,
            "theme-dark" => self.set_theme(Theme::Dark).await,
            "theme-hacker" => self.set_theme(Theme::Hacker).await,
            "layout-chat" => {
                self.set_split_position(CHAT_FOCUS_SPLIT).await;
                Ok(())
            }
            "layout-code" => {
                self.set_split_position(CODE_FOCUS_SPLIT).await;
                Ok(())
            }
            "layout-balanced" => {
                self.set_split_position(BALANCED_SPLIT).await;
                Ok(())
            }
            other => Err(PeriscopeError::unknown_command(other)),
        }
    }

    /// Exports the conversation to the default exports directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be resolved or the file
    /// cannot be written.
    pub async fn export_transcript(&self) -> Result<PathBuf> {
        let dir =
            PeriscopePaths::exports_dir().map_err(|e| PeriscopeError::config(e.to_string()))?;
        self.export_transcript_to(&dir).await
    }

    /// Exports the conversation as Markdown into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub async fn export_transcript_to(&self, dir: &Path) -> Result<PathBuf> {
        let messages = self.messages().await;
        let content = render_transcript(&messages);

        std::fs::create_dir_all(dir)?;
        let filename = format!(
            "periscope-chat-{}.md",
            Utc::now().format("%Y-%m-%dT%H-%M-%SZ")
        );
        let path = dir.join(filename);
        std::fs::write(&path, content)?;

        tracing::info!(
            target: "command",
            "Exported {} messages to {}",
            messages.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Renders the conversation log as a Markdown transcript.
///
/// Each message becomes a `###` section headed by its speaker. User
/// messages are headed "User"; agent and error messages are headed by the
/// agent's name when one was recorded, falling back to "Agent". A
/// recorded reasoning trace follows the content as a quoted line.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let role = match message.kind {
                MessageKind::User => "User",
                _ => message.agent_name.as_deref().unwrap_or("Agent"),
            };
            let reasoning = message
                .reasoning
                .as_ref()
                .map(|r| format!("> **Reasoning:** {r}\n"))
                .unwrap_or_default();
            format!("### {role}\n{}\n{reasoning}\n---\n", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
