//! The static command palette.

use serde::Serialize;

/// One palette entry. Commands are identified by a stable string id;
/// labels and icons are presentation hints for consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Command {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Every command the client understands, in palette display order.
pub const COMMANDS: &[Command] = &[
    Command {
        id: "clear",
        label: "Clear Chat History",
        icon: "🗑️",
    },
    Command {
        id: "export",
        label: "Export Conversation",
        icon: "📥",
    },
    Command {
        id: "theme-light",
        label: "Theme: Light Mode",
        icon: "☀️",
    },
    Command {
        id: "theme-dark",
        label: "Theme: Dark Mode",
        icon: "🌙",
    },
    Command {
        id: "theme-hacker",
        label: "Theme: Hacker Mode",
        icon: "👨‍💻",
    },
    Command {
        id: "layout-chat",
        label: "Layout: Focus Chat (70/30)",
        icon: "💬",
    },
    Command {
        id: "layout-code",
        label: "Layout: Focus Code (30/70)",
        icon: "🖥️",
    },
    Command {
        id: "layout-balanced",
        label: "Layout: Balanced (50/50)",
        icon: "⚖️",
    },
];

/// Looks up a command descriptor by id.
pub fn find(id: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.id == id)
}
