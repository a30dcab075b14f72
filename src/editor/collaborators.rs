//! Outside components the editor talks to
//!
//! The editor never draws anything or touches the system clipboard or file
//! system itself. Front ends plug in implementations of these traits.

use std::time::Duration;

use thiserror::Error;

use crate::renderer::Export;

/// Shows the rendered output
pub trait Preview {
    fn update(&mut self, html: &str);
}

/// Receives copied text
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Why a save did not complete
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The user dismissed the save dialog
    #[error("save cancelled")]
    Cancelled,
    #[error("save failed: {0}")]
    Failed(String),
}

/// Writes exported output somewhere the user chose
pub trait FileSaver {
    fn save(&mut self, export: &Export, contents: &str) -> Result<(), SaveError>;
}

/// Tone of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient, auto-dismissing message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    /// Time before it dismisses itself
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            duration,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            duration,
        }
    }
}

/// Displays notifications
pub trait Notifier {
    fn show(&mut self, notification: Notification);
}
