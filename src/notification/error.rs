//! Notification error types.

use thiserror::Error;

/// Errors that can occur while dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification daemon rejected or never received the request.
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => {
                "check that a notification daemon is running, or turn notifications off with `tomato-focus settings set complete-notification off`"
            }
        }
    }
}
