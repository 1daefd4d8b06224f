//! Notification system error types.
//!
//! Every notification error is non-fatal: callers fall back to an in-app
//! message and the timer keeps running.

use thiserror::Error;

/// Errors that can occur while delivering a desktop notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The notification server rejected or failed to show the notification.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),

    /// Desktop notifications are disabled or unsupported.
    #[error("Desktop notifications are not available")]
    NotAvailable,

    /// Invalid input provided to the notification system.
    #[error("Invalid notification input: {0}")]
    InvalidInput(String),
}

impl NotificationError {
    /// Returns true if retrying later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SendFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "Check that a notification daemon is running",
            Self::NotAvailable => "Run without --no-desktop to enable desktop notifications",
            Self::InvalidInput(_) => "Check the notification message",
        }
    }
}
