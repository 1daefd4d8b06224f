//! Desktop notifications through the platform notification service.

use notify_rust::{Notification, Timeout};
use tracing::debug;

use super::error::NotificationError;
use super::NotificationSender;

/// Title shown on every notification.
pub const APP_TITLE: &str = "Productivity Timer";

/// How long a notification stays on screen, in milliseconds.
const DISPLAY_TIMEOUT_MS: u32 = 10_000;

/// Sends notifications with `notify-rust`.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NotificationSender for DesktopNotifier {
    fn send(&self, message: &str) -> Result<(), NotificationError> {
        if !self.enabled {
            return Err(NotificationError::NotAvailable);
        }
        if message.is_empty() {
            return Err(NotificationError::InvalidInput("empty message".to_string()));
        }

        Notification::new()
            .appname(APP_TITLE)
            .summary(APP_TITLE)
            .body(message)
            .icon("dialog-information")
            .timeout(Timeout::Milliseconds(DISPLAY_TIMEOUT_MS))
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        debug!(message, "desktop notification sent");
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.enabled
    }
}
