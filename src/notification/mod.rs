//! Desktop notification delivery.
//!
//! This module provides:
//!
//! - The `NotificationSender` capability used by the console observer
//! - A `notify-rust` implementation for the platform notification service
//! - Delivery with an in-app fallback when the desktop path fails
//! - A mock sender for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use productivity_timer::notification::{deliver_with_fallback, DesktopNotifier};
//!
//! let notifier = DesktopNotifier::new(true);
//! deliver_with_fallback(&notifier, "Work period completed!", |message| {
//!     println!("{message}");
//! });
//! ```

mod desktop;
pub mod error;

pub use self::desktop::{DesktopNotifier, APP_TITLE};
pub use self::error::NotificationError;

use tracing::{debug, warn};

/// Capability for showing a notification outside the terminal.
pub trait NotificationSender: Send + Sync {
    /// Shows `message` to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be shown.
    fn send(&self, message: &str) -> Result<(), NotificationError>;

    /// Returns true if the sender is expected to work.
    fn is_available(&self) -> bool;
}

/// How a notification ended up reaching the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Shown by the desktop notification service
    Desktop,
    /// Shown in-app because the desktop path was unavailable or failed
    Fallback,
}

/// Sends a notification, falling back to `fallback` if the sender fails.
///
/// Errors are logged and never returned.
pub fn deliver_with_fallback<S, F>(sender: &S, message: &str, fallback: F) -> Delivery
where
    S: NotificationSender + ?Sized,
    F: FnOnce(&str),
{
    if !sender.is_available() {
        fallback(message);
        return Delivery::Fallback;
    }

    match sender.send(message) {
        Ok(()) => Delivery::Desktop,
        Err(e) => {
            if e.is_transient() {
                warn!(
                    suggestion = e.suggestion(),
                    "desktop notification failed, showing in-app: {}", e
                );
            } else {
                debug!("desktop notification skipped, showing in-app: {}", e);
            }
            fallback(message);
            Delivery::Fallback
        }
    }
}

// ============================================================================
// MockNotificationSender
// ============================================================================

#[derive(Debug, Default)]
pub struct MockNotificationSender {
    notifications: std::sync::Mutex<Vec<String>>,
    available: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
            available: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<String> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().map(|n| n.len()).unwrap_or(0)
    }
}

impl NotificationSender for MockNotificationSender {
    fn send(&self, message: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(message.to_string());
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }
}
