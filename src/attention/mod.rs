//! Best-effort attention side effects.
//!
//! When a notification fires, the console observer may briefly pulse the
//! display brightness. Failures never reach the timer; they are logged and
//! dropped.

pub mod error;
pub mod xrandr;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub use error::FlashError;
pub use xrandr::{find_primary_output, XrandrFlasher};

/// Capability for drawing the user's attention to the screen.
pub trait ScreenFlasher: Send + Sync + 'static {
    /// Attempts one flash.
    fn flash(&self) -> impl Future<Output = Result<(), FlashError>> + Send;

    /// Returns true if flashing may work on this system.
    fn is_available(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct MockScreenFlasher {
    flash_count: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockScreenFlasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn flash_count(&self) -> usize {
        self.flash_count.load(Ordering::SeqCst)
    }
}

impl ScreenFlasher for MockScreenFlasher {
    async fn flash(&self) -> Result<(), FlashError> {
        self.flash_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(FlashError::NoPrimaryOutput);
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}
