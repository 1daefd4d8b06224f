//! Screen flash error types.
//!
//! Flashing is best-effort: every error here is logged and otherwise
//! ignored.

use thiserror::Error;

/// Errors that can occur while flashing the display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlashError {
    /// The display tool is not installed.
    #[error("'{0}' was not found")]
    CommandNotFound(String),

    /// No connected primary output was reported.
    #[error("No primary display found")]
    NoPrimaryOutput,

    /// The display tool exited with an error.
    #[error("'{0}' failed: {1}")]
    ExecutionFailed(String, String),

    /// A display tool call did not finish in time.
    #[error("'xrandr' timed out after {0} ms")]
    Timeout(u64),
}

impl FlashError {
    /// Returns true if flashing cannot work on this system at all.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::CommandNotFound(_) | Self::NoPrimaryOutput)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::CommandNotFound(_) => "Install xrandr or run with --no-flash",
            Self::NoPrimaryOutput => "Mark a display as primary with xrandr --primary",
            Self::ExecutionFailed(..) | Self::Timeout(_) => {
                "Run with --no-flash to disable the screen flash"
            }
        }
    }
}
