//! Timer engine error types.
//!
//! Both error kinds are recoverable at the boundary where they are detected:
//! a bad duration stops the current run, a bad trigger is simply rejected.

use thiserror::Error;

use crate::types::PeriodKind;

/// Hint shown whenever a work or break duration is rejected.
pub const INVALID_SETTINGS_HINT: &str = "Please enter valid numbers for timer settings!";

/// Errors surfaced by the timer engine and its trigger registry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimerError {
    /// Work or break minutes were not a positive integer.
    #[error("Invalid {} duration '{input}': enter a positive whole number of minutes", .kind.as_str())]
    InvalidDuration {
        /// Period whose duration was rejected
        kind: PeriodKind,
        /// Raw text that failed to parse
        input: String,
    },

    /// A threshold trigger could not be added.
    #[error("Invalid notification: {0}")]
    InvalidTrigger(String),
}

impl TimerError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => INVALID_SETTINGS_HINT,
            Self::InvalidTrigger(_) => {
                "Please enter valid percentage (0-100) and message"
            }
        }
    }
}
