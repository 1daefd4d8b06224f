//! Percentage-threshold notification triggers.
//!
//! The registry keeps triggers in insertion order. Each tick of a Work
//! period asks it which triggers have newly fired; a fired trigger stays
//! fired until it is explicitly re-armed.

use serde::{Deserialize, Serialize};

use super::error::TimerError;

// ============================================================================
// NotificationTrigger
// ============================================================================

/// A message to deliver when a Work period reaches a given elapsed percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTrigger {
    /// Elapsed percentage (0-100) at which the trigger fires
    #[serde(rename = "percent")]
    pub threshold_percent: f64,
    /// Text delivered when the trigger fires
    pub message: String,
    /// Whether the trigger has already fired in the current run
    #[serde(default, skip_serializing)]
    pub triggered: bool,
}

impl NotificationTrigger {
    /// Creates an armed trigger after validating its inputs.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidTrigger` if the threshold is outside
    /// 0-100 (or not a number) or the message is empty.
    pub fn new(threshold_percent: f64, message: impl Into<String>) -> Result<Self, TimerError> {
        let message = message.into();
        if !(0.0..=100.0).contains(&threshold_percent) {
            return Err(TimerError::InvalidTrigger(format!(
                "percentage must be between 0 and 100 (got {threshold_percent})"
            )));
        }
        if message.trim().is_empty() {
            return Err(TimerError::InvalidTrigger("message must not be empty".to_string()));
        }
        Ok(Self {
            threshold_percent,
            message,
            triggered: false,
        })
    }

    /// Returns true if this trigger should fire at `current_percent`.
    pub fn matches(&self, current_percent: f64, tolerance: f64) -> bool {
        !self.triggered && (current_percent - self.threshold_percent).abs() <= tolerance
    }
}

impl std::fmt::Display for NotificationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}% - {}", self.threshold_percent, self.message)
    }
}

/// Parses user-entered percentage text.
///
/// # Errors
///
/// Returns `TimerError::InvalidTrigger` if the text is not a number.
pub fn parse_percent(text: &str) -> Result<f64, TimerError> {
    text.trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| TimerError::InvalidTrigger(format!("'{text}' is not a valid number")))
}

// ============================================================================
// NotificationRegistry
// ============================================================================

/// Ordered collection of threshold triggers.
#[derive(Debug, Clone, Default)]
pub struct NotificationRegistry {
    triggers: Vec<NotificationTrigger>,
}

impl NotificationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a trigger.
    ///
    /// The registry is unchanged when validation fails.
    pub fn add(&mut self, threshold_percent: f64, message: impl Into<String>) -> Result<(), TimerError> {
        let trigger = NotificationTrigger::new(threshold_percent, message)?;
        self.triggers.push(trigger);
        Ok(())
    }

    /// Parses percentage text, then adds the trigger.
    pub fn add_from_text(&mut self, percent_text: &str, message: &str) -> Result<(), TimerError> {
        let percent = parse_percent(percent_text)?;
        self.add(percent, message)
    }

    /// Appends already-constructed triggers, re-validating each.
    pub fn extend<I>(&mut self, triggers: I) -> Result<(), TimerError>
    where
        I: IntoIterator<Item = NotificationTrigger>,
    {
        let mut validated = Vec::new();
        for trigger in triggers {
            validated.push(NotificationTrigger::new(trigger.threshold_percent, trigger.message)?);
        }
        self.triggers.extend(validated);
        Ok(())
    }

    /// Removes every trigger.
    pub fn clear(&mut self) {
        self.triggers.clear();
    }

    /// Marks every trigger as not yet fired.
    pub fn rearm(&mut self) {
        for trigger in &mut self.triggers {
            trigger.triggered = false;
        }
    }

    /// Returns the messages of triggers that fire at `current_percent`.
    ///
    /// Messages come back in insertion order, and every returned trigger is
    /// marked as fired so it cannot be returned again until re-armed.
    pub fn evaluate_and_mark(&mut self, current_percent: f64, tolerance: f64) -> Vec<String> {
        let mut fired = Vec::new();
        for trigger in &mut self.triggers {
            if trigger.matches(current_percent, tolerance) {
                trigger.triggered = true;
                fired.push(trigger.message.clone());
            }
        }
        fired
    }

    /// Returns the registered triggers in insertion order.
    pub fn triggers(&self) -> &[NotificationTrigger] {
        &self.triggers
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Returns true if no triggers are registered.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
