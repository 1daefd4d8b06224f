//! Core data types for the Productivity Timer.
//!
//! This module defines the data structures used for:
//! - Period and engine state enums
//! - Timer configuration held as raw user input, validated at period start
//! - The trigger lifecycle policy across Work periods
//! - Serializable status snapshots

use serde::{Deserialize, Serialize};

use crate::engine::error::TimerError;

/// Default work period length in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 60;

/// Default break period length in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 15;

// ============================================================================
// PeriodKind
// ============================================================================

/// The kind of countdown currently active.
///
/// Periods alternate strictly: Work → Break → Work → …
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// Focused work period; threshold triggers are evaluated here
    #[default]
    Work,
    /// Break period; triggers are ignored
    Break,
}

impl PeriodKind {
    /// Returns the string representation of the period.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Work => "work",
            PeriodKind::Break => "break",
        }
    }

    /// Returns the capitalized label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            PeriodKind::Work => "Work",
            PeriodKind::Break => "Break",
        }
    }

    /// Returns the period that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            PeriodKind::Work => PeriodKind::Break,
            PeriodKind::Break => PeriodKind::Work,
        }
    }

    /// Message announced when a period of this kind runs to completion.
    pub fn completion_message(&self) -> &'static str {
        match self {
            PeriodKind::Work => "Work period completed!",
            PeriodKind::Break => "Break period completed!",
        }
    }
}

// ============================================================================
// EngineState
// ============================================================================

/// Run state of the timer engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Never started, or fully reset
    #[default]
    Idle,
    /// A countdown loop is active
    Running,
    /// Halted by the user or by a configuration error; resumable via start
    Stopped,
}

impl EngineState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Running => "running",
            EngineState::Stopped => "stopped",
        }
    }

    /// Returns true if a countdown loop is active.
    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::Running)
    }
}

// ============================================================================
// TriggerLifecycle
// ============================================================================

/// What happens to threshold triggers when a Work period ends.
///
/// Every policy resets the `triggered` flags on `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerLifecycle {
    /// Remove every trigger once a Work period completes
    #[default]
    ClearAfterWork,
    /// Keep triggers and re-arm them at the start of every Work period
    RearmEachWork,
    /// Keep triggers; each fires at most once until the next start
    OncePerRun,
}

impl TriggerLifecycle {
    /// Returns the string representation of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerLifecycle::ClearAfterWork => "clear-after-work",
            TriggerLifecycle::RearmEachWork => "rearm-each-work",
            TriggerLifecycle::OncePerRun => "once-per-run",
        }
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Period lengths as entered by the user.
///
/// Values are stored verbatim and parsed when a period starts, so an invalid
/// entry only surfaces once the engine tries to use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work duration in minutes (raw text)
    pub work_minutes: String,
    /// Break duration in minutes (raw text)
    pub break_minutes: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

impl TimerConfig {
    /// Creates a configuration from already-validated minute values.
    pub fn from_minutes(work: u32, break_minutes: u32) -> Self {
        Self {
            work_minutes: work.to_string(),
            break_minutes: break_minutes.to_string(),
        }
    }

    /// Returns the raw text configured for the given period kind.
    pub fn raw_minutes(&self, kind: PeriodKind) -> &str {
        match kind {
            PeriodKind::Work => &self.work_minutes,
            PeriodKind::Break => &self.break_minutes,
        }
    }

    /// Replaces the raw text for the given period kind.
    pub fn set_raw_minutes(&mut self, kind: PeriodKind, text: impl Into<String>) {
        match kind {
            PeriodKind::Work => self.work_minutes = text.into(),
            PeriodKind::Break => self.break_minutes = text.into(),
        }
    }

    /// Parses the minutes for the given period kind.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` unless the text is a positive integer.
    pub fn minutes(&self, kind: PeriodKind) -> Result<u32, TimerError> {
        parse_minutes(kind, self.raw_minutes(kind))
    }
}

/// Parses user-entered minutes into a positive integer.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `TimerError::InvalidDuration` for anything other than a positive integer.
pub fn parse_minutes(kind: PeriodKind, text: &str) -> Result<u32, TimerError> {
    match text.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(TimerError::InvalidDuration {
            kind,
            input: text.to_string(),
        }),
    }
}

/// Formats remaining seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so two hours reads `120:00`.
pub fn format_time(remaining_seconds: u32) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

// ============================================================================
// EngineStatus
// ============================================================================

/// Point-in-time view of the engine for status displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Current run state
    pub state: EngineState,
    /// Active (or next) period kind
    pub period: PeriodKind,
    /// Seconds left in the current period (0 when not running)
    pub remaining_seconds: u32,
    /// Elapsed percentage of the current period
    pub elapsed_percent: f64,
    /// Configured period lengths
    pub config: TimerConfig,
    /// Number of registered triggers
    pub trigger_count: usize,
    /// What happens to triggers when a Work period ends
    pub lifecycle: TriggerLifecycle,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod period_kind_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(PeriodKind::default(), PeriodKind::Work);
        }

        #[test]
        fn test_next_alternates() {
            assert_eq!(PeriodKind::Work.next(), PeriodKind::Break);
            assert_eq!(PeriodKind::Break.next(), PeriodKind::Work);
        }

        #[test]
        fn test_completion_message() {
            assert_eq!(PeriodKind::Work.completion_message(), "Work period completed!");
            assert_eq!(PeriodKind::Break.completion_message(), "Break period completed!");
        }

        #[test]
        fn test_serialize() {
            assert_eq!(serde_json::to_string(&PeriodKind::Break).unwrap(), "\"break\"");
        }
    }

    mod engine_state_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(EngineState::default(), EngineState::Idle);
        }

        #[test]
        fn test_is_running() {
            assert!(EngineState::Running.is_running());
            assert!(!EngineState::Idle.is_running());
            assert!(!EngineState::Stopped.is_running());
        }
    }

    mod timer_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = TimerConfig::default();
            assert_eq!(config.minutes(PeriodKind::Work).unwrap(), 60);
            assert_eq!(config.minutes(PeriodKind::Break).unwrap(), 15);
        }

        #[test]
        fn test_set_raw_minutes() {
            let mut config = TimerConfig::default();
            config.set_raw_minutes(PeriodKind::Break, "7");
            assert_eq!(config.break_minutes, "7");
            assert_eq!(config.minutes(PeriodKind::Break).unwrap(), 7);
        }

        #[test]
        fn test_invalid_text_is_kept_but_rejected() {
            let mut config = TimerConfig::default();
            config.set_raw_minutes(PeriodKind::Work, "abc");
            assert_eq!(config.raw_minutes(PeriodKind::Work), "abc");
            assert!(matches!(
                config.minutes(PeriodKind::Work),
                Err(TimerError::InvalidDuration { kind: PeriodKind::Work, .. })
            ));
        }

        #[test]
        fn test_parse_minutes() {
            assert_eq!(parse_minutes(PeriodKind::Work, " 25 ").unwrap(), 25);
            assert!(parse_minutes(PeriodKind::Work, "0").is_err());
            assert!(parse_minutes(PeriodKind::Work, "-5").is_err());
            assert!(parse_minutes(PeriodKind::Work, "2.5").is_err());
            assert!(parse_minutes(PeriodKind::Work, "").is_err());
        }
    }

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time() {
            assert_eq!(format_time(0), "00:00");
            assert_eq!(format_time(59), "00:59");
            assert_eq!(format_time(60), "01:00");
            assert_eq!(format_time(3599), "59:59");
            assert_eq!(format_time(7200), "120:00");
        }
    }

    #[test]
    fn test_trigger_lifecycle_serde() {
        let json = serde_json::to_string(&TriggerLifecycle::RearmEachWork).unwrap();
        assert_eq!(json, "\"rearm-each-work\"");
        assert_eq!(TriggerLifecycle::default(), TriggerLifecycle::ClearAfterWork);
        for lifecycle in [
            TriggerLifecycle::ClearAfterWork,
            TriggerLifecycle::RearmEachWork,
            TriggerLifecycle::OncePerRun,
        ] {
            let json = serde_json::to_string(&lifecycle).unwrap();
            assert_eq!(json, format!("\"{}\"", lifecycle.as_str()));
        }
    }
}
