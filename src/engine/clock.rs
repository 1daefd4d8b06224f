//! Period countdown clock.
//!
//! A `PeriodClock` yields one `ClockSample` per tick interval, from the full
//! duration down to zero inclusive, then waits one more interval before
//! reporting completion. Every wait races the cancellation token, so a stop
//! request truncates the sequence at the next boundary.

use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::types::format_time;

/// Default spacing between samples.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Returns the firing window for threshold comparison.
///
/// Consecutive samples are `100 / total_seconds` percent apart; half of that
/// spacing puts every threshold within range of exactly one sample.
pub fn tolerance_for(total_seconds: u32) -> f64 {
    if total_seconds == 0 {
        return 50.0;
    }
    (100.0 / f64::from(total_seconds)) / 2.0
}

// ============================================================================
// ClockSample
// ============================================================================

/// One progress sample of a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSample {
    /// Seconds left in the period
    pub remaining_seconds: u32,
    /// Elapsed share of the period, 0 to 100
    pub elapsed_percent: f64,
}

impl ClockSample {
    /// Computes the sample for `remaining` seconds left out of `total_seconds`.
    pub fn at(total_seconds: u32, remaining: u32) -> Self {
        let elapsed_percent = if total_seconds == 0 {
            100.0
        } else {
            let elapsed = total_seconds.saturating_sub(remaining);
            f64::from(elapsed) / f64::from(total_seconds) * 100.0
        };
        Self {
            remaining_seconds: remaining,
            elapsed_percent,
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn time_text(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

// ============================================================================
// PeriodClock
// ============================================================================

/// How a clock's sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pending,
    Completed,
    Cancelled,
}

/// Lazy, cancellable countdown over a single period.
///
/// The sequence is finite and cannot be restarted; create a new clock for
/// the next period.
pub struct PeriodClock {
    total_seconds: u32,
    next_remaining: Option<u32>,
    tick_interval: Duration,
    ticker: Option<Interval>,
    cancel: CancellationToken,
    outcome: Outcome,
}

impl PeriodClock {
    /// Creates a clock counting down `total_seconds` samples.
    pub fn new(total_seconds: u32, tick_interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            total_seconds,
            next_remaining: Some(total_seconds),
            tick_interval,
            ticker: None,
            cancel,
            outcome: Outcome::Pending,
        }
    }

    /// Creates a clock for a period of `minutes`.
    pub fn for_minutes(minutes: u32, tick_interval: Duration, cancel: CancellationToken) -> Self {
        Self::new(minutes.saturating_mul(60), tick_interval, cancel)
    }

    /// Total number of seconds in the period.
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Firing window for threshold triggers in this period.
    pub fn tolerance(&self) -> f64 {
        tolerance_for(self.total_seconds)
    }

    /// Returns true once the period ran out without being cancelled.
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    /// Returns true if the sequence ended because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.outcome == Outcome::Cancelled
    }

    /// Waits for and returns the next sample.
    ///
    /// The first sample is produced immediately. Returns `None` when the
    /// period is exhausted (after one trailing interval) or cancelled.
    pub async fn next_tick(&mut self) -> Option<ClockSample> {
        if self.outcome != Outcome::Pending {
            return None;
        }

        if self.cancel.is_cancelled() {
            self.outcome = Outcome::Cancelled;
            return None;
        }

        let period = self.tick_interval;
        let ticker = self.ticker.get_or_insert_with(|| {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.outcome = Outcome::Cancelled;
                return None;
            }
            _ = ticker.tick() => {}
        }

        match self.next_remaining {
            Some(remaining) => {
                self.next_remaining = remaining.checked_sub(1);
                Some(ClockSample::at(self.total_seconds, remaining))
            }
            None => {
                self.outcome = Outcome::Completed;
                None
            }
        }
    }

    /// Returns every sample of a period without waiting.
    pub fn samples(total_seconds: u32) -> impl Iterator<Item = ClockSample> {
        (0..=total_seconds)
            .rev()
            .map(move |remaining| ClockSample::at(total_seconds, remaining))
    }
}

// ============================================================================
// Tests
// ============================================================================
