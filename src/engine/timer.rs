//! Timer engine for the Productivity Timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running → Stopped, Reset → Idle)
//! - A cancellable countdown task per run, alternating Work and Break periods
//! - Threshold trigger evaluation during Work periods
//! - Event delivery to consumers over an unbounded channel

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::clock::{ClockSample, PeriodClock, TICK_INTERVAL};
use super::error::TimerError;
use super::registry::{NotificationRegistry, NotificationTrigger};
use crate::types::{
    format_time, parse_minutes, EngineState, EngineStatus, PeriodKind, TimerConfig,
    TriggerLifecycle,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// One progress sample
    Tick {
        /// Remaining seconds in the period
        remaining_seconds: u32,
        /// Elapsed share of the period, 0 to 100
        elapsed_percent: f64,
        /// Remaining time as `MM:SS`
        time_text: String,
    },
    /// A threshold trigger fired or a period completed
    Notification {
        /// Text to show the user
        message: String,
    },
    /// A period began counting down
    PeriodStarted {
        /// Kind of the new period
        kind: PeriodKind,
    },
    /// A period ran to completion
    PeriodCompleted {
        /// Kind of the finished period
        kind: PeriodKind,
    },
    /// Human-readable status line
    Status {
        /// Status text
        message: String,
    },
    /// The run was halted
    Stopped,
    /// The run was aborted because a period length was invalid
    FatalConfigError {
        /// Error description
        message: String,
    },
}

impl TimerEvent {
    fn tick(sample: ClockSample) -> Self {
        TimerEvent::Tick {
            remaining_seconds: sample.remaining_seconds,
            elapsed_percent: sample.elapsed_percent,
            time_text: sample.time_text(),
        }
    }

    fn status(message: impl Into<String>) -> Self {
        TimerEvent::Status {
            message: message.into(),
        }
    }

    /// Progress snapshot shown while idle.
    pub fn idle_tick() -> Self {
        TimerEvent::Tick {
            remaining_seconds: 0,
            elapsed_percent: 0.0,
            time_text: format_time(0),
        }
    }
}

// ============================================================================
// Shared state
// ============================================================================

/// Run bookkeeping guarded by a single lock.
#[derive(Debug, Default)]
struct RunStatus {
    state: EngineState,
    period: PeriodKind,
    /// Incremented on every start, stop and reset; a loop only mutates
    /// state while its own id is current.
    run_id: u64,
    last_sample: Option<ClockSample>,
}

/// State shared between the engine handle and its countdown task.
#[derive(Debug, Default)]
struct Shared {
    config: Mutex<TimerConfig>,
    registry: Mutex<NotificationRegistry>,
    status: Mutex<RunStatus>,
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the run state and spawns the countdown task.
///
/// `start` must be called from within a tokio runtime.
pub struct TimerEngine {
    shared: Arc<Shared>,
    /// Configuration restored by `reset`
    defaults: TimerConfig,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    tick_interval: Duration,
    lifecycle: TriggerLifecycle,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl TimerEngine {
    /// Creates a new engine with the given configuration and event channel.
    ///
    /// The configuration also becomes the defaults restored by `reset`.
    pub fn new(config: TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let shared = Shared {
            config: Mutex::new(config.clone()),
            ..Shared::default()
        };
        Self {
            shared: Arc::new(shared),
            defaults: config,
            event_tx,
            tick_interval: TICK_INTERVAL,
            lifecycle: TriggerLifecycle::default(),
            cancel: None,
            task: None,
        }
    }

    /// Sets the spacing between samples (one second by default).
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Sets what happens to triggers when a Work period ends.
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: TriggerLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    // ------------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------------

    /// Starts a run in the current period.
    ///
    /// Does nothing and returns `false` if a run is already active.
    /// Otherwise re-arms every trigger and spawns the countdown task.
    pub fn start(&mut self) -> bool {
        let run_id = {
            let mut status = lock(&self.shared.status);
            if status.state.is_running() {
                debug!("start ignored: timer already running");
                return false;
            }
            lock(&self.shared.registry).rearm();
            status.state = EngineState::Running;
            status.run_id += 1;
            status.run_id
        };

        let cancel = CancellationToken::new();
        let countdown = Countdown {
            shared: Arc::clone(&self.shared),
            event_tx: self.event_tx.clone(),
            cancel: cancel.clone(),
            run_id,
            tick_interval: self.tick_interval,
            lifecycle: self.lifecycle,
        };

        if let Some(previous) = self.cancel.replace(cancel) {
            previous.cancel();
        }
        self.task = Some(tokio::spawn(countdown.run()));
        info!(run_id, "timer started");
        true
    }

    /// Stops the active run.
    ///
    /// The countdown task observes the cancellation at its next wait and
    /// exits without emitting further ticks. Calling this when nothing is
    /// running has no effect.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        let was_running = {
            let mut status = lock(&self.shared.status);
            status.run_id += 1;
            if status.state.is_running() {
                status.state = EngineState::Stopped;
                status.last_sample = None;
                true
            } else {
                false
            }
        };

        if was_running {
            info!("timer stopped");
            self.emit(TimerEvent::status("Stopped"));
            self.emit(TimerEvent::Stopped);
        }
    }

    /// Stops the run and restores everything to the initial state.
    ///
    /// Restores the default configuration, clears all triggers, returns to a
    /// Work period and emits an idle progress snapshot.
    pub fn reset(&mut self) {
        self.stop();

        *lock(&self.shared.config) = self.defaults.clone();
        lock(&self.shared.registry).clear();
        {
            let mut status = lock(&self.shared.status);
            status.state = EngineState::Idle;
            status.period = PeriodKind::Work;
            status.last_sample = None;
            status.run_id += 1;
        }

        info!("timer reset");
        self.emit(TimerEvent::idle_tick());
        self.emit(TimerEvent::status("Ready"));
    }

    /// Waits for the countdown task of the latest run to exit.
    ///
    /// Returns immediately if no task was spawned.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("countdown task ended abnormally: {}", e);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Configuration input
    // ------------------------------------------------------------------------

    /// Sets the work period length from user text.
    ///
    /// The text is stored even when invalid; it is validated again when the
    /// next Work period starts.
    pub fn set_work_minutes(&self, text: &str) -> Result<u32, TimerError> {
        self.set_minutes(PeriodKind::Work, text)
    }

    /// Sets the break period length from user text.
    ///
    /// The text is stored even when invalid; it is validated again when the
    /// next Break period starts.
    pub fn set_break_minutes(&self, text: &str) -> Result<u32, TimerError> {
        self.set_minutes(PeriodKind::Break, text)
    }

    fn set_minutes(&self, kind: PeriodKind, text: &str) -> Result<u32, TimerError> {
        lock(&self.shared.config).set_raw_minutes(kind, text);
        parse_minutes(kind, text)
    }

    // ------------------------------------------------------------------------
    // Registry input
    // ------------------------------------------------------------------------

    /// Adds a threshold trigger from user text.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidTrigger` for a malformed percentage or an
    /// empty message; the registry is left unchanged.
    pub fn add_trigger(&self, percent_text: &str, message: &str) -> Result<(), TimerError> {
        lock(&self.shared.registry).add_from_text(percent_text, message)?;
        debug!(percent = percent_text, message, "trigger added");
        Ok(())
    }

    /// Adds several triggers at once; none are added if any is invalid.
    pub fn extend_triggers(&self, triggers: Vec<NotificationTrigger>) -> Result<(), TimerError> {
        lock(&self.shared.registry).extend(triggers)
    }

    /// Removes all triggers.
    pub fn clear_triggers(&self) {
        lock(&self.shared.registry).clear();
        debug!("triggers cleared");
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the current run state.
    pub fn state(&self) -> EngineState {
        lock(&self.shared.status).state
    }

    /// Returns true if a countdown is active.
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Returns the active (or next) period kind.
    pub fn period(&self) -> PeriodKind {
        lock(&self.shared.status).period
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> TimerConfig {
        lock(&self.shared.config).clone()
    }

    /// Returns a copy of the registered triggers.
    pub fn triggers(&self) -> Vec<NotificationTrigger> {
        lock(&self.shared.registry).triggers().to_vec()
    }

    /// Returns the trigger lifecycle policy.
    pub fn lifecycle(&self) -> TriggerLifecycle {
        self.lifecycle
    }

    /// Returns a point-in-time status snapshot.
    pub fn status(&self) -> EngineStatus {
        let (state, period, sample) = {
            let status = lock(&self.shared.status);
            (status.state, status.period, status.last_sample)
        };
        EngineStatus {
            state,
            period,
            remaining_seconds: sample.map_or(0, |s| s.remaining_seconds),
            elapsed_percent: sample.map_or(0.0, |s| s.elapsed_percent),
            config: self.config(),
            trigger_count: lock(&self.shared.registry).len(),
            lifecycle: self.lifecycle(),
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

// ============================================================================
// Countdown task
// ============================================================================

/// Everything the background task needs for one run.
struct Countdown {
    shared: Arc<Shared>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    cancel: CancellationToken,
    run_id: u64,
    tick_interval: Duration,
    lifecycle: TriggerLifecycle,
}

impl Countdown {
    /// Runs periods back to back until cancelled or misconfigured.
    async fn run(self) {
        if let Err(e) = self.run_periods().await {
            warn!("countdown aborted: {:#}", e);
            self.halt();
        }
    }

    async fn run_periods(&self) -> Result<()> {
        loop {
            let Some(kind) = self.current_period() else {
                return Ok(());
            };

            // Copy the duration once; later edits apply to the next period.
            let minutes = lock(&self.shared.config).minutes(kind);
            let minutes = match minutes {
                Ok(minutes) => minutes,
                Err(e) => {
                    self.fail(&e)?;
                    return Ok(());
                }
            };

            if kind == PeriodKind::Work && self.lifecycle == TriggerLifecycle::RearmEachWork {
                lock(&self.shared.registry).rearm();
            }

            info!(period = kind.as_str(), minutes, "period started");
            self.send(TimerEvent::PeriodStarted { kind })
                .context("Failed to send period started event")?;
            self.send(TimerEvent::status(format!("{} in progress", kind.label())))
                .context("Failed to send status event")?;

            let mut clock = PeriodClock::for_minutes(minutes, self.tick_interval, self.cancel.clone());
            let tolerance = clock.tolerance();

            while let Some(sample) = clock.next_tick().await {
                if self.cancel.is_cancelled() {
                    break;
                }
                lock(&self.shared.status).last_sample = Some(sample);
                self.send(TimerEvent::tick(sample))
                    .context("Failed to send tick event")?;

                if kind == PeriodKind::Work {
                    let fired = lock(&self.shared.registry)
                        .evaluate_and_mark(sample.elapsed_percent, tolerance);
                    for message in fired {
                        debug!(percent = sample.elapsed_percent, %message, "trigger fired");
                        self.send(TimerEvent::Notification { message })
                            .context("Failed to send notification event")?;
                    }
                }
            }

            if !clock.is_complete() {
                debug!(run_id = self.run_id, "countdown cancelled");
                return Ok(());
            }

            self.complete_period(kind)?;
        }
    }

    /// Announces the finished period and flips to the next one.
    fn complete_period(&self, kind: PeriodKind) -> Result<()> {
        info!(period = kind.as_str(), "period completed");
        self.send(TimerEvent::Notification {
            message: kind.completion_message().to_string(),
        })
        .context("Failed to send completion notification")?;
        self.send(TimerEvent::PeriodCompleted { kind })
            .context("Failed to send period completed event")?;

        if kind == PeriodKind::Work && self.lifecycle == TriggerLifecycle::ClearAfterWork {
            lock(&self.shared.registry).clear();
        }

        let message = match kind {
            PeriodKind::Work => "Work period complete! Taking a break.",
            PeriodKind::Break => "Break complete! Starting work period.",
        };
        self.send(TimerEvent::status(message))
            .context("Failed to send status event")?;

        let mut status = lock(&self.shared.status);
        if status.run_id == self.run_id {
            status.period = kind.next();
            status.last_sample = None;
        }
        Ok(())
    }

    /// Returns the period to run next, or `None` if this run is stale.
    fn current_period(&self) -> Option<PeriodKind> {
        let status = lock(&self.shared.status);
        (status.run_id == self.run_id && !self.cancel.is_cancelled()).then_some(status.period)
    }

    /// Stops the run because of an invalid period length.
    fn fail(&self, error: &TimerError) -> Result<()> {
        warn!("{}", error);
        if !self.halt() {
            return Ok(());
        }
        self.send(TimerEvent::FatalConfigError {
            message: error.to_string(),
        })
        .context("Failed to send config error event")?;
        self.send(TimerEvent::status("Stopped"))
            .context("Failed to send status event")?;
        self.send(TimerEvent::Stopped)
            .context("Failed to send stopped event")?;
        Ok(())
    }

    /// Moves the engine to Stopped if this run is still current.
    fn halt(&self) -> bool {
        let mut status = lock(&self.shared.status);
        if status.run_id != self.run_id || !status.state.is_running() {
            return false;
        }
        status.state = EngineState::Stopped;
        status.last_sample = None;
        true
    }

    fn send(&self, event: TimerEvent) -> Result<(), mpsc::error::SendError<TimerEvent>> {
        self.event_tx.send(event)
    }
}

// ============================================================================
// Tests
// ============================================================================
