//! Observer interface for engine consumers.
//!
//! The countdown task never calls into rendering code directly. It pushes
//! `TimerEvent`s onto a channel, and `dispatch_events` drains that channel
//! on the consumer side, invoking an `EngineObserver` in event order.

use tokio::sync::mpsc;
use tracing::trace;

use super::timer::TimerEvent;
use crate::types::PeriodKind;

/// Callbacks invoked for engine events.
///
/// All callbacks are fire-and-forget; failures inside them are the
/// observer's concern.
pub trait EngineObserver {
    /// A progress sample arrived.
    fn on_tick(&mut self, remaining_seconds: u32, elapsed_percent: f64, time_text: &str);

    /// A threshold trigger fired or a period completed.
    fn on_notification(&mut self, message: &str);

    /// A new period started.
    fn on_period_transition(&mut self, kind: PeriodKind);

    /// The run was aborted because of an invalid period length.
    fn on_fatal_config_error(&mut self, message: &str);

    /// Status text changed.
    fn on_status(&mut self, _message: &str) {}

    /// Invoked after every notification; suitable for attention side effects.
    fn on_attention(&mut self) {}
}

/// Delivers a single event to the observer.
pub fn deliver<O: EngineObserver + ?Sized>(observer: &mut O, event: &TimerEvent) {
    trace!(?event, "dispatching");
    match event {
        TimerEvent::Tick {
            remaining_seconds,
            elapsed_percent,
            time_text,
        } => observer.on_tick(*remaining_seconds, *elapsed_percent, time_text),
        TimerEvent::Notification { message } => {
            observer.on_notification(message);
            observer.on_attention();
        }
        TimerEvent::PeriodStarted { kind } => observer.on_period_transition(*kind),
        TimerEvent::Status { message } => observer.on_status(message),
        TimerEvent::FatalConfigError { message } => observer.on_fatal_config_error(message),
        TimerEvent::PeriodCompleted { .. } | TimerEvent::Stopped => {}
    }
}

/// Drains the event channel into the observer until every sender is gone.
pub async fn dispatch_events<O: EngineObserver + ?Sized>(
    mut rx: mpsc::UnboundedReceiver<TimerEvent>,
    observer: &mut O,
) {
    while let Some(event) = rx.recv().await {
        deliver(observer, &event);
    }
}

// ============================================================================
// RecordingObserver
// ============================================================================

/// A callback as seen by `RecordingObserver`.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedCall {
    Tick(u32, f64, String),
    Notification(String),
    PeriodTransition(PeriodKind),
    FatalConfigError(String),
    Status(String),
    Attention,
}

/// Observer that records every callback, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    calls: Vec<ObservedCall>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[ObservedCall] {
        &self.calls
    }

    /// Messages passed to `on_notification`, in order.
    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ObservedCall::Notification(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ObservedCall::Tick(..)))
            .count()
    }
}

impl EngineObserver for RecordingObserver {
    fn on_tick(&mut self, remaining_seconds: u32, elapsed_percent: f64, time_text: &str) {
        self.calls.push(ObservedCall::Tick(
            remaining_seconds,
            elapsed_percent,
            time_text.to_string(),
        ));
    }

    fn on_notification(&mut self, message: &str) {
        self.calls.push(ObservedCall::Notification(message.to_string()));
    }

    fn on_period_transition(&mut self, kind: PeriodKind) {
        self.calls.push(ObservedCall::PeriodTransition(kind));
    }

    fn on_fatal_config_error(&mut self, message: &str) {
        self.calls.push(ObservedCall::FatalConfigError(message.to_string()));
    }

    fn on_status(&mut self, message: &str) {
        self.calls.push(ObservedCall::Status(message.to_string()));
    }

    fn on_attention(&mut self) {
        self.calls.push(ObservedCall::Attention);
    }
}
