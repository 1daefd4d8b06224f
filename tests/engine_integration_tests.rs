//! Integration tests for the timer engine.
//!
//! These tests drive the public engine API end to end on tokio's paused
//! clock, with events rendered through `dispatch_events` into a
//! `RecordingObserver`:
//! - Threshold firing tolerance and at-most-once delivery
//! - Monotonic progress samples
//! - Stop latency and idempotent start
//! - Period alternation
//! - Reset and validation behaviour

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use productivity_timer::engine::observer::ObservedCall;
use productivity_timer::engine::{
    dispatch_events, tolerance_for, NotificationRegistry, PeriodClock, RecordingObserver,
    TimerEngine, TimerEvent,
};
use productivity_timer::types::{EngineState, PeriodKind, TimerConfig, TriggerLifecycle};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates an engine with one-minute periods.
fn create_engine() -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(TimerConfig::from_minutes(1, 1), tx);
    (engine, rx)
}

/// Receives events until `done` matches one, returning all of them.
async fn collect_until(
    rx: &mut mpsc::UnboundedReceiver<TimerEvent>,
    done: impl Fn(&TimerEvent) -> bool,
) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let finished = done(&event);
        events.push(event);
        if finished {
            break;
        }
    }
    events
}

/// Stops the engine, drops it and renders every queued event.
async fn finish(mut engine: TimerEngine, rx: mpsc::UnboundedReceiver<TimerEvent>) -> RecordingObserver {
    engine.stop();
    engine.join().await;
    drop(engine);

    let mut observer = RecordingObserver::new();
    dispatch_events(rx, &mut observer).await;
    observer
}

fn tick_percents(observer: &RecordingObserver) -> Vec<f64> {
    observer
        .calls()
        .iter()
        .filter_map(|c| match c {
            ObservedCall::Tick(_, percent, _) => Some(*percent),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Registry Properties
// ============================================================================

#[test]
fn test_half_hour_trigger_fires_once_near_1800() {
    let total = 3600;
    let tolerance = tolerance_for(total);
    let mut registry = NotificationRegistry::new();
    registry.add(50.0, "halfway").unwrap();

    let mut fired_at = Vec::new();
    for sample in PeriodClock::samples(total) {
        for message in registry.evaluate_and_mark(sample.elapsed_percent, tolerance) {
            fired_at.push((sample.remaining_seconds, message));
        }
    }

    assert_eq!(fired_at.len(), 1);
    assert!((1799..=1801).contains(&fired_at[0].0));
    assert_eq!(fired_at[0].1, "halfway");
}

#[test]
fn test_no_trigger_fires_twice_in_a_period() {
    for total in [60, 61, 900, 3599] {
        let tolerance = tolerance_for(total);
        let mut registry = NotificationRegistry::new();
        for percent in [0.0, 1.0, 10.0, 33.3, 66.6, 99.0, 100.0] {
            registry.add(percent, format!("{percent}")).unwrap();
        }

        let mut fired = Vec::new();
        for sample in PeriodClock::samples(total) {
            fired.extend(registry.evaluate_and_mark(sample.elapsed_percent, tolerance));
        }
        let mut unique = fired.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), fired.len(), "duplicate firing for total {total}");
    }
}

// ============================================================================
// Engine Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_one_minute_work_period_scenario() {
    let (mut engine, mut rx) = create_engine();
    engine.add_trigger("50", "halfway").unwrap();
    engine.start();

    let events = collect_until(&mut rx, |e| {
        matches!(e, TimerEvent::PeriodCompleted { kind: PeriodKind::Work })
    })
    .await;
    assert_eq!(engine.period(), PeriodKind::Break);

    let (tx, replay) = mpsc::unbounded_channel();
    for event in events {
        tx.send(event).unwrap();
    }
    drop(tx);
    let mut observer = RecordingObserver::new();
    dispatch_events(replay, &mut observer).await;

    let percents = tick_percents(&observer);
    assert_eq!(percents.len(), 61);
    assert_eq!(percents.first(), Some(&0.0));
    assert_eq!(percents.last(), Some(&100.0));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert!(percents
        .windows(2)
        .all(|w| ((w[1] - w[0]) - 100.0 / 60.0).abs() < 1e-9));

    assert_eq!(
        observer.notifications(),
        vec!["halfway".to_string(), "Work period completed!".to_string()]
    );
    let halfway = observer
        .calls()
        .iter()
        .position(|c| *c == ObservedCall::Notification("halfway".to_string()))
        .unwrap();
    assert!(matches!(observer.calls()[halfway - 1], ObservedCall::Tick(30, _, _)));
    assert_eq!(observer.calls()[halfway + 1], ObservedCall::Attention);

    let _ = finish(engine, rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_emits_no_further_ticks() {
    let (mut engine, mut rx) = create_engine();
    engine.start();
    collect_until(&mut rx, |e| matches!(e, TimerEvent::Tick { remaining_seconds: 40, .. })).await;

    engine.stop();
    sleep(Duration::from_secs(120)).await;

    let observer = finish(engine, rx).await;
    assert_eq!(observer.tick_count(), 0);
    assert_eq!(
        observer.calls(),
        &[ObservedCall::Status("Stopped".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_double_start_has_single_tick_stream() {
    let (mut engine, mut rx) = create_engine();
    assert!(engine.start());
    assert!(!engine.start());

    let events = collect_until(&mut rx, |e| {
        matches!(e, TimerEvent::PeriodStarted { kind: PeriodKind::Break })
    })
    .await;
    let work_ticks = events
        .iter()
        .filter(|e| matches!(e, TimerEvent::Tick { .. }))
        .count();
    assert_eq!(work_ticks, 61);

    let _ = finish(engine, rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_periods_alternate_without_stop() {
    let (mut engine, mut rx) = create_engine();
    engine.start();

    let mut kinds = Vec::new();
    while kinds.len() < 5 {
        match rx.recv().await {
            Some(TimerEvent::PeriodStarted { kind }) => kinds.push(kind),
            Some(_) => {}
            None => break,
        }
    }
    assert_eq!(
        kinds,
        vec![
            PeriodKind::Work,
            PeriodKind::Break,
            PeriodKind::Work,
            PeriodKind::Break,
            PeriodKind::Work,
        ]
    );
    assert_eq!(engine.state(), EngineState::Running);

    let _ = finish(engine, rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_triggers() {
    let (mut engine, mut rx) = create_engine();
    engine.add_trigger("50", "x").unwrap();
    engine.reset();
    while rx.try_recv().is_ok() {}

    engine.start();
    collect_until(&mut rx, |e| {
        matches!(e, TimerEvent::PeriodCompleted { kind: PeriodKind::Work })
    })
    .await;

    let observer = finish(engine, rx).await;
    assert!(!observer.notifications().contains(&"x".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_work_minutes_stops_without_crash() {
    let (mut engine, rx) = create_engine();
    assert!(engine.set_work_minutes("abc").is_err());

    engine.start();
    engine.join().await;
    assert_eq!(engine.state(), EngineState::Stopped);

    let observer = finish(engine, rx).await;
    assert!(matches!(
        observer.calls().first(),
        Some(ObservedCall::FatalConfigError(message)) if message.contains("'abc'")
    ));
    assert_eq!(observer.tick_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fixing_config_allows_restart() {
    let (mut engine, mut rx) = create_engine();
    engine.set_work_minutes("0").unwrap_err();
    engine.start();
    engine.join().await;
    assert_eq!(engine.state(), EngineState::Stopped);

    engine.set_work_minutes("2").unwrap();
    assert!(engine.start());
    let events = collect_until(&mut rx, |e| matches!(e, TimerEvent::Tick { .. })).await;
    assert!(events.contains(&TimerEvent::Tick {
        remaining_seconds: 120,
        elapsed_percent: 0.0,
        time_text: "02:00".to_string(),
    }));

    let _ = finish(engine, rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_rearm_each_work_fires_every_work_period() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(TimerConfig::from_minutes(1, 1), tx)
        .with_lifecycle(TriggerLifecycle::RearmEachWork);
    engine.add_trigger("50", "halfway").unwrap();
    engine.start();

    let mut work_completions = 0;
    let mut halfway = 0;
    while work_completions < 3 {
        match rx.recv().await {
            Some(TimerEvent::PeriodCompleted { kind: PeriodKind::Work }) => work_completions += 1,
            Some(TimerEvent::Notification { message }) if message == "halfway" => halfway += 1,
            Some(_) => {}
            None => break,
        }
    }
    assert_eq!(halfway, 3);

    let _ = finish(engine, rx).await;
}
