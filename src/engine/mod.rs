//! Timer engine module.
//!
//! This module provides the countdown core:
//! - `clock`: one-second period countdown with cooperative cancellation
//! - `registry`: percentage-threshold notification triggers
//! - `timer`: the Work/Break state machine driving both
//! - `observer`: callback interface and channel dispatcher for consumers

pub mod clock;
pub mod error;
pub mod observer;
pub mod registry;
pub mod timer;

pub use clock::{tolerance_for, ClockSample, PeriodClock};
pub use error::{TimerError, INVALID_SETTINGS_HINT};
pub use observer::{dispatch_events, EngineObserver, RecordingObserver};
pub use registry::{NotificationRegistry, NotificationTrigger};
pub use timer::{TimerEngine, TimerEvent};
