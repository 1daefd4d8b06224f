//! Productivity Timer Library
//!
//! This library provides the core functionality for the Productivity Timer CLI.
//! It includes:
//! - Timer engine alternating Work and Break periods
//! - Percentage-threshold notification triggers evaluated during Work periods
//! - Desktop notification delivery with an in-terminal fallback
//! - Screen flash attention effect
//! - CLI command parsing, the interactive prompt and display utilities
//! - Type definitions for configuration and state

pub mod attention;
pub mod cli;
pub mod engine;
pub mod notification;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_time, EngineState, EngineStatus, PeriodKind, TimerConfig, TriggerLifecycle,
};

// Re-export engine types
pub use engine::{
    dispatch_events, EngineObserver, NotificationRegistry, NotificationTrigger, PeriodClock,
    RecordingObserver, TimerEngine, TimerError, TimerEvent,
};

// Re-export notification types
pub use notification::{
    deliver_with_fallback, DesktopNotifier, MockNotificationSender, NotificationError,
    NotificationSender,
};

// Re-export attention types
pub use attention::{FlashError, MockScreenFlasher, ScreenFlasher, XrandrFlasher};
