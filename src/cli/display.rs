//! Display utilities for the Productivity Timer CLI.
//!
//! This module provides formatted output for:
//! - The single-line progress bar
//! - Status, notification list and help output
//! - Error messages
//! - The console observer that renders engine events

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::attention::ScreenFlasher;
use crate::engine::{EngineObserver, NotificationTrigger, INVALID_SETTINGS_HINT};
use crate::notification::{deliver_with_fallback, NotificationSender, APP_TITLE};
use crate::types::{format_time, EngineStatus, PeriodKind, TimerConfig};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats the progress bar line for a tick.
    pub fn progress_line(elapsed_percent: f64, time_text: &str) -> String {
        let ratio = (elapsed_percent / 100.0).clamp(0.0, 1.0);
        let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        format!(
            "[{}{}] {:5.1}%  {}",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            elapsed_percent,
            time_text
        )
    }

    /// Redraws the progress bar in place.
    pub fn show_progress(elapsed_percent: f64, time_text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\r{}", Self::progress_line(elapsed_percent, time_text));
        let _ = stdout.flush();
    }

    /// Formats a boxed message, used when desktop notifications are unavailable.
    pub fn dialog(title: &str, message: &str) -> String {
        let width = title.chars().count().max(message.chars().count()) + 2;
        let rule = "─".repeat(width);
        format!(
            "┌{rule}┐\n│ {title:<inner$} │\n├{rule}┤\n│ {message:<inner$} │\n└{rule}┘",
            inner = width - 2
        )
    }

    /// Shows a notification in the terminal.
    pub fn show_dialog(message: &str) {
        println!("\n{}", Self::dialog(APP_TITLE, message));
    }

    /// Shows a status line.
    pub fn show_status_text(message: &str) {
        println!("» {}", message);
    }

    /// Announces the start of a period.
    pub fn show_period_started(kind: PeriodKind) {
        println!("▶ {} period started", kind.label());
    }

    /// Shows the engine status snapshot.
    pub fn show_status(status: &EngineStatus) {
        println!("Productivity Timer status");
        println!("─────────────────────────");
        println!("State: {}", status.state.as_str());
        println!("Period: {}", status.period.as_str());
        if status.state.is_running() {
            println!(
                "Remaining: {} ({:.1}% elapsed)",
                format_time(status.remaining_seconds),
                status.elapsed_percent
            );
        }
        println!(
            "Work: {} min, Break: {} min",
            status.config.work_minutes, status.config.break_minutes
        );
        println!("Notifications: {}", status.trigger_count);
        println!("After work: {}", status.lifecycle.as_str());
    }

    /// Formats the notification list, one `{percent}% - {message}` per line.
    pub fn trigger_list(triggers: &[NotificationTrigger]) -> String {
        if triggers.is_empty() {
            return "No notifications set".to_string();
        }
        triggers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shows the notification list.
    pub fn show_triggers(triggers: &[NotificationTrigger]) {
        println!("{}", Self::trigger_list(triggers));
    }

    /// Shows the configuration and a hint at startup.
    pub fn show_banner(config: &TimerConfig, trigger_count: usize) {
        println!(
            "{} - work {} min, break {} min, {} notification(s)",
            APP_TITLE, config.work_minutes, config.break_minutes, trigger_count
        );
        println!("Type 'help' for commands.");
    }

    /// Confirms a period length change.
    pub fn show_minutes_set(label: &str, minutes: u32, running: bool) {
        if running {
            println!(
                "{} period set to {} minutes (applies from the next {} period)",
                label,
                minutes,
                label.to_lowercase()
            );
        } else {
            println!("{} period set to {} minutes", label, minutes);
        }
    }

    /// Shows the command reference.
    pub fn show_help() {
        println!("Commands:");
        println!("  start                 start or resume the timer");
        println!("  stop                  stop the timer");
        println!("  reset                 stop and restore the initial settings");
        println!("  work <minutes>        set the work period length");
        println!("  break <minutes>       set the break period length");
        println!("  add <pct> <message>   notify at a percentage of the work period");
        println!("  clear                 remove all notifications");
        println!("  list                  list notifications");
        println!("  status                show timer status");
        println!("  help                  show this help");
        println!("  quit                  exit");
    }

    /// Shows an informational message.
    pub fn show_info(message: &str) {
        println!("{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows an error message followed by a hint.
    pub fn show_error_with_suggestion(message: &str, suggestion: &str) {
        Self::show_error(message);
        eprintln!("  {}", suggestion);
    }
}

// ============================================================================
// ConsoleObserver
// ============================================================================

/// Renders engine events on the terminal and fires attention side effects.
///
/// Desktop notifications run on the blocking pool and screen flashes on a
/// spawned task, so neither holds up event rendering. Must be driven from
/// within a tokio runtime.
pub struct ConsoleObserver<N, F> {
    notifier: Arc<N>,
    flasher: Option<Arc<F>>,
    /// Whether the cursor sits at the end of an unterminated progress line
    line_open: bool,
}

impl<N, F> ConsoleObserver<N, F>
where
    N: NotificationSender + 'static,
    F: ScreenFlasher,
{
    pub fn new(notifier: Arc<N>, flasher: Option<Arc<F>>) -> Self {
        Self {
            notifier,
            flasher,
            line_open: false,
        }
    }

    fn close_line(&mut self) {
        if self.line_open {
            println!();
            self.line_open = false;
        }
    }

    /// Delivers `message` off the render path, falling back to a dialog.
    fn notify(&self, message: &str) {
        let notifier = Arc::clone(&self.notifier);
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            deliver_with_fallback(notifier.as_ref(), &message, Display::show_dialog);
        });
    }
}

impl<N, F> EngineObserver for ConsoleObserver<N, F>
where
    N: NotificationSender + 'static,
    F: ScreenFlasher,
{
    fn on_tick(&mut self, _remaining_seconds: u32, elapsed_percent: f64, time_text: &str) {
        Display::show_progress(elapsed_percent, time_text);
        self.line_open = true;
    }

    fn on_notification(&mut self, message: &str) {
        self.close_line();
        self.notify(message);
    }

    fn on_period_transition(&mut self, kind: PeriodKind) {
        self.close_line();
        Display::show_period_started(kind);
    }

    fn on_fatal_config_error(&mut self, message: &str) {
        self.close_line();
        Display::show_error(message);
        self.notify(INVALID_SETTINGS_HINT);
    }

    fn on_status(&mut self, message: &str) {
        self.close_line();
        Display::show_status_text(message);
    }

    fn on_attention(&mut self) {
        let Some(flasher) = &self.flasher else {
            return;
        };
        if !flasher.is_available() {
            return;
        }
        let flasher = Arc::clone(flasher);
        tokio::spawn(async move {
            match flasher.flash().await {
                Ok(()) => {}
                Err(e) if e.is_unsupported() => debug!("screen flash skipped: {}", e),
                Err(e) => warn!(suggestion = e.suggestion(), "screen flash failed: {}", e),
            }
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
