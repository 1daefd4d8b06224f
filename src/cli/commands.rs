//! Command definitions for the Productivity Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::engine::registry::parse_percent;
use crate::engine::NotificationTrigger;
use crate::types::{TimerConfig, TriggerLifecycle, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// Productivity Timer - alternating work and break periods in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "productivity-timer",
    version,
    about = "Work/break interval timer with percentage notifications",
    long_about = "An interval timer that alternates work and break periods.\n\
                  Notifications fire when a work period reaches chosen percentages,\n\
                  shown on the desktop with an optional screen flash.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer with an interactive command prompt
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Trigger policy names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecycleArg {
    /// Remove all notifications when a work period completes
    #[default]
    ClearAfterWork,
    /// Keep notifications and fire them again every work period
    RearmEachWork,
    /// Keep notifications; each fires once until the timer is started again
    OncePerRun,
}

impl From<LifecycleArg> for TriggerLifecycle {
    fn from(arg: LifecycleArg) -> Self {
        match arg {
            LifecycleArg::ClearAfterWork => TriggerLifecycle::ClearAfterWork,
            LifecycleArg::RearmEachWork => TriggerLifecycle::RearmEachWork,
            LifecycleArg::OncePerRun => TriggerLifecycle::OncePerRun,
        }
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work duration in minutes
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_WORK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub work: u32,

    /// Break duration in minutes
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub break_time: u32,

    /// Notification at a percentage of the work period, as PCT:MESSAGE (repeatable)
    #[arg(short, long = "notify", value_name = "PCT:MESSAGE", value_parser = parse_notify_arg)]
    pub notify: Vec<NotificationTrigger>,

    /// JSON file with a list of {"percent": .., "message": ..} notifications
    #[arg(long, value_name = "FILE")]
    pub triggers: Option<PathBuf>,

    /// What happens to notifications when a work period ends
    #[arg(long, value_enum, default_value_t = LifecycleArg::ClearAfterWork)]
    pub lifecycle: LifecycleArg,

    /// Show notifications in the terminal instead of on the desktop
    #[arg(long)]
    pub no_desktop: bool,

    /// Do not flash the screen when a notification fires
    #[arg(long)]
    pub no_flash: bool,

    /// Start the first work period immediately
    #[arg(short, long)]
    pub autostart: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MINUTES,
            break_time: DEFAULT_BREAK_MINUTES,
            notify: Vec::new(),
            triggers: None,
            lifecycle: LifecycleArg::default(),
            no_desktop: false,
            no_flash: false,
            autostart: false,
        }
    }
}

impl RunArgs {
    /// Timer configuration built from the duration flags.
    pub fn config(&self) -> TimerConfig {
        TimerConfig::from_minutes(self.work, self.break_time)
    }

    /// Collects the triggers from `--triggers` followed by every `--notify`.
    ///
    /// # Errors
    ///
    /// Returns an error if the triggers file cannot be read or parsed.
    pub fn load_triggers(&self) -> Result<Vec<NotificationTrigger>> {
        let mut triggers = match &self.triggers {
            Some(path) => load_triggers_file(path)?,
            None => Vec::new(),
        };
        triggers.extend(self.notify.iter().cloned());
        Ok(triggers)
    }
}

/// Reads a JSON list of triggers.
fn load_triggers_file(path: &Path) -> Result<Vec<NotificationTrigger>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read triggers file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse triggers file {}", path.display()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a `PCT:MESSAGE` notification argument.
///
/// - Percentage must be a number between 0 and 100
/// - Message must not be empty
fn parse_notify_arg(s: &str) -> Result<NotificationTrigger, String> {
    let (percent, message) = s
        .split_once(':')
        .ok_or_else(|| "expected PCT:MESSAGE, e.g. 50:halfway".to_string())?;
    let percent = parse_percent(percent).map_err(|e| e.to_string())?;
    NotificationTrigger::new(percent, message.trim()).map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
