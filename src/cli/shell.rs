//! Interactive command prompt.
//!
//! Each input line is parsed into a `ShellCommand` without touching the
//! engine, then applied by `apply`. Invalid input never ends the session.

use std::ops::ControlFlow;

use thiserror::Error;

use super::display::Display;
use crate::engine::TimerEngine;

// ============================================================================
// ShellCommand
// ============================================================================

/// A command entered at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start (or resume) the countdown
    Start,
    /// Stop the countdown
    Stop,
    /// Stop and restore the initial configuration
    Reset,
    /// Set the work period length (raw text, validated by the engine)
    Work(String),
    /// Set the break period length (raw text, validated by the engine)
    Break(String),
    /// Add a threshold notification
    Add {
        /// Percentage text
        percent: String,
        /// Message to show
        message: String,
    },
    /// Remove every notification
    Clear,
    /// List notifications
    List,
    /// Show the engine status
    Status,
    /// Show command help
    Help,
    /// Leave the prompt
    Quit,
}

/// Errors produced while parsing a prompt line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(&'static str),
}

impl ShellError {
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "Type 'help' to list the available commands",
            Self::MissingArgument { .. } | Self::UnexpectedArgument(_) => {
                "Type 'help' to see how each command is used"
            }
        }
    }
}

/// Parses one prompt line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    let Some((name, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "start" => no_args("start", rest, ShellCommand::Start)?,
        "stop" => no_args("stop", rest, ShellCommand::Stop)?,
        "reset" => no_args("reset", rest, ShellCommand::Reset)?,
        "clear" => no_args("clear", rest, ShellCommand::Clear)?,
        "list" | "ls" => no_args("list", rest, ShellCommand::List)?,
        "status" => no_args("status", rest, ShellCommand::Status)?,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "work" => ShellCommand::Work(required("work", "a number of minutes", rest)?.to_string()),
        "break" => ShellCommand::Break(required("break", "a number of minutes", rest)?.to_string()),
        "add" => {
            let args = required("add", "a percentage and a message", rest)?;
            let (percent, message) = split_word(args).unwrap_or((args, ""));
            if message.is_empty() {
                return Err(ShellError::MissingArgument {
                    command: "add",
                    argument: "a message",
                });
            }
            ShellCommand::Add {
                percent: percent.to_string(),
                message: message.to_string(),
            }
        }
        _ => return Err(ShellError::UnknownCommand(name.to_string())),
    };
    Ok(Some(command))
}

/// Splits off the first whitespace-delimited word.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    })
}

fn no_args(
    command: &'static str,
    rest: &str,
    parsed: ShellCommand,
) -> Result<ShellCommand, ShellError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(ShellError::UnexpectedArgument(command))
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    rest: &'a str,
) -> Result<&'a str, ShellError> {
    if rest.is_empty() {
        Err(ShellError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

// ============================================================================
// Command application
// ============================================================================

/// Applies a parsed command to the engine.
///
/// Returns `ControlFlow::Break` when the user asked to quit.
pub fn apply(engine: &mut TimerEngine, command: ShellCommand) -> ControlFlow<()> {
    match command {
        ShellCommand::Start => {
            if !engine.start() {
                Display::show_info("Timer is already running");
            }
        }
        ShellCommand::Stop => engine.stop(),
        ShellCommand::Reset => engine.reset(),
        ShellCommand::Work(text) => match engine.set_work_minutes(&text) {
            Ok(minutes) => Display::show_minutes_set("Work", minutes, engine.is_running()),
            Err(e) => Display::show_error_with_suggestion(&e.to_string(), e.suggestion()),
        },
        ShellCommand::Break(text) => match engine.set_break_minutes(&text) {
            Ok(minutes) => Display::show_minutes_set("Break", minutes, engine.is_running()),
            Err(e) => Display::show_error_with_suggestion(&e.to_string(), e.suggestion()),
        },
        ShellCommand::Add { percent, message } => match engine.add_trigger(&percent, &message) {
            Ok(()) => Display::show_triggers(&engine.triggers()),
            Err(e) => Display::show_error_with_suggestion(&e.to_string(), e.suggestion()),
        },
        ShellCommand::Clear => {
            engine.clear_triggers();
            Display::show_info("All notifications cleared");
        }
        ShellCommand::List => Display::show_triggers(&engine.triggers()),
        ShellCommand::Status => Display::show_status(&engine.status()),
        ShellCommand::Help => Display::show_help(),
        ShellCommand::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// Parses and applies one prompt line, reporting parse errors to the user.
pub fn handle_line(engine: &mut TimerEngine, line: &str) -> ControlFlow<()> {
    match parse_command(line) {
        Ok(Some(command)) => apply(engine, command),
        Ok(None) => ControlFlow::Continue(()),
        Err(e) => {
            Display::show_error_with_suggestion(&e.to_string(), e.suggestion());
            ControlFlow::Continue(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
