//! CLI module for the Productivity Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `shell`: Interactive prompt parsing and command application
//! - `display`: Output formatting and the console observer

pub mod commands;
pub mod display;
pub mod shell;

pub use commands::{Cli, Commands, LifecycleArg, RunArgs};
pub use display::{ConsoleObserver, Display};
pub use shell::{handle_line, parse_command, ShellCommand, ShellError};
