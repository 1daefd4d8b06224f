//! Productivity Timer - alternating work and break periods in the terminal
//!
//! The timer counts down a work period, then a break period, and repeats:
//! - Notifications fire at chosen percentages of each work period
//! - Desktop notifications fall back to a terminal box when unavailable
//! - The screen briefly flashes when a notification fires

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use productivity_timer::attention::XrandrFlasher;
use productivity_timer::cli::{handle_line, Cli, Commands, ConsoleObserver, Display, RunArgs};
use productivity_timer::engine::{dispatch_events, TimerEngine};
use productivity_timer::notification::DesktopNotifier;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the progress line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run(args).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the timer with the interactive prompt until `quit`, end of input or Ctrl-C.
async fn run(args: RunArgs) -> Result<()> {
    let triggers = args.load_triggers()?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(args.config(), event_tx).with_lifecycle(args.lifecycle.into());
    engine
        .extend_triggers(triggers)
        .context("Invalid notification in configuration")?;

    let notifier = Arc::new(DesktopNotifier::new(!args.no_desktop));
    let flasher = (!args.no_flash).then(|| Arc::new(XrandrFlasher::new()));
    let mut observer = ConsoleObserver::new(notifier, flasher);
    let dispatcher = tokio::spawn(async move {
        dispatch_events(event_rx, &mut observer).await;
    });

    Display::show_banner(&engine.config(), engine.triggers().len());
    if args.autostart {
        engine.start();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read command")? else {
                    debug!("end of input");
                    break;
                };
                if handle_line(&mut engine, &line).is_break() {
                    break;
                }
                // Let the countdown and the renderer catch up before the next line.
                tokio::task::yield_now().await;
            }
        }
    }

    engine.stop();
    engine.join().await;
    drop(engine);

    dispatcher.await.context("Event dispatcher failed")?;
    info!("timer exited");
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["productivity-timer"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["productivity-timer", "run"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_cli_parse_run_with_options() {
        let cli = Cli::parse_from([
            "productivity-timer",
            "run",
            "--work",
            "30",
            "--notify",
            "50:halfway",
            "--autostart",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.work, 30);
                assert_eq!(args.notify.len(), 1);
                assert!(args.autostart);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_handle_line_quit() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut engine = TimerEngine::new(RunArgs::default().config(), tx);
        assert!(matches!(handle_line(&mut engine, "quit"), ControlFlow::Break(())));
    }
}
