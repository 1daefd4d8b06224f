//! Brightness pulse through `xrandr`.
//!
//! The flash dims the primary output, waits briefly and restores full
//! brightness. Every `xrandr` call runs under its own timeout, and once the
//! dim has been attempted the restore is always attempted too.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::{sleep, timeout};
use tracing::debug;

use super::error::FlashError;
use super::ScreenFlasher;

/// Name of the display tool.
const XRANDR: &str = "xrandr";

/// Brightness used for the dimmed half of the pulse.
const DIM_BRIGHTNESS: &str = "0.1";

/// Brightness restored after the pulse.
const FULL_BRIGHTNESS: &str = "1";

/// How long the display stays dimmed.
const PULSE_MILLIS: u64 = 200;

/// Default timeout for a single `xrandr` call.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Returns the name of the connected primary output in `xrandr --current` output.
pub fn find_primary_output(listing: &str) -> Option<&str> {
    listing
        .lines()
        .find(|line| line.contains(" connected ") && line.contains("primary"))
        .and_then(|line| line.split_whitespace().next())
}

/// Flashes the primary display with `xrandr`.
#[derive(Debug, Clone)]
pub struct XrandrFlasher {
    program: PathBuf,
    call_timeout: Duration,
}

impl Default for XrandrFlasher {
    fn default() -> Self {
        Self {
            program: PathBuf::from(XRANDR),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl XrandrFlasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout applied to each `xrandr` call.
    #[must_use]
    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Uses another executable in place of `xrandr` from `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    async fn pulse(&self) -> Result<(), FlashError> {
        let listing = self.run(&["--current"]).await?;
        let output = find_primary_output(&listing)
            .ok_or(FlashError::NoPrimaryOutput)?
            .to_string();

        let dimmed = self
            .run(&["--output", &output, "--brightness", DIM_BRIGHTNESS])
            .await;
        if dimmed.is_ok() {
            sleep(Duration::from_millis(PULSE_MILLIS)).await;
        }
        // The dim may have applied even if the call failed or timed out.
        let restored = self
            .run(&["--output", &output, "--brightness", FULL_BRIGHTNESS])
            .await;

        dimmed?;
        restored?;
        debug!(output = %output, "screen flashed");
        Ok(())
    }

    /// Runs the display tool with `args` and returns its stdout.
    async fn run(&self, args: &[&str]) -> Result<String, FlashError> {
        let program = self.program.display().to_string();
        let mut command = Command::new(&self.program);
        command.args(args).kill_on_drop(true);

        let output = timeout(self.call_timeout, command.output())
            .await
            .map_err(|_| FlashError::Timeout(self.call_timeout.as_millis() as u64))?
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FlashError::CommandNotFound(program.clone()),
                _ => FlashError::ExecutionFailed(program.clone(), e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FlashError::ExecutionFailed(program, stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ScreenFlasher for XrandrFlasher {
    async fn flash(&self) -> Result<(), FlashError> {
        self.pulse().await
    }

    fn is_available(&self) -> bool {
        std::env::var_os("DISPLAY").is_some()
    }
}
