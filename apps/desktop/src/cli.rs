//! Command-line interpreter and the early-exit cleanup path.

use crate::event_loop::{EventLoop, schedule_quit};
use aegis_domain::constants::APPLICATION_NAME;
use aegis_domain::events::QuitRequested;
use aegis_domain::instance::{ExitStatus, StartupFlags};
use aegis_event_bus::{EventBus, EventBusError};
use aegis_logger::LoggerError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Delay between log cleanup and the self-issued quit.
pub const CLEANUP_QUIT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Parser)]
#[command(name = "aegis", version, about = APPLICATION_NAME)]
pub struct Cli {
    /// System autostart
    #[arg(short, long)]
    pub autostart: bool,

    /// Cleanup logs
    #[arg(short, long)]
    pub cleanup: bool,

    /// Client configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start alongside a running instance instead of handing off to it
    #[arg(long, hide = true)]
    pub allow_secondary: bool,
}

impl Cli {
    #[must_use]
    pub const fn flags(&self) -> StartupFlags {
        StartupFlags { autostart: self.autostart, cleanup: self.cleanup }
    }
}

/// Runs the cleanup path: removes log files, then spins the event loop until
/// the scheduled quit fires.
///
/// Cleanup failures are logged; the path always ends with the quit's status.
pub async fn run_cleanup<F>(bus: &EventBus, clean_up: F) -> Result<ExitStatus, EventBusError>
where
    F: FnOnce() -> Result<usize, LoggerError>,
{
    let event_loop = EventLoop::new(bus)?;

    match clean_up() {
        Ok(removed) => info!(removed, "Log cleanup finished"),
        Err(err) => warn!(error = %err, "Log cleanup failed"),
    }

    schedule_quit(bus, CLEANUP_QUIT_DELAY, QuitRequested::success())?;
    Ok(event_loop.run(&mut ()).await)
}
