//! # Aegis Desktop
//!
//! Process bootstrap and single-instance lifecycle of the Aegis VPN client.
//!
//! Startup runs in a fixed order:
//! 1. command line (the cleanup path exits here),
//! 2. single-instance arbitration (a handed-off secondary exits here),
//! 3. settings store and core service handle,
//! 4. the [`bootstrap::Bootstrap`] sequence,
//! 5. the event loop, then teardown.
//!
//! ## Example
//! ```no_run
//! use aegis_desktop::cli::Cli;
//! use clap::Parser;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let status = aegis_desktop::run(Cli::parse()).await?;
//! std::process::exit(status.code());
//! # }
//! ```

pub mod arbiter;
pub mod bootstrap;
pub mod cli;
pub mod context;
pub mod error;
pub mod event_loop;
pub mod host;
pub mod platform;
pub mod registry;
pub mod translations;

pub use crate::error::DesktopError;

use crate::arbiter::{Arbiter, Arbitration};
use crate::bootstrap::{Bootstrap, BootstrapOutcome};
use crate::cli::Cli;
use crate::host::{BUNDLED_MANIFEST, ManifestHost};
use aegis::domain::config::{ClientConfig, LoggingConfig};
use aegis::domain::constants::APPLICATION_ID;
use aegis::domain::instance::ExitStatus;
use aegis::kernel::config::{ResolvedPaths, load_config};
use aegis::kernel::settings::SettingsStore;
use aegis_event_bus::EventBus;
use aegis_logger::{LevelFilter, Logger};
use anyhow::Context;
use tracing::info;

/// Runs the shell to completion and reports the process exit status.
///
/// # Errors
/// Fatal bootstrap failures: malformed configuration, an unusable settings
/// store, logger installation or registry programming errors.
pub async fn run(cli: Cli) -> anyhow::Result<ExitStatus> {
    let mut config: ClientConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if cli.allow_secondary {
        config.instance.allow_secondary = true;
    }
    let paths = ResolvedPaths::resolve(&config.paths).context("Failed to resolve directories")?;

    let logger = init_logger(&config.logging)?;
    let flags = cli.flags();
    let bus = EventBus::new();

    if !flags.proceeds_to_startup() {
        let log_dir = paths.log_dir.clone();
        return Ok(cli::run_cleanup(&bus, || Logger::clean_up(&log_dir, APPLICATION_ID)).await?);
    }

    let shim = platform::current();
    let arbitration = Arbiter::new(&config.instance, &paths.runtime_dir).arbitrate(shim.family(), &bus).await;
    if arbitration.should_exit() {
        return Ok(ExitStatus::SUCCESS);
    }
    let role = arbitration.role();
    let listener = match arbitration {
        Arbitration::Primary { listener } => listener,
        Arbitration::Secondary { .. } => None,
    };

    let settings = SettingsStore::open(paths.settings_file()).context("Failed to open settings")?;
    let configurator = aegis_configurator::init(settings.clone());
    let debug_sink = logger.debug_sink(&paths.log_dir);

    let host_bus = bus.clone();
    // An explicitly configured assets directory must hold the window tree.
    let bundled = config.paths.assets_dir.is_none();
    let bootstrap = Bootstrap {
        flags,
        role,
        paths,
        settings,
        configurator,
        bus,
        debug_sink,
        shim,
        listener,
        locale: None,
    };

    let outcome = bootstrap
        .run(move |configurator| {
            let host = ManifestHost::new(configurator, host_bus);
            Box::new(if bundled { host.with_bundled_manifest(BUNDLED_MANIFEST) } else { host })
        })
        .context("Bootstrap failed")?;

    match outcome {
        BootstrapOutcome::Exit(status) => Ok(status),
        BootstrapOutcome::Running(mut ctx) => {
            let status = ctx.run().await;
            ctx.teardown();
            info!(%status, "Shutdown complete");
            Ok(status)
        },
    }
}

fn init_logger(logging: &LoggingConfig) -> anyhow::Result<Logger> {
    let level: LevelFilter =
        logging.level.parse().with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let builder = Logger::builder()
        .name(APPLICATION_ID)
        .console(logging.console)
        .json(logging.json)
        .max_files(logging.max_files)
        .level(level);
    let builder = match &logging.filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    };

    Ok(builder.init()?)
}
