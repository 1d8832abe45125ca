//! # Logger
//!
//! Tracing setup for the client shell.
//!
//! Console output is configured once at startup. Disk output goes through a
//! [`DiskSink`] that can be attached after the subscriber is installed, so the
//! shell can honour the persisted "save logs" setting once its configuration
//! store is available, and the presentation layer can toggle it at runtime
//! through the [`DebugSink`].
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"aegis=debug,tokio=info"`); `RUST_LOG` still wins when no
//!   explicit filter is set.
//! * [`clean_up`] removes the rolled files of an application without
//!   installing a subscriber.
//!
//! ## Example
//!
//! ```rust
//! # use aegis_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("aegis")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod debug;
mod disk;
mod error;

pub use crate::debug::{DebugLevel, DebugSink, PRESENTATION_TARGET};
pub use crate::disk::{DiskSink, DiskWriter, clean_up};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;

#[derive(Debug)]
pub struct LoggerConfig {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    ansi: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            ansi: ansi_from_env(std::env::var_os("NO_COLOR").as_deref()),
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
///
/// A name is required before [`LoggerBuilder::init`] becomes available; it
/// prefixes every rolled log file.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { name: WithName(name.into()), config: self.config }
    }
}

impl LoggerBuilder<WithName> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `aegis=debug,tokio=info`).
    ///
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Configures the maximum number of rolled files kept on disk.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes disk records as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Colours console output. Defaults to on unless `NO_COLOR` is set.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Attaches disk output to `path` as part of [`LoggerBuilder::init`].
    ///
    /// Without it the disk sink starts detached; see [`Logger::attach_file`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle that owns the disk sink. Keep it alive until
    /// shutdown so buffered records are flushed.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate_config(&self.config, &name)?;

        let env_filter = build_env_filter(&self.config)?;
        let disk = DiskSink::new(name.clone(), self.config.rotation.clone(), self.config.max_files);

        let mut layers = Vec::new();
        if self.config.console {
            layers.push(layer().compact().with_ansi(self.config.ansi).boxed());
        }

        let file_layer = layer().with_writer(disk.clone()).with_ansi(false);
        layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        if let Some(path) = &self.config.path {
            disk.attach(path)?;
        }

        Ok(Logger { name, disk })
    }
}

/// A handle to the initialized logging system.
///
/// Dropping it detaches disk output and flushes the background writer.
#[must_use = "Dropping this handle will stop disk logging."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    disk: DiskSink,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// The `name` prefixes rolled log files (e.g., `aegis.2026-10-19.log`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use aegis_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("aegis")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts writing rolled files to `dir` for the rest of the session.
    pub fn attach_file(&self, dir: impl AsRef<Path>) -> Result<(), LoggerError> {
        self.disk.attach(dir)
    }

    #[must_use]
    pub fn is_file_attached(&self) -> bool {
        self.disk.is_attached()
    }

    /// Removes the rolled files of `name` from `dir`. See [`clean_up`].
    pub fn clean_up(dir: impl AsRef<Path>, name: &str) -> Result<usize, LoggerError> {
        clean_up(dir, name)
    }

    /// Handle exposed to the presentation layer, bound to `log_dir`.
    #[must_use]
    pub fn debug_sink(&self, log_dir: impl Into<PathBuf>) -> DebugSink {
        DebugSink::new(self.disk.clone(), log_dir)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.disk.is_attached() {
            tracing::info!("Logging system shutting down, flushing buffers...");
            self.disk.detach();
        }
    }
}

/// `NO_COLOR` set to any non-empty value disables colours.
fn ansi_from_env(no_color: Option<&std::ffi::OsStr>) -> bool {
    no_color.is_none_or(std::ffi::OsStr::is_empty)
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}
