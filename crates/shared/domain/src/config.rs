use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::APPLICATION_ID;

/// Client shell configuration, loaded once at startup.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfigInner {
    pub instance: InstanceConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(flatten, default)]
    inner: Arc<ClientConfigInner>,
}

impl Deref for ClientConfig {
    type Target = ClientConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ClientConfig {
    fn deref_mut(&mut self) -> &mut ClientConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Single-instance arbitration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Base name of the activation endpoint; the user name is appended.
    pub name: String,
    /// Start as a non-listening secondary instead of handing off.
    pub allow_secondary: bool,
    /// Upper bound for the connect/handshake with a running primary.
    pub arbitration_timeout_ms: u64,
}

impl InstanceConfig {
    #[must_use]
    pub const fn arbitration_timeout(&self) -> Duration {
        Duration::from_millis(self.arbitration_timeout_ms)
    }
}

/// Filesystem locations. Unset directories fall back to platform defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root under which `<org>/<app>.conf` lives.
    pub config_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    /// Directory for the activation socket on Unix.
    pub runtime_dir: Option<PathBuf>,
    /// Root of the presentation assets (entry resource, translations).
    /// Unset means `assets/` next to the executable, with the window tree
    /// bundled in the binary as a fallback.
    pub assets_dir: Option<PathBuf>,
}

/// Console and disk logging knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub console: bool,
    pub json: bool,
    pub max_files: usize,
    /// Explicit tracing filter (e.g. `aegis=debug`).
    pub filter: Option<String>,
}

// --- Default ---

impl Default for InstanceConfig {
    fn default() -> Self {
        Self { name: APPLICATION_ID.to_owned(), allow_secondary: false, arbitration_timeout_ms: 500 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self { config_dir: None, log_dir: None, runtime_dir: None, assets_dir: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, json: false, max_files: 10, filter: None }
    }
}
