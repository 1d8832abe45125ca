mod paths;

pub use paths::{ResolvedPaths, settings_files};

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Custom error type for config loading.
#[aegis_derive::aegis_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// No platform directory could be determined and none was configured.
    #[error("Path resolution error{}: {message}", format_context(.context))]
    Path { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Environment prefix for overrides, e.g. `AEGIS__INSTANCE__ALLOW_SECONDARY=true`.
pub const ENV_PREFIX: &str = "AEGIS";
/// Base name of the client configuration file when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "aegis";

/// Loads the client configuration from an optional file plus environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Base File**: `path` when given (must exist), otherwise `aegis.{toml,json,yaml,...}`
///    in the working directory when present.
/// 2. **Environment Overrides**: variables prefixed with `AEGIS__`, nested with
///    double underscores (`AEGIS__LOGGING__LEVEL` maps to `logging.level`).
///
/// Missing sections fall back to their `Default` values.
///
/// # Errors
/// Fails if an explicitly given file is missing, a source is malformed, or
/// the merged values do not match `T`.
///
/// # Example
/// ```rust,no_run
/// use aegis_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct ShellConfig {
///     name: String,
/// }
///
/// let cfg: ShellConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .prefix_separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    if required {
        info!(path = %effective_path.display(), "Loading client config");
    } else {
        debug!(path = %effective_path.display(), "Loading optional client config");
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
