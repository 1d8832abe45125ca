//! Persisted key/value settings (the shell's configuration store).
//!
//! The file is TOML and is shared with the presentation layer, which owns
//! most of its keys. The store reads it through `config`, only interprets the
//! keys in [`Settings`], and rewrites it with `toml` while keeping every other
//! key as it was.

use aegis_domain::settings::{PERMISSIONS_FIXED, SAVE_LOGS, START_MINIMIZED, Settings};
use config::{Config, File, FileFormat};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

#[aegis_derive::aegis_error]
pub enum SettingsError {
    #[error("Settings source error{}: {source}", format_context(.context))]
    Source { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Settings IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Settings parse error{}: {source}", format_context(.context))]
    Parse { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("Settings encode error{}: {source}", format_context(.context))]
    Encode { source: toml::ser::Error, context: Option<Cow<'static, str>> },

    #[error("Unknown setting{}: {message}", format_context(.context))]
    UnknownKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Shared handle to the settings file.
///
/// Cheap to clone; all clones observe the same cached values.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsStoreInner>,
}

#[derive(Debug)]
struct SettingsStoreInner {
    path: PathBuf,
    cache: RwLock<Settings>,
}

impl SettingsStore {
    /// Opens the store at `path`. A missing file reads as defaults and is
    /// only created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = read_settings(&path)?;
        debug!(path = %path.display(), ?settings, "Settings loaded");
        Ok(Self { inner: Arc::new(SettingsStoreInner { path, cache: RwLock::new(settings) }) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Snapshot of the cached values.
    #[must_use]
    pub fn settings(&self) -> Settings {
        *self.inner.cache.read()
    }

    #[must_use]
    pub fn is_save_logs_enabled(&self) -> bool {
        self.inner.cache.read().save_logs
    }

    #[must_use]
    pub fn is_start_minimized(&self) -> bool {
        self.inner.cache.read().start_minimized
    }

    #[must_use]
    pub fn permissions_fixed(&self) -> bool {
        self.inner.cache.read().permissions_fixed
    }

    pub fn set_save_logs(&self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(SAVE_LOGS, enabled)
    }

    pub fn set_start_minimized(&self, enabled: bool) -> Result<(), SettingsError> {
        self.set_flag(START_MINIMIZED, enabled)
    }

    pub fn set_permissions_fixed(&self, fixed: bool) -> Result<(), SettingsError> {
        self.set_flag(PERMISSIONS_FIXED, fixed)
    }

    /// Writes a boolean setting by its file key.
    ///
    /// # Errors
    /// [`SettingsError::UnknownKey`] for keys the shell does not own.
    pub fn set_flag(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        let mut cache = self.inner.cache.write();
        let mut next = *cache;
        match key {
            SAVE_LOGS => next.save_logs = value,
            START_MINIMIZED => next.start_minimized = value,
            PERMISSIONS_FIXED => next.permissions_fixed = value,
            other => {
                return Err(SettingsError::UnknownKey {
                    message: other.to_owned().into(),
                    context: None,
                });
            },
        }

        if next == *cache && self.inner.path.exists() {
            return Ok(());
        }

        write_flag(&self.inner.path, key, value)?;
        *cache = next;
        drop(cache);

        trace!(key, value, "Setting persisted");
        Ok(())
    }

    /// Re-reads the file, picking up changes made by the presentation layer.
    pub fn reload(&self) -> Result<Settings, SettingsError> {
        let settings = read_settings(&self.inner.path)?;
        *self.inner.cache.write() = settings;
        Ok(settings)
    }
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .build()
        .context(format!("Failed to read {}", path.display()))?
        .try_deserialize::<Settings>()
        .context("Failed to decode settings")
}

fn write_flag(path: &Path, key: &str, value: bool) -> Result<(), SettingsError> {
    let mut table = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<toml::Table>(&raw)
            .context(format!("Failed to parse {}", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(source) => {
            return Err(SettingsError::Io {
                source,
                context: Some(format!("Failed to read {}", path.display()).into()),
            });
        },
    };
    table.insert(key.to_owned(), toml::Value::Boolean(value));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }

    let encoded = toml::to_string_pretty(&table)?;
    let staging = path.with_extension("conf.tmp");
    fs::write(&staging, encoded).context(format!("Failed to write {}", staging.display()))?;
    // The replacement keeps the mode of the file it replaces (0600 once hardened).
    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(&staging, existing.permissions())
            .context(format!("Failed to copy permissions onto {}", staging.display()))?;
    }
    fs::rename(&staging, path).context(format!("Failed to replace {}", path.display()))?;
    Ok(())
}
