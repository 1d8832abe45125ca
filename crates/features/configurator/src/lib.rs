//! Core service handle of the client.
//!
//! Constructed once, before the presentation host, and shared with it by
//! reference count. It owns a handle to the settings store; everything the
//! presentation layer changes about persisted state goes through here.

mod error;

pub use crate::error::{ConfiguratorError, ConfiguratorErrorExt};

use aegis_domain::credentials::ServerCredentials;
use aegis_domain::settings::Settings;
use aegis_kernel::settings::SettingsStore;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Configurator {
    inner: Arc<ConfiguratorInner>,
}

#[derive(Debug)]
struct ConfiguratorInner {
    settings: SettingsStore,
}

impl Configurator {
    #[must_use]
    pub fn settings_store(&self) -> &SettingsStore {
        &self.inner.settings
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.inner.settings.settings()
    }

    pub fn set_save_logs(&self, enabled: bool) -> Result<(), ConfiguratorError> {
        self.inner.settings.set_save_logs(enabled).context("Toggling disk logging")
    }

    pub fn set_start_minimized(&self, enabled: bool) -> Result<(), ConfiguratorError> {
        self.inner.settings.set_start_minimized(enabled).context("Toggling start minimized")
    }

    /// Checks credentials entered for a new server before any connection attempt.
    pub fn validate_credentials(&self, credentials: &ServerCredentials) -> Result<(), ConfiguratorError> {
        let missing = [
            ("host name", credentials.host_name.trim().is_empty()),
            ("user name", credentials.user_name.trim().is_empty()),
            ("password", credentials.password.is_empty()),
            ("port", credentials.port == 0),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfiguratorError::InvalidCredentials {
                message: format!("missing {}", missing.join(", ")).into(),
                context: None,
            })
        }
    }

    /// Number of live handles, the shell's own included.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

/// Builds the core service handle around the settings store.
pub fn init(settings: SettingsStore) -> Configurator {
    tracing::info!(path = %settings.path().display(), "Configurator initialized");
    Configurator { inner: Arc::new(ConfiguratorInner { settings }) }
}
