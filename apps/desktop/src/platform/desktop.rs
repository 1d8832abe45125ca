use super::PlatformShim;
use crate::error::DesktopError;
use aegis_domain::platform::{Capabilities, PlatformFamily, VisibilityPolicy};
use aegis_kernel::config::settings_files;
use aegis_kernel::security::permissions::{Hardening, restrict_all};
use aegis_kernel::settings::SettingsStore;
use std::path::Path;
use tracing::debug;

/// Linux and other Unix desktops.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxDesktop;

impl PlatformShim for LinuxDesktop {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::LinuxDesktop
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE | Capabilities::FILE_PERMISSIONS
    }

    /// Marks the settings as fixed, then restricts both settings files to
    /// their owner. Safe to repeat; missing files are skipped.
    fn apply(&mut self, settings: &SettingsStore, config_root: &Path) -> Result<(), DesktopError> {
        settings.set_permissions_fixed(true)?;

        let files = settings_files(config_root);
        let outcome = restrict_all(files.iter().map(|p| p.as_path()))?;
        let restricted = outcome.iter().filter(|h| **h == Hardening::Restricted).count();
        debug!(restricted, "Settings file permissions checked");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl PlatformShim for Windows {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Windows
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::FollowAutostartFlag
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacOs;

impl PlatformShim for MacOs {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::MacOs
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }
}
