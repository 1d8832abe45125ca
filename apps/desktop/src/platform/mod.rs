//! Platform capability shim.
//!
//! One [`PlatformShim`] per platform family. The family in use is fixed at
//! compile time by [`current`]; the other implementations are still built so
//! their behavior stays testable on every host.

mod clipboard;
mod desktop;
mod mobile;

pub use clipboard::{Clipboard, HTML_MIME, MemoryClipboard, PLAIN_MIME, html_to_plain};
pub use desktop::{LinuxDesktop, MacOs, Windows};
pub use mobile::{Android, Ios};

use crate::error::DesktopError;
use aegis_domain::platform::{AppState, Capabilities, PlatformFamily, VisibilityPolicy};
use aegis_kernel::settings::SettingsStore;
use std::fmt::Debug;
use std::path::Path;

pub trait PlatformShim: Debug {
    fn family(&self) -> PlatformFamily;

    fn capabilities(&self) -> Capabilities;

    fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::AlwaysShowOnStartup
    }

    /// Runs after the registry is populated and before the visual tree loads.
    fn before_load(&mut self) -> Result<(), DesktopError> {
        Ok(())
    }

    /// Final bootstrap step. `config_root` holds the settings files.
    fn apply(&mut self, _settings: &SettingsStore, _config_root: &Path) -> Result<(), DesktopError> {
        Ok(())
    }

    fn on_app_state(&mut self, _state: AppState) {}
}

/// Shim for the platform this binary was compiled for.
///
/// On Android the clipboard is in-process; an embedder that owns the system
/// clipboard builds [`Android::new`] with its own [`Clipboard`] instead. On iOS
/// the controller bootstrap is passed through [`Ios::with_controller`].
#[must_use]
pub fn current() -> Box<dyn PlatformShim> {
    #[cfg(target_os = "android")]
    {
        Box::new(Android::new(Box::new(MemoryClipboard::default())))
    }
    #[cfg(target_os = "ios")]
    {
        Box::new(Ios::default())
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(MacOs)
    }
    #[cfg(windows)]
    {
        Box::new(Windows)
    }
    #[cfg(not(any(windows, target_os = "android", target_os = "ios", target_os = "macos")))]
    {
        Box::new(LinuxDesktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain::platform::InitialVisibility;

    #[test]
    fn only_windows_follows_the_autostart_flag() {
        let shims: Vec<Box<dyn PlatformShim>> = vec![
            Box::new(LinuxDesktop),
            Box::new(Windows),
            Box::new(MacOs),
            Box::new(Android::new(Box::new(MemoryClipboard::default()))),
            Box::new(Ios::default()),
        ];

        for shim in shims {
            let policy = shim.visibility_policy();
            let manual = policy.decide(false);
            let autostart = policy.decide(true);
            assert_eq!(autostart, InitialVisibility::ShowOnStartup, "{:?}", shim.family());
            if shim.family() == PlatformFamily::Windows {
                assert_eq!(manual, InitialVisibility::Show);
            } else {
                assert_eq!(manual, InitialVisibility::ShowOnStartup, "{:?}", shim.family());
            }
        }
    }

    #[test]
    fn mobile_shims_skip_single_instance() {
        assert!(!Android::new(Box::new(MemoryClipboard::default()))
            .capabilities()
            .contains(Capabilities::SINGLE_INSTANCE));
        assert!(!Ios::default().capabilities().contains(Capabilities::SINGLE_INSTANCE));
        assert!(Windows.capabilities().contains(Capabilities::SINGLE_INSTANCE));
    }

    #[test]
    fn current_matches_the_compile_target() {
        let shim = current();
        if cfg!(all(target_os = "linux", not(target_os = "android"))) {
            assert_eq!(shim.family(), PlatformFamily::LinuxDesktop);
        }
    }
}
