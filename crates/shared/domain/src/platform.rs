use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Platform families with distinct lifecycle behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
pub enum PlatformFamily {
    LinuxDesktop,
    Windows,
    MacOs,
    Android,
    Ios,
}

impl PlatformFamily {
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }
}

bitflags! {
    /// Adjustments a platform shim contributes to startup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u32 {
        /// Takes part in single-instance arbitration.
        const SINGLE_INSTANCE = 1 << 0;
        /// Tightens permissions on configuration files.
        const FILE_PERMISSIONS = 1 << 1;
        /// Rewrites rich clipboard contents to plain text on activation.
        const CLIPBOARD_SANITIZE = 1 << 2;
        /// Brings up a native controller before the visual tree loads.
        const NATIVE_CONTROLLER = 1 << 3;
    }
}

/// How the first window is presented once the visual tree is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityPolicy {
    /// Always go through the host's show-on-startup routine.
    AlwaysShowOnStartup,
    /// Show-on-startup when autostarted, otherwise a plain show.
    FollowAutostartFlag,
}

/// Concrete first-window action derived from a [`VisibilityPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialVisibility {
    /// Honor the "start minimized" setting.
    ShowOnStartup,
    Show,
}

impl VisibilityPolicy {
    #[must_use]
    pub const fn decide(self, autostart: bool) -> InitialVisibility {
        match self {
            Self::AlwaysShowOnStartup => InitialVisibility::ShowOnStartup,
            Self::FollowAutostartFlag if autostart => InitialVisibility::ShowOnStartup,
            Self::FollowAutostartFlag => InitialVisibility::Show,
        }
    }
}

/// Application activity as reported by the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    Suspended,
    Hidden,
    Inactive,
    Active,
}
