//! Process-level facts decided once at startup.

use serde::{Deserialize, Serialize};

/// Outcome of single-instance arbitration. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessRole {
    /// Sole active instance; owns the activation endpoint when one could be bound.
    Primary,
    /// Another instance is active.
    Secondary,
}

impl ProcessRole {
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// Flags parsed once from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupFlags {
    /// Launched by the OS at login.
    pub autostart: bool,
    /// Remove log files and quit instead of starting normally.
    pub cleanup: bool,
}

impl StartupFlags {
    /// Normal startup is skipped whenever cleanup is requested.
    #[must_use]
    pub const fn proceeds_to_startup(self) -> bool {
        !self.cleanup
    }
}

/// Process exit status reported by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const SUCCESS: Self = Self(0);
    /// Fatal bootstrap error (configuration or registry).
    pub const FAILURE: Self = Self(1);
    /// The visual tree could not be materialized.
    pub const LOAD_FAILURE: Self = Self(-1);

    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
