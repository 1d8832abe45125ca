use serde::{Deserialize, Serialize};

/// Persisted user settings the shell itself reads or writes.
///
/// Other keys in the settings file belong to the presentation layer and are
/// preserved untouched by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write logs to disk.
    pub save_logs: bool,
    /// Keep the window hidden when shown on startup.
    pub start_minimized: bool,
    /// File permissions on the settings files have been tightened.
    pub permissions_fixed: bool,
}

pub const SAVE_LOGS: &str = "save_logs";
pub const START_MINIMIZED: &str = "start_minimized";
pub const PERMISSIONS_FIXED: &str = "permissions_fixed";
