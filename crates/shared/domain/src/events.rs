//! Lifecycle signals carried by the event bus.

use crate::platform::AppState;

/// Another instance asked the primary to come to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceActivated;

/// Request to leave the event loop with the given exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitRequested {
    pub code: i32,
}

impl QuitRequested {
    #[must_use]
    pub const fn success() -> Self {
        Self { code: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppStateChanged(pub AppState);
