use crate::disk::{DiskSink, clean_up};
use crate::error::LoggerError;
use std::path::{Path, PathBuf};

/// Target used for records forwarded from the presentation layer.
pub const PRESENTATION_TARGET: &str = "aegis::ui";

/// Severity of a message forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugLevel {
    Debug,
    Info,
    Warning,
    Critical,
}

/// Process-wide log handle exposed to the presentation layer as `Debug`.
///
/// Lets the UI forward its own messages into the tracing pipeline, toggle
/// disk logging from the settings page and clear old log files.
#[derive(Debug, Clone)]
pub struct DebugSink {
    disk: DiskSink,
    log_dir: PathBuf,
}

impl DebugSink {
    pub(crate) fn new(disk: DiskSink, log_dir: impl Into<PathBuf>) -> Self {
        Self { disk, log_dir: log_dir.into() }
    }

    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    #[must_use]
    pub fn is_saving_logs(&self) -> bool {
        self.disk.is_attached()
    }

    /// Turns disk logging on or off for the rest of the session.
    pub fn set_saving_logs(&self, enabled: bool) -> Result<(), LoggerError> {
        match (enabled, self.disk.is_attached()) {
            (true, false) => self.disk.attach(&self.log_dir),
            (false, true) => {
                self.disk.detach();
                Ok(())
            },
            _ => Ok(()),
        }
    }

    /// Removes the application's log files, resuming disk output afterwards
    /// if it was active.
    pub fn clear_logs(&self) -> Result<usize, LoggerError> {
        let was_saving = self.disk.is_attached();
        self.disk.detach();
        let removed = clean_up(&self.log_dir, self.disk.prefix())?;
        if was_saving {
            self.disk.attach(&self.log_dir)?;
        }
        Ok(removed)
    }

    pub fn message(&self, level: DebugLevel, text: &str) {
        match level {
            DebugLevel::Debug => tracing::debug!(target: PRESENTATION_TARGET, "{text}"),
            DebugLevel::Info => tracing::info!(target: PRESENTATION_TARGET, "{text}"),
            DebugLevel::Warning => tracing::warn!(target: PRESENTATION_TARGET, "{text}"),
            DebugLevel::Critical => tracing::error!(target: PRESENTATION_TARGET, "{text}"),
        }
    }
}
