use crate::error::{LoggerError, LoggerErrorExt};
use parking_lot::{Mutex, RwLock};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

pub(crate) const LOG_FILE_SUFFIX: &str = "log";

/// Rolling disk output that can be switched on and off after the subscriber
/// is installed.
///
/// The file layer always writes through this sink; while detached, formatted
/// records are dropped. Clones share state.
#[derive(Debug, Clone)]
pub struct DiskSink {
    state: Arc<DiskState>,
}

#[derive(Debug)]
struct DiskState {
    prefix: String,
    rotation: Rotation,
    max_files: usize,
    writer: RwLock<Option<NonBlocking>>,
    active: Mutex<Option<ActiveFile>>,
}

#[derive(Debug)]
struct ActiveFile {
    dir: PathBuf,
    _guard: WorkerGuard,
}

impl DiskSink {
    pub(crate) fn new(prefix: impl Into<String>, rotation: Rotation, max_files: usize) -> Self {
        Self {
            state: Arc::new(DiskState {
                prefix: prefix.into(),
                rotation,
                max_files,
                writer: RwLock::new(None),
                active: Mutex::new(None),
            }),
        }
    }

    /// Starts writing rolled files named after the logger into `dir`.
    ///
    /// Attaching again switches to the new directory; the previous worker is
    /// flushed when its guard drops.
    pub fn attach(&self, dir: impl AsRef<Path>) -> Result<(), LoggerError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .context(format!("Failed to create log directory {}", dir.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(self.state.rotation.clone())
            .filename_prefix(&self.state.prefix)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.state.max_files)
            .build(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let previous = {
            let mut active = self.state.active.lock();
            *self.state.writer.write() = Some(writer);
            active.replace(ActiveFile { dir: dir.to_path_buf(), _guard: guard })
        };
        drop(previous);

        tracing::debug!(dir = %dir.display(), "Disk logging attached");
        Ok(())
    }

    /// Stops disk output and flushes pending records.
    pub fn detach(&self) {
        let previous = {
            let mut active = self.state.active.lock();
            self.state.writer.write().take();
            active.take()
        };
        if let Some(file) = previous {
            tracing::debug!(dir = %file.dir.display(), "Disk logging detached");
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.writer.read().is_some()
    }

    /// Directory currently receiving log files.
    #[must_use]
    pub fn directory(&self) -> Option<PathBuf> {
        self.state.active.lock().as_ref().map(|file| file.dir.clone())
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.state.prefix
    }
}

impl<'a> MakeWriter<'a> for DiskSink {
    type Writer = DiskWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.state.writer.read().as_ref().map_or(DiskWriter::Discard, |w| DiskWriter::File(w.clone()))
    }
}

/// Writer handed to the file layer for a single record.
#[derive(Debug)]
pub enum DiskWriter {
    File(NonBlocking),
    Discard,
}

impl Write for DiskWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(writer) => writer.write(buf),
            Self::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(writer) => writer.flush(),
            Self::Discard => Ok(()),
        }
    }
}

/// Removes every rolled log file written under `name` in `dir`.
///
/// Returns the number of files removed. A missing directory removes nothing.
pub fn clean_up(dir: impl AsRef<Path>, name: &str) -> Result<usize, LoggerError> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(LoggerError::Io {
                source,
                context: Some(format!("Failed to read log directory {}", dir.display()).into()),
            });
        },
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_rolled_log(&path, name) {
            continue;
        }
        fs::remove_file(&path).context(format!("Failed to remove {}", path.display()))?;
        removed += 1;
    }

    tracing::info!(dir = %dir.display(), removed, "Log files cleaned up");
    Ok(removed)
}

fn is_rolled_log(path: &Path, name: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(rest) = file_name.strip_prefix(name) else {
        return false;
    };
    rest.starts_with('.')
        && rest.strip_suffix(LOG_FILE_SUFFIX).is_some_and(|stem| stem.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rolled_log_names_are_matched_by_prefix() {
        assert!(is_rolled_log(Path::new("/l/aegis.log"), "aegis"));
        assert!(is_rolled_log(Path::new("/l/aegis.2026-10-19.log"), "aegis"));
        assert!(!is_rolled_log(Path::new("/l/aegis-helper.2026-10-19.log"), "aegis"));
        assert!(!is_rolled_log(Path::new("/l/aegis.2026-10-19.txt"), "aegis"));
        assert!(!is_rolled_log(Path::new("/l/other.log"), "aegis"));
    }

    #[test]
    fn clean_up_missing_directory_is_not_an_error() {
        let tmp = tempdir().expect("tempdir");
        let removed = clean_up(tmp.path().join("absent"), "aegis").expect("clean up");
        assert_eq!(removed, 0);
    }

    #[test]
    fn clean_up_removes_only_own_files() {
        let tmp = tempdir().expect("tempdir");
        for name in ["aegis.log", "aegis.2026-10-18.log", "aegis.2026-10-19.log", "keep.log", "aegis.conf"]
        {
            fs::write(tmp.path().join(name), b"x").expect("write");
        }

        let removed = clean_up(tmp.path(), "aegis").expect("clean up");

        assert_eq!(removed, 3);
        assert!(tmp.path().join("keep.log").exists());
        assert!(tmp.path().join("aegis.conf").exists());
    }

    #[test]
    fn detached_sink_discards_writes() {
        let sink = DiskSink::new("aegis", Rotation::NEVER, 3);
        let mut writer = sink.make_writer();

        assert!(matches!(writer, DiskWriter::Discard));
        assert_eq!(writer.write(b"dropped").expect("write"), 7);
        assert!(sink.directory().is_none());
    }

    #[test]
    fn attach_and_detach_switch_output() {
        let tmp = tempdir().expect("tempdir");
        let sink = DiskSink::new("aegis", Rotation::NEVER, 3);

        sink.attach(tmp.path()).expect("attach");
        assert!(sink.is_attached());
        assert_eq!(sink.directory().as_deref(), Some(tmp.path()));
        assert!(matches!(sink.make_writer(), DiskWriter::File(_)));

        sink.detach();
        assert!(!sink.is_attached());
        assert!(sink.directory().is_none());
    }
}
