use super::{Endpoint, InstanceListener, serve_peer};
use aegis_domain::events::InstanceActivated;
use std::fs::{File, TryLockError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const LOCK_RETRY: Duration = Duration::from_millis(10);

pub(super) fn endpoint_path(name: &str, runtime_dir: &Path) -> PathBuf {
    runtime_dir.join(format!("{name}.sock"))
}

pub(super) async fn connect(endpoint: &Endpoint) -> io::Result<UnixStream> {
    UnixStream::connect(endpoint.path()).await
}

/// Exclusive lock on `<name>.lock`, serializing the vacancy check and the bind
/// across processes. Released when the file is dropped.
pub(super) async fn acquire(endpoint: &Endpoint) -> io::Result<File> {
    let path = endpoint.path().with_extension("lock");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).truncate(false).write(true).open(&path)?;
    loop {
        match file.try_lock() {
            Ok(()) => return Ok(file),
            Err(TryLockError::WouldBlock) => tokio::time::sleep(LOCK_RETRY).await,
            Err(TryLockError::Error(err)) => return Err(err),
        }
    }
}

/// No socket file: nobody ever bound the endpoint.
pub(super) fn is_absent(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// A socket file exists but nothing accepts on it.
pub(super) fn is_stale(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::ConnectionRefused
}

/// Another process bound the endpoint first.
pub(super) fn is_taken(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AddrInUse
}

/// Removes a socket file left behind by a primary that died.
pub(super) fn remove_stale(endpoint: &Endpoint) {
    match std::fs::remove_file(endpoint.path()) {
        Ok(()) => debug!(path = %endpoint.path().display(), "Removed stale activation socket"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {},
        Err(err) => warn!(error = %err, path = %endpoint.path().display(), "Failed to remove stale socket"),
    }
}

pub(super) fn listen(
    endpoint: &Endpoint,
    sender: mpsc::Sender<Arc<InstanceActivated>>,
    timeout: Duration,
) -> io::Result<InstanceListener> {
    if let Some(parent) = endpoint.path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let listener = UnixListener::bind(endpoint.path())?;

    let task = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    if let Err(err) = serve_peer(stream, &sender, timeout).await {
                        debug!(error = %err, "Activation peer failed");
                    }
                },
                Err(err) => {
                    warn!(error = %err, "Activation accept failed, listener stopped");
                    break;
                },
            }
        }
    });

    Ok(InstanceListener::new(endpoint.clone(), task))
}

pub(super) fn release(endpoint: &Endpoint) {
    if let Err(err) = std::fs::remove_file(endpoint.path())
        && err.kind() != io::ErrorKind::NotFound
    {
        warn!(error = %err, path = %endpoint.path().display(), "Failed to remove activation socket");
    }
}
