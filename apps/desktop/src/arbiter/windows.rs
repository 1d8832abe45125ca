use super::{Endpoint, InstanceListener, serve_peer};
use aegis_domain::events::InstanceActivated;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient, ServerOptions};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const ERROR_PIPE_BUSY: i32 = 231;
const BUSY_RETRY: Duration = Duration::from_millis(20);

pub(super) fn endpoint_path(name: &str, _runtime_dir: &Path) -> PathBuf {
    PathBuf::from(format!(r"\\.\pipe\{name}"))
}

pub(super) async fn connect(endpoint: &Endpoint) -> io::Result<NamedPipeClient> {
    loop {
        match ClientOptions::new().open(endpoint.path()) {
            Ok(client) => return Ok(client),
            Err(err) if err.raw_os_error() == Some(ERROR_PIPE_BUSY) => {
                tokio::time::sleep(BUSY_RETRY).await;
            },
            Err(err) => return Err(err),
        }
    }
}

/// Creating the first pipe instance is atomic, so no cross-process lock is needed.
#[allow(clippy::unused_async)]
pub(super) async fn acquire(_endpoint: &Endpoint) -> io::Result<()> {
    Ok(())
}

pub(super) fn is_absent(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

pub(super) const fn is_stale(_err: &io::Error) -> bool {
    false
}

/// `first_pipe_instance` refuses with access denied when the pipe exists.
pub(super) fn is_taken(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Pipes vanish with their owner; nothing is left behind.
pub(super) const fn remove_stale(_endpoint: &Endpoint) {}

pub(super) fn listen(
    endpoint: &Endpoint,
    sender: mpsc::Sender<Arc<InstanceActivated>>,
    timeout: Duration,
) -> io::Result<InstanceListener> {
    let path = endpoint.path().to_path_buf();
    let mut server = ServerOptions::new().first_pipe_instance(true).create(&path)?;

    let task = tokio::spawn(async move {
        loop {
            if let Err(err) = server.connect().await {
                warn!(error = %err, "Activation accept failed, listener stopped");
                break;
            }
            let connected = server;
            server = match ServerOptions::new().create(&path) {
                Ok(next) => next,
                Err(err) => {
                    warn!(error = %err, "Failed to create next pipe instance, listener stopped");
                    break;
                },
            };
            if let Err(err) = serve_peer(connected, &sender, timeout).await {
                debug!(error = %err, "Activation peer failed");
            }
        }
    });

    Ok(InstanceListener::new(endpoint.clone(), task))
}

pub(super) const fn release(_endpoint: &Endpoint) {}
