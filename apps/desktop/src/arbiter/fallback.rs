use super::{Endpoint, InstanceListener};
use aegis_domain::events::InstanceActivated;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;

pub(super) fn endpoint_path(name: &str, runtime_dir: &Path) -> PathBuf {
    runtime_dir.join(name)
}

pub(super) async fn connect(_endpoint: &Endpoint) -> io::Result<DuplexStream> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

#[allow(clippy::unused_async)]
pub(super) async fn acquire(_endpoint: &Endpoint) -> io::Result<()> {
    Ok(())
}

pub(super) const fn is_absent(_err: &io::Error) -> bool {
    true
}

pub(super) const fn is_stale(_err: &io::Error) -> bool {
    false
}

pub(super) const fn is_taken(_err: &io::Error) -> bool {
    false
}

pub(super) const fn remove_stale(_endpoint: &Endpoint) {}

pub(super) fn listen(
    _endpoint: &Endpoint,
    _sender: mpsc::Sender<Arc<InstanceActivated>>,
    _timeout: Duration,
) -> io::Result<InstanceListener> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

pub(super) const fn release(_endpoint: &Endpoint) {}
