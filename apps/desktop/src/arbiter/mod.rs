//! Single-instance arbitration.
//!
//! The first process of a user session binds a local endpoint (a Unix socket
//! or a Windows named pipe) and becomes primary. Later processes connect to
//! it, send `activate`, wait for `ok` and exit. Any IPC failure resolves to
//! primary; the handshake is bounded by the arbitration timeout so a wedged
//! primary can never hang startup.

#[cfg(not(any(unix, windows)))]
mod fallback;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(not(any(unix, windows)))]
use fallback as sys;
#[cfg(unix)]
use unix as sys;
#[cfg(windows)]
use windows as sys;

use aegis_domain::config::InstanceConfig;
use aegis_domain::events::InstanceActivated;
use aegis_domain::instance::ProcessRole;
use aegis_domain::platform::PlatformFamily;
use aegis_event_bus::EventBus;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const ACTIVATE: &str = "activate";
pub const ACK: &str = "ok";

/// A vacant endpoint claimed by someone else is contacted once more.
const BIND_ATTEMPTS: u32 = 2;

/// Where the primary listens for activation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    path: PathBuf,
}

impl Endpoint {
    /// Per-user endpoint named `<instance>-<user>`.
    #[must_use]
    pub fn new(instance_name: &str, runtime_dir: &Path) -> Self {
        Self::for_user(instance_name, &current_user(), runtime_dir)
    }

    #[must_use]
    pub fn for_user(instance_name: &str, user: &str, runtime_dir: &Path) -> Self {
        let name = format!("{}-{}", sanitize(instance_name), sanitize(user));
        let path = sys::endpoint_path(&name, runtime_dir);
        Self { name, path }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "user".to_owned())
}

fn sanitize(raw: &str) -> String {
    raw.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' }).collect()
}

/// Result of arbitration.
#[derive(Debug)]
pub enum Arbitration {
    /// This process is the active instance. `listener` is absent on mobile or
    /// when the endpoint could not be bound.
    Primary { listener: Option<InstanceListener> },
    /// Another instance is active. `handed_off` is false only when the
    /// secondary was explicitly allowed to start anyway.
    Secondary { handed_off: bool },
}

impl Arbitration {
    #[must_use]
    pub const fn role(&self) -> ProcessRole {
        match self {
            Self::Primary { .. } => ProcessRole::Primary,
            Self::Secondary { .. } => ProcessRole::Secondary,
        }
    }

    /// Whether this process must exit right away.
    #[must_use]
    pub const fn should_exit(&self) -> bool {
        matches!(self, Self::Secondary { handed_off: true })
    }
}

#[derive(Debug, Clone)]
pub struct Arbiter {
    endpoint: Endpoint,
    timeout: Duration,
    allow_secondary: bool,
}

impl Arbiter {
    #[must_use]
    pub fn new(instance: &InstanceConfig, runtime_dir: &Path) -> Self {
        Self::with_endpoint(
            Endpoint::new(&instance.name, runtime_dir),
            instance.arbitration_timeout(),
            instance.allow_secondary,
        )
    }

    #[must_use]
    pub const fn with_endpoint(endpoint: Endpoint, timeout: Duration, allow_secondary: bool) -> Self {
        Self { endpoint, timeout, allow_secondary }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Decides this process's role. Never fails and never waits longer than
    /// the arbitration timeout on a peer.
    ///
    /// Activation requests received as primary are delivered to the
    /// [`InstanceActivated`] queue of `bus`.
    pub async fn arbitrate(&self, family: PlatformFamily, bus: &EventBus) -> Arbitration {
        if family.is_mobile() {
            debug!(%family, "Single-instance arbitration bypassed");
            return Arbitration::Primary { listener: None };
        }

        // Held until this process either handed off or owns the endpoint.
        let _guard = match tokio::time::timeout(self.timeout, sys::acquire(&self.endpoint)).await {
            Ok(Ok(guard)) => Some(guard),
            Ok(Err(err)) => {
                warn!(error = %err, endpoint = self.endpoint.name(), "Arbitration lock unavailable");
                None
            },
            Err(_) => {
                warn!(timeout = ?self.timeout, "Timed out waiting for the arbitration lock");
                None
            },
        };

        let mut attempt = 1;
        loop {
            let vacant = match tokio::time::timeout(self.timeout, self.contact_primary()).await {
                Ok(Ok(Contact::HandedOff)) => {
                    info!(endpoint = self.endpoint.name(), "Primary instance notified, exiting");
                    return Arbitration::Secondary { handed_off: true };
                },
                Ok(Ok(Contact::Allowed)) => {
                    info!(endpoint = self.endpoint.name(), "Starting as an allowed secondary instance");
                    return Arbitration::Secondary { handed_off: false };
                },
                Ok(Err(err)) if sys::is_stale(&err) => {
                    sys::remove_stale(&self.endpoint);
                    true
                },
                Ok(Err(err)) if sys::is_absent(&err) => true,
                Ok(Err(err)) => {
                    warn!(error = %err, endpoint = self.endpoint.name(), "Arbitration failed, assuming primary");
                    false
                },
                Err(_) => {
                    warn!(timeout = ?self.timeout, "Arbitration timed out, assuming primary");
                    false
                },
            };

            match self.listen(bus) {
                Ok(listener) => {
                    info!(endpoint = %self.endpoint.path().display(), "Listening for activation requests");
                    return Arbitration::Primary { listener: Some(listener) };
                },
                Err(err) if vacant && sys::is_taken(&err) && attempt < BIND_ATTEMPTS => {
                    debug!(endpoint = self.endpoint.name(), "Endpoint claimed concurrently, contacting its owner");
                    attempt += 1;
                },
                Err(err) => {
                    warn!(error = %err, endpoint = self.endpoint.name(), "Failed to bind activation endpoint");
                    return Arbitration::Primary { listener: None };
                },
            }
        }
    }

    async fn contact_primary(&self) -> io::Result<Contact> {
        let stream = sys::connect(&self.endpoint).await?;
        if self.allow_secondary {
            return Ok(Contact::Allowed);
        }
        request_activation(stream).await?;
        Ok(Contact::HandedOff)
    }

    fn listen(&self, bus: &EventBus) -> io::Result<InstanceListener> {
        let sender = bus.queue_sender::<InstanceActivated>().map_err(|err| io::Error::other(err.to_string()))?;
        sys::listen(&self.endpoint, sender, self.timeout)
    }
}

enum Contact {
    HandedOff,
    Allowed,
}

/// Accept loop of the primary. Dropping it stops listening and releases the
/// endpoint.
#[derive(Debug)]
pub struct InstanceListener {
    endpoint: Endpoint,
    task: JoinHandle<()>,
}

impl InstanceListener {
    pub(crate) const fn new(endpoint: Endpoint, task: JoinHandle<()>) -> Self {
        Self { endpoint, task }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Drop for InstanceListener {
    fn drop(&mut self) {
        self.task.abort();
        sys::release(&self.endpoint);
        debug!(endpoint = self.endpoint.name(), "Activation endpoint released");
    }
}

async fn request_activation<S>(stream: S) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    stream.get_mut().write_all(format!("{ACTIVATE}\n").as_bytes()).await?;
    stream.get_mut().flush().await?;

    let mut reply = String::new();
    stream.read_line(&mut reply).await?;
    if reply.trim_end() == ACK {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::InvalidData, format!("unexpected reply {reply:?}")))
    }
}

/// Serves one peer: a single `activate` line yields exactly one event.
pub(crate) async fn serve_peer<S>(
    stream: S,
    sender: &mpsc::Sender<Arc<InstanceActivated>>,
    timeout: Duration,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    let mut line = String::new();
    let read = tokio::time::timeout(timeout, stream.read_line(&mut line))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "peer sent nothing"))??;

    match line.trim_end() {
        ACTIVATE => {
            if sender.send(Arc::new(InstanceActivated)).await.is_err() {
                debug!("Event loop gone, activation dropped");
            }
            stream.get_mut().write_all(format!("{ACK}\n").as_bytes()).await?;
            stream.get_mut().flush().await?;
        },
        _ if read == 0 => debug!("Peer disconnected without a request"),
        other => warn!(message = other, "Ignoring unknown activation message"),
    }
    Ok(())
}
