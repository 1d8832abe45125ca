//! The single cooperative event loop of the shell.
//!
//! Lifecycle signals arrive as bus events and are dispatched one at a time on
//! the loop's thread, so handlers never run concurrently or re-enter.

use aegis_domain::events::{AppStateChanged, InstanceActivated, QuitRequested};
use aegis_domain::instance::ExitStatus;
use aegis_domain::platform::AppState;
use aegis_event_bus::{DEFAULT_CAPACITY, EventBus, EventBusError, EventReceiverExt};
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Reactions to the events the loop dispatches.
pub trait LoopHandler {
    fn on_activation(&mut self) {}

    fn on_app_state(&mut self, _state: AppState) {}
}

impl LoopHandler for () {}

/// Owns the receiving ends of the lifecycle channels.
#[derive(Debug)]
pub struct EventLoop {
    quit: mpsc::Receiver<Arc<QuitRequested>>,
    activations: Option<mpsc::Receiver<Arc<InstanceActivated>>>,
    app_state: Option<broadcast::Receiver<Arc<AppStateChanged>>>,
}

impl EventLoop {
    /// Takes the consumer of the quit queue. Only one loop per bus.
    pub fn new(bus: &EventBus) -> Result<Self, EventBusError> {
        Ok(Self {
            quit: bus.take_queue::<QuitRequested>(DEFAULT_CAPACITY)?,
            activations: None,
            app_state: None,
        })
    }

    /// Starts dispatching [`InstanceActivated`] to [`LoopHandler::on_activation`].
    pub fn connect_activations(&mut self, bus: &EventBus) -> Result<(), EventBusError> {
        self.activations = Some(bus.take_queue::<InstanceActivated>(DEFAULT_CAPACITY)?);
        Ok(())
    }

    /// Starts dispatching [`AppStateChanged`] to [`LoopHandler::on_app_state`].
    pub fn connect_app_state(&mut self, bus: &EventBus) -> Result<(), EventBusError> {
        self.app_state = Some(bus.subscribe::<AppStateChanged>()?);
        Ok(())
    }

    #[must_use]
    pub const fn is_activation_connected(&self) -> bool {
        self.activations.is_some()
    }

    /// Runs until a quit is requested or Ctrl-C is received.
    ///
    /// Pending activations and state changes are dispatched before a quit.
    pub async fn run<H: LoopHandler + ?Sized>(mut self, handler: &mut H) -> ExitStatus {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                biased;

                activation = next_or_pending(self.activations.as_mut()) => match activation {
                    Some(_) => handler.on_activation(),
                    None => self.activations = None,
                },
                change = next_or_pending(self.app_state.as_mut()) => match change {
                    Some(change) => handler.on_app_state(change.0),
                    None => self.app_state = None,
                },
                quit = self.quit.next_event() => {
                    let status = quit.map_or(ExitStatus::SUCCESS, |q| ExitStatus::from_code(q.code));
                    info!(%status, "Quit requested");
                    return status;
                },
                signal = &mut ctrl_c => {
                    if let Err(err) = signal {
                        warn!(error = %err, "Failed to listen for Ctrl+C");
                    }
                    info!("Interrupted, leaving event loop");
                    return ExitStatus::SUCCESS;
                },
            }
        }
    }
}

async fn next_or_pending<T, R>(receiver: Option<&mut R>) -> Option<Arc<T>>
where
    R: EventReceiverExt<T>,
{
    match receiver {
        Some(receiver) => receiver.next_event().await,
        None => pending().await,
    }
}

/// One-shot timer that enqueues `request` after `delay`.
pub fn schedule_quit(
    bus: &EventBus,
    delay: Duration,
    request: QuitRequested,
) -> Result<(), EventBusError> {
    let sender = bus.queue_sender::<QuitRequested>()?;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if sender.send(Arc::new(request)).await.is_err() {
            debug!("Event loop already gone, scheduled quit dropped");
        }
    });
    Ok(())
}
