use crate::bus::Event;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

/// Uniform `next_event` over both channel kinds.
///
/// Broadcast receivers that fall behind skip to the oldest retained event
/// instead of surfacing a lag error. `None` means the channel is closed.
pub trait EventReceiverExt<T> {
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(event = std::any::type_name::<T>(), skipped, "Event receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T: Event> EventReceiverExt<T> for mpsc::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        self.recv().await
    }
}
