use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{trace, warn};

/// Default buffer for both channel kinds. Lifecycle traffic is a handful of
/// events per session, so this only matters for bursts of activations.
pub const DEFAULT_CAPACITY: usize = 64;

/// Delivery semantics of a registered event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Fan-out to every live subscriber; lagging subscribers skip ahead.
    Broadcast { capacity: usize },
    /// Ordered queue with exactly one consumer.
    Queue { capacity: usize },
}

/// Marker trait for types that can travel over the [`EventBus`].
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Slot {
    kind: ChannelKind,
    channel: Box<dyn Any + Send + Sync>,
}

#[derive(Debug)]
struct QueueSlot<T> {
    sender: mpsc::Sender<Arc<T>>,
    receiver: Option<mpsc::Receiver<Arc<T>>>,
}

/// Type-keyed event bus.
///
/// Each event type is bound to one [`ChannelKind`] the first time it is used;
/// mixing kinds for the same type is an error. Clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    slots: Arc<RwLock<FxHashMap<TypeId, Slot>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T` with the default capacity.
    ///
    /// # Examples
    /// ```rust
    /// use aegis_event_bus::{EventBus, EventReceiverExt};
    ///
    /// #[derive(Debug)]
    /// struct AppStateChanged(bool);
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), aegis_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<AppStateChanged>()?;
    /// bus.publish(AppStateChanged(true))?;
    /// assert!(rx.next_event().await.is_some_and(|e| e.0));
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// `capacity` only applies when this call creates the channel.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes a broadcast event, returning the number of receivers reached.
    ///
    /// Publishing with nobody listening is not an error.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(event).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Broadcast event published");
        Ok(delivered)
    }

    /// Takes the single consumer of the queue for `T`, creating the queue if needed.
    ///
    /// # Errors
    /// [`EventBusError::ReceiverTaken`] when the consumer was already handed out.
    pub fn take_queue<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<mpsc::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        let mut slots = self.slots.write();
        let slot = queue_slot_mut::<T>(&mut slots, capacity)?;
        slot.receiver.take().ok_or_else(|| EventBusError::ReceiverTaken {
            message: type_name::<T>().into(),
            context: Some("Queues have a single consumer".into()),
        })
    }

    /// Returns a producer handle for the queue of `T`, creating the queue if needed.
    ///
    /// Producers can outlive the bus lock and be moved into tasks.
    pub fn queue_sender<T: Event>(&self) -> Result<mpsc::Sender<Arc<T>>, EventBusError> {
        let mut slots = self.slots.write();
        Ok(queue_slot_mut::<T>(&mut slots, DEFAULT_CAPACITY)?.sender.clone())
    }

    /// Enqueues an event without waiting.
    ///
    /// # Errors
    /// [`EventBusError::ChannelFull`] at capacity, [`EventBusError::ChannelClosed`]
    /// once the consumer is gone.
    pub fn publish_queue<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let sender = self.queue_sender::<T>()?;
        sender.try_send(Arc::new(event)).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => EventBusError::ChannelFull {
                message: type_name::<T>().into(),
                context: None,
            },
            mpsc::error::TrySendError::Closed(_) => EventBusError::ChannelClosed {
                message: type_name::<T>().into(),
                context: None,
            },
        })?;
        trace!(event = type_name::<T>(), "Queued event published");
        Ok(())
    }

    /// Delivery kind bound to `T`, if any.
    #[must_use]
    pub fn kind_of<T: Event>(&self) -> Option<ChannelKind> {
        self.slots.read().get(&TypeId::of::<T>()).map(|slot| slot.kind)
    }

    /// Drops every channel. Broadcast subscribers observe closure; queue
    /// consumers observe closure once outstanding producer handles are gone.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut slots = self.slots.write();
        let count = slots.len();
        slots.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();
        if let Some(slot) = self.slots.read().get(&id) {
            return broadcast_from_slot::<T>(slot, capacity);
        }

        let mut slots = self.slots.write();
        let slot = slots.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Creating broadcast channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Slot { kind: ChannelKind::Broadcast { capacity }, channel: Box::new(tx) }
        });
        broadcast_from_slot::<T>(slot, capacity)
    }
}

fn broadcast_from_slot<T: Event>(
    slot: &Slot,
    requested: usize,
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    let ChannelKind::Broadcast { capacity } = slot.kind else {
        return Err(kind_mismatch::<T>("Broadcast", slot.kind));
    };
    if capacity != requested && requested != DEFAULT_CAPACITY {
        warn!(event = type_name::<T>(), capacity, requested, "Broadcast channel capacity is fixed");
    }
    slot.channel.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(type_mismatch::<T>)
}

fn queue_slot_mut<T: Event>(
    slots: &mut FxHashMap<TypeId, Slot>,
    capacity: usize,
) -> Result<&mut QueueSlot<T>, EventBusError> {
    let slot = slots.entry(TypeId::of::<T>()).or_insert_with(|| {
        trace!(event = type_name::<T>(), capacity, "Creating queue channel");
        let (sender, receiver) = mpsc::channel::<Arc<T>>(capacity);
        Slot {
            kind: ChannelKind::Queue { capacity },
            channel: Box::new(QueueSlot { sender, receiver: Some(receiver) }),
        }
    });

    if !matches!(slot.kind, ChannelKind::Queue { .. }) {
        return Err(kind_mismatch::<T>("Queue", slot.kind));
    }
    slot.channel.downcast_mut::<QueueSlot<T>>().ok_or_else(type_mismatch::<T>)
}

fn kind_mismatch<T>(expected: &str, found: ChannelKind) -> EventBusError {
    EventBusError::ChannelKindMismatch {
        message: format!("expected {expected} but found {found:?}").into(),
        context: Some(type_name::<T>().into()),
    }
}

fn type_mismatch<T>() -> EventBusError {
    EventBusError::TypeMismatch { message: type_name::<T>().into(), context: None }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity == 0 {
        return Err(EventBusError::InvalidCapacity {
            message: "capacity must be greater than zero".into(),
            context: None,
        });
    }
    Ok(capacity)
}
