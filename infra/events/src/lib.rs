//! # Event Bus
//!
//! Typed, in-process event bus for the client shell's lifecycle signals.
//!
//! Each event type is bound to one delivery kind on first use:
//!
//! * **Broadcast**: fan-out to every subscriber (application state changes).
//! * **Queue**: ordered, single consumer, many producers (instance activation,
//!   quit requests). The IPC accept task and timers produce; the event loop consumes.
//!
//! Channels are stored in an `FxHashMap` keyed by `TypeId` behind a
//! `parking_lot::RwLock`, on top of `tokio::sync` primitives.
//!
//! # Example
//!
//! ```rust
//! use aegis_event_bus::{EventBus, EventReceiverExt};
//!
//! #[derive(Debug)]
//! struct InstanceActivated;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), aegis_event_bus::EventBusError> {
//! let bus = EventBus::new();
//! let mut activations = bus.take_queue::<InstanceActivated>(8)?;
//!
//! bus.publish_queue(InstanceActivated)?;
//! assert!(activations.next_event().await.is_some());
//! # Ok(())
//! # }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, DEFAULT_CAPACITY, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
