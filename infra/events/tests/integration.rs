pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use aegis_event_bus::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_broadcast_flow() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<StateChange>().unwrap();

        assert_eq!(bus.publish(StateChange(true)).unwrap(), 1);

        let received = rx.next_event().await.unwrap();
        assert_eq!(*received, StateChange(true));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(StateChange(false)).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_receiver_skips_lagged_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_with_capacity::<Activation>(2).unwrap();

        for i in 0..50 {
            bus.publish(Activation(i)).unwrap();
        }

        let first = rx.next_event().await.unwrap();
        assert!(first.0 >= 48, "expected the retained tail, got {}", first.0);
        let second = rx.next_event().await.unwrap();
        assert_eq!(second.0, first.0 + 1);
    }

    #[tokio::test]
    async fn test_queue_preserves_order() {
        let bus = EventBus::new();
        let mut rx = bus.take_queue::<Activation>(8).unwrap();

        for i in 0..5 {
            bus.publish_queue(Activation(i)).unwrap();
        }

        for i in 0..5 {
            assert_eq!(rx.next_event().await.unwrap().0, i);
        }
    }

    #[tokio::test]
    async fn test_queue_buffers_until_consumer_is_taken() {
        let bus = EventBus::new();
        bus.publish_queue(Activation(7)).unwrap();

        let mut rx = bus.take_queue::<Activation>(8).unwrap();
        assert_eq!(rx.next_event().await.unwrap().0, 7);
    }

    #[tokio::test]
    async fn test_queue_has_single_consumer() {
        let bus = EventBus::new();
        let _rx = bus.take_queue::<Activation>(4).unwrap();

        let second = bus.take_queue::<Activation>(4);
        assert!(matches!(second, Err(EventBusError::ReceiverTaken { .. })));
    }

    #[tokio::test]
    async fn test_queue_full_and_closed() {
        let bus = EventBus::new();
        let rx = bus.take_queue::<Activation>(1).unwrap();

        bus.publish_queue(Activation(1)).unwrap();
        let full = bus.publish_queue(Activation(2));
        assert!(matches!(full, Err(EventBusError::ChannelFull { .. })));

        drop(rx);
        let closed = bus.publish_queue(Activation(3));
        assert!(matches!(closed, Err(EventBusError::ChannelClosed { .. })));
    }

    #[tokio::test]
    async fn test_queue_sender_moves_into_tasks() {
        let bus = EventBus::new();
        let mut rx = bus.take_queue::<Activation>(16).unwrap();
        let sender = bus.queue_sender::<Activation>().unwrap();

        let producer = tokio::spawn(async move {
            for i in 0..3 {
                sender.send(std::sync::Arc::new(Activation(i))).await.unwrap();
            }
        });
        producer.await.unwrap();

        let mut seen = Vec::new();
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(50), rx.next_event()).await
        {
            seen.push(event.0);
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_kind_is_fixed_per_type() {
        let bus = EventBus::new();
        let _rx = bus.subscribe::<StateChange>().unwrap();

        assert_eq!(bus.kind_of::<StateChange>(), Some(ChannelKind::Broadcast { capacity: 64 }));
        let err = bus.take_queue::<StateChange>(4).unwrap_err();
        assert_eq!(err.kind(), "ChannelKindMismatch");

        let _queue = bus.take_queue::<Activation>(4).unwrap();
        assert!(bus.subscribe::<Activation>().is_err());
    }

    #[tokio::test]
    async fn test_shutdown_closes_broadcast_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<StateChange>().unwrap();
        let _queue = bus.take_queue::<Activation>(4).unwrap();

        assert_eq!(bus.shutdown(), 2);
        assert!(rx.next_event().await.is_none());
        assert!(bus.kind_of::<StateChange>().is_none());
    }

    #[tokio::test]
    async fn test_invalid_capacity_rejected() {
        let bus = EventBus::new();

        let result = bus.subscribe_with_capacity::<StateChange>(0);
        assert!(matches!(result, Err(EventBusError::InvalidCapacity { .. })));

        let result = bus.take_queue::<Activation>(0);
        assert!(matches!(result, Err(EventBusError::InvalidCapacity { .. })));
    }
}
