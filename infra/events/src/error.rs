use std::borrow::Cow;

/// Errors raised by [`crate::EventBus`] operations.
#[aegis_derive::aegis_error]
pub enum EventBusError {
    /// The slot registered for an event type holds a different payload type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The event type is already registered with a different delivery kind.
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    ChannelKindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The single consumer of a queue has already been handed out.
    #[error("Receiver already taken{}: {message}", format_context(.context))]
    ReceiverTaken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A queue is at capacity.
    #[error("Channel full{}: {message}", format_context(.context))]
    ChannelFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The consumer of a queue has been dropped.
    #[error("Channel closed{}: {message}", format_context(.context))]
    ChannelClosed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
