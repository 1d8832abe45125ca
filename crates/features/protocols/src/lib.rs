//! Protocol catalogue, published to the presentation layer as `ProtocolProps`.

use aegis_domain::taxonomy::{Proto, TransportProto};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Read-only facts about the protocols the client understands.
#[aegis_derive::service(name = "ProtocolProps")]
pub struct ProtocolProps {
    pub default_transport: TransportProto,
}

impl ProtocolProps {
    /// Every concrete protocol, skipping the `Any` wildcard.
    #[must_use]
    pub fn protocols(&self) -> Vec<Proto> {
        Proto::iter().filter(|p| *p != Proto::Any).collect()
    }

    /// Parses a protocol by its presentation name (e.g. `"WireGuard"`).
    #[must_use]
    pub fn proto_from_name(&self, name: &str) -> Option<Proto> {
        Proto::from_str(name).ok()
    }

    /// Parses a transport, case-insensitively (`"udp"`, `"TCP"`).
    #[must_use]
    pub fn transport_from_name(&self, name: &str) -> Option<TransportProto> {
        TransportProto::iter().find(|t| t.as_ref().eq_ignore_ascii_case(name))
    }

    /// Transport used when a protocol leaves the choice open.
    #[must_use]
    pub fn transport_for(&self, proto: Proto) -> TransportProto {
        proto.default_transport().unwrap_or(self.default_transport)
    }

    #[must_use]
    pub const fn default_port(&self, proto: Proto) -> Option<u16> {
        proto.default_port()
    }
}

/// Builds the service with UDP as the fallback transport.
pub fn init() -> ProtocolProps {
    tracing::debug!("Protocol catalogue initialized");
    ProtocolProps::new(ProtocolPropsInner { default_transport: TransportProto::Udp })
}
