use aegis_domain::taxonomy::{Proto, TransportProto};
use aegis_kernel::domain::registry::Singleton;
use aegis_protocols::{ProtocolProps, init};

#[test]
fn registers_under_its_presentation_name() {
    let props = init();
    assert_eq!(props.registry_name(), ProtocolProps::REGISTRY_NAME);
    assert_eq!(ProtocolProps::REGISTRY_NAME, "ProtocolProps");
}

#[test]
fn names_parse_like_the_presentation_layer_spells_them() {
    let props = init();

    assert_eq!(props.proto_from_name("WireGuard"), Some(Proto::WireGuard));
    assert_eq!(props.proto_from_name("wireguard"), None);
    assert_eq!(props.transport_from_name("tcp"), Some(TransportProto::Tcp));
    assert_eq!(props.transport_from_name("quic"), None);
}

#[test]
fn wildcard_uses_fallback_transport() {
    let props = init();

    assert!(!props.protocols().contains(&Proto::Any));
    assert_eq!(props.transport_for(Proto::Any), TransportProto::Udp);
    assert_eq!(props.transport_for(Proto::OpenVpn), TransportProto::Tcp);
    assert_eq!(props.default_port(Proto::WireGuard), Some(51820));
}
