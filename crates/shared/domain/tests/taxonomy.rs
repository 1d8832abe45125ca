use aegis_domain::constants::{CONNECTION_STATE, PAGE};
use aegis_domain::registry::EnumDescriptor;
use aegis_domain::taxonomy::{ConnectionState, DockerContainer, Page, Proto, ServiceType};
use proptest::prelude::*;
use std::str::FromStr;
use strum::{EnumCount, IntoEnumIterator, VariantNames};

#[test]
fn variant_names_follow_declaration_order() {
    assert_eq!(
        ConnectionState::VARIANTS,
        &[
            "Unknown",
            "Disconnected",
            "Preparing",
            "Connecting",
            "Connected",
            "Disconnecting",
            "Reconnecting",
            "Error"
        ]
    );
    assert_eq!(Page::COUNT, 24);
    assert_eq!(Page::VARIANTS.first(), Some(&"Start"));
    assert_eq!(Page::VARIANTS.last(), Some(&"ViewConfig"));
}

#[test]
fn descriptor_ordinals_match_iteration_order() {
    let descriptor = EnumDescriptor::of::<Page>(PAGE);
    for (ordinal, page) in Page::iter().enumerate() {
        assert_eq!(descriptor.ordinal(page.as_ref()), Some(ordinal));
    }
    assert_eq!(descriptor.ordinal("NoSuchPage"), None);

    let descriptor = EnumDescriptor::of::<ConnectionState>(CONNECTION_STATE);
    assert_eq!(descriptor.ordinal("Connected"), Some(4));
}

#[test]
fn containers_map_to_service_types() {
    assert_eq!(DockerContainer::None.service_type(), ServiceType::None);
    assert_eq!(DockerContainer::WireGuard.service_type(), ServiceType::Vpn);
    assert_eq!(DockerContainer::Sftp.service_type(), ServiceType::Other);
    assert!(DockerContainer::None.protocols().is_empty());
    assert_eq!(DockerContainer::Ipsec.protocols(), &[Proto::Ikev2, Proto::L2tp]);
}

#[test]
fn connection_state_activity() {
    assert!(ConnectionState::Connected.is_active());
    assert!(ConnectionState::Reconnecting.is_active());
    assert!(!ConnectionState::Disconnected.is_active());
    assert!(!ConnectionState::Error.is_active());
}

proptest! {
    #[test]
    fn names_parse_back_to_the_same_variant(index in 0usize..Proto::COUNT) {
        let name = Proto::VARIANTS[index];
        let proto = Proto::from_str(name).expect("variant name parses");
        prop_assert_eq!(proto.to_string(), name);
        prop_assert_eq!(Proto::iter().position(|p| p == proto), Some(index));
    }
}
