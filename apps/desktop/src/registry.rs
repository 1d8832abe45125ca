//! Names published to the presentation layer.

use aegis::Services;
use aegis_domain::constants::{
    CONNECTION_STATE, DOCKER_CONTAINER, PAGE, PAGE_TYPE, PROTO, SERVER_CREDENTIALS, SERVICE_TYPE,
    TRANSPORT_PROTO, VPN_CONNECTION_STATE,
};
use aegis_domain::credentials::ServerCredentials;
use aegis_domain::registry::RecordDescriptor;
use aegis_domain::taxonomy::{
    ConnectionState, DockerContainer, Page, Proto, ServiceType, TransportProto,
};
use aegis_kernel::registry::{RegistryError, TypeRegistry};
use tracing::debug;

/// Registers the enumeration taxonomy and the credential record.
pub fn register_taxonomy(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
    registry.register_enum::<ConnectionState>(CONNECTION_STATE)?;
    registry.register_alias(VPN_CONNECTION_STATE, CONNECTION_STATE)?;
    registry.register_record(RecordDescriptor {
        type_name: SERVER_CREDENTIALS,
        fields: ServerCredentials::FIELD_NAMES,
    })?;
    registry.register_enum::<DockerContainer>(DOCKER_CONTAINER)?;
    registry.register_enum::<TransportProto>(TRANSPORT_PROTO)?;
    registry.register_enum::<Proto>(PROTO)?;
    registry.register_enum::<ServiceType>(SERVICE_TYPE)?;
    registry.register_enum::<Page>(PAGE)?;
    registry.register_alias(PAGE_TYPE, PAGE)
}

/// Builds the sealed registry: taxonomy first, then the singleton services.
pub fn populate(services: Services) -> Result<TypeRegistry, RegistryError> {
    let mut registry = TypeRegistry::new();
    register_taxonomy(&mut registry)?;
    services.register(&mut registry)?;
    registry.seal();

    debug!(names = ?registry.names().collect::<Vec<_>>(), "Registry populated");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain::constants::{CONTAINER_PROPS, PROTOCOL_PROPS};
    use aegis_domain::platform::PlatformFamily;

    #[test]
    fn every_published_name_resolves() {
        let registry = populate(aegis::init(PlatformFamily::LinuxDesktop)).expect("populate");

        for name in [
            CONNECTION_STATE,
            VPN_CONNECTION_STATE,
            SERVER_CREDENTIALS,
            DOCKER_CONTAINER,
            TRANSPORT_PROTO,
            PROTO,
            SERVICE_TYPE,
            PAGE,
            PAGE_TYPE,
            CONTAINER_PROPS,
            PROTOCOL_PROPS,
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert_eq!(registry.len(), 11);
        assert!(registry.is_sealed());
        assert_eq!(registry.resolve_variant("PageType.Start"), Some(0));
        assert_eq!(
            registry.resolve_variant("VpnConnectionState.Connected"),
            registry.resolve_variant("ConnectionState.Connected")
        );
    }

    #[test]
    fn taxonomy_cannot_be_registered_twice() {
        let mut registry = TypeRegistry::new();
        register_taxonomy(&mut registry).expect("first");
        let err = register_taxonomy(&mut registry).expect_err("second");
        assert_eq!(err.kind(), "Duplicate");
        assert_eq!(registry.len(), 9);
    }
}
