//! Container catalogue, published to the presentation layer as `ContainerProps`.

use aegis_domain::platform::PlatformFamily;
use aegis_domain::taxonomy::{DockerContainer, Proto, ServiceType};
use strum::IntoEnumIterator;

/// Read-only facts about installable containers for the current platform.
#[aegis_derive::service(name = "ContainerProps")]
pub struct ContainerProps {
    pub platform: PlatformFamily,
    pub default_container: DockerContainer,
}

impl ContainerProps {
    /// Every container except the `None` placeholder, in catalogue order.
    #[must_use]
    pub fn all_containers(&self) -> Vec<DockerContainer> {
        DockerContainer::iter().filter(|c| *c != DockerContainer::None).collect()
    }

    /// Containers that provide a VPN tunnel and can be used on this platform.
    #[must_use]
    pub fn vpn_containers(&self) -> Vec<DockerContainer> {
        self.all_containers()
            .into_iter()
            .filter(|c| c.service_type() == ServiceType::Vpn && self.is_supported(*c))
            .collect()
    }

    #[must_use]
    pub const fn protocols_for(&self, container: DockerContainer) -> &'static [Proto] {
        container.protocols()
    }

    #[must_use]
    pub const fn service_type(&self, container: DockerContainer) -> ServiceType {
        container.service_type()
    }

    /// Whether the local client can connect through `container`.
    #[must_use]
    pub fn is_supported(&self, container: DockerContainer) -> bool {
        match container {
            DockerContainer::None => false,
            DockerContainer::Ipsec => {
                matches!(self.platform, PlatformFamily::Windows | PlatformFamily::MacOs | PlatformFamily::Ios)
            },
            _ => true,
        }
    }

    #[must_use]
    pub const fn human_name(&self, container: DockerContainer) -> &'static str {
        match container {
            DockerContainer::None => "Not installed",
            DockerContainer::OpenVpn => "OpenVPN",
            DockerContainer::ShadowSocks => "OpenVPN over ShadowSocks",
            DockerContainer::Cloak => "OpenVPN over Cloak",
            DockerContainer::WireGuard => "WireGuard",
            DockerContainer::Ipsec => "IPsec",
            DockerContainer::Dns => "DNS Service",
            DockerContainer::Sftp => "SFTP file sharing service",
            DockerContainer::TorWebSite => "Website in Tor network",
        }
    }
}

/// Builds the service for `platform`.
pub fn init(platform: PlatformFamily) -> ContainerProps {
    tracing::debug!(%platform, "Container catalogue initialized");
    ContainerProps::new(ContainerPropsInner { platform, default_container: DockerContainer::OpenVpn })
}
