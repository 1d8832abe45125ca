//! The closed set of enumerations the presentation layer references by name.
//!
//! Variant order is part of the contract: the presentation layer resolves
//! `Name.Variant` to the variant's ordinal.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames};

/// Lifecycle of the VPN tunnel as reported by the protocol engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum ConnectionState {
    #[default]
    Unknown,
    Disconnected,
    Preparing,
    Connecting,
    Connected,
    Disconnecting,
    Reconnecting,
    Error,
}

impl ConnectionState {
    /// Whether the tunnel is up or on its way up.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Preparing | Self::Connecting | Self::Connected | Self::Reconnecting)
    }
}

/// Service containers that can be installed on a managed server.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum DockerContainer {
    #[default]
    None,
    OpenVpn,
    ShadowSocks,
    Cloak,
    WireGuard,
    Ipsec,
    Dns,
    Sftp,
    TorWebSite,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum TransportProto {
    #[default]
    Udp,
    Tcp,
}

/// Protocols a container can speak.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum Proto {
    #[default]
    Any,
    OpenVpn,
    ShadowSocks,
    Cloak,
    WireGuard,
    Ikev2,
    L2tp,
    Dns,
    Sftp,
    TorWebSite,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum ServiceType {
    #[default]
    None,
    Vpn,
    Other,
}

/// Pages of the presentation layer's navigation stack.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    AsRefStr, Display, EnumCount, EnumIter, EnumString, VariantNames,
)]
pub enum Page {
    #[default]
    Start,
    NewServer,
    NewServerProtocols,
    Vpn,
    Wizard,
    WizardLow,
    WizardMedium,
    WizardHigh,
    WizardVpnMode,
    ServerConfiguringProgress,
    GeneralSettings,
    AppSettings,
    NetworkSettings,
    ServerSettings,
    ServerContainers,
    ServersList,
    ShareConnection,
    Sites,
    ProtocolSettings,
    ProtocolShare,
    QrDecoder,
    QrDecoderIos,
    About,
    ViewConfig,
}

impl DockerContainer {
    /// Protocols served by this container, in preference order.
    #[must_use]
    pub const fn protocols(self) -> &'static [Proto] {
        match self {
            Self::None => &[],
            Self::OpenVpn => &[Proto::OpenVpn],
            Self::ShadowSocks => &[Proto::OpenVpn, Proto::ShadowSocks],
            Self::Cloak => &[Proto::OpenVpn, Proto::ShadowSocks, Proto::Cloak],
            Self::WireGuard => &[Proto::WireGuard],
            Self::Ipsec => &[Proto::Ikev2, Proto::L2tp],
            Self::Dns => &[Proto::Dns],
            Self::Sftp => &[Proto::Sftp],
            Self::TorWebSite => &[Proto::TorWebSite],
        }
    }

    #[must_use]
    pub const fn service_type(self) -> ServiceType {
        match self {
            Self::None => ServiceType::None,
            Self::OpenVpn | Self::ShadowSocks | Self::Cloak | Self::WireGuard | Self::Ipsec => {
                ServiceType::Vpn
            },
            Self::Dns | Self::Sftp | Self::TorWebSite => ServiceType::Other,
        }
    }
}

impl Proto {
    /// Transport used by default, or `None` for protocols without a choice.
    #[must_use]
    pub const fn default_transport(self) -> Option<TransportProto> {
        match self {
            Self::OpenVpn | Self::ShadowSocks | Self::Cloak | Self::Sftp | Self::TorWebSite => {
                Some(TransportProto::Tcp)
            },
            Self::WireGuard | Self::Ikev2 | Self::L2tp | Self::Dns => Some(TransportProto::Udp),
            Self::Any => None,
        }
    }

    /// Well-known port used when a container is installed with defaults.
    #[must_use]
    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::OpenVpn => Some(1194),
            Self::ShadowSocks => Some(6789),
            Self::Cloak | Self::TorWebSite => Some(443),
            Self::WireGuard => Some(51820),
            Self::Ikev2 => Some(500),
            Self::L2tp => Some(1701),
            Self::Dns => Some(53),
            Self::Sftp => Some(222),
            Self::Any => None,
        }
    }
}
