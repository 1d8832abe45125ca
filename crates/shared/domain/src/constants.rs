//! Stable names shared between the shell and the presentation layer.

pub const ORGANIZATION_NAME: &str = "Aegis";
pub const APPLICATION_NAME: &str = "AegisVPN";
/// Lowercase identifier used for log file prefixes and IPC endpoints.
pub const APPLICATION_ID: &str = "aegis";

/// Entry resource of the visual tree, relative to the assets directory.
pub const ENTRY_RESOURCE: &str = "ui/main.toml";

/// Name under which the process-wide log sink is exposed.
pub const DEBUG_SINK: &str = "Debug";

pub const CONNECTION_STATE: &str = "ConnectionState";
pub const VPN_CONNECTION_STATE: &str = "VpnConnectionState";
pub const SERVER_CREDENTIALS: &str = "ServerCredentials";
pub const DOCKER_CONTAINER: &str = "DockerContainer";
pub const TRANSPORT_PROTO: &str = "TransportProto";
pub const PROTO: &str = "Proto";
pub const SERVICE_TYPE: &str = "ServiceType";
pub const PAGE: &str = "Page";
pub const PAGE_TYPE: &str = "PageType";
pub const CONTAINER_PROPS: &str = "ContainerProps";
pub const PROTOCOL_PROPS: &str = "ProtocolProps";
