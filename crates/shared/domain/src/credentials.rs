use serde::{Deserialize, Serialize};

/// Credentials for a server the user manages through the client.
///
/// Published to the presentation layer as a record shape; the field names
/// below are what the UI binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerCredentials {
    pub host_name: String,
    pub user_name: String,
    pub password: String,
    pub port: u16,
}

impl ServerCredentials {
    /// Field names as seen by the presentation layer, in declaration order.
    pub const FIELD_NAMES: &'static [&'static str] = &["hostName", "userName", "password", "port"];

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.host_name.is_empty()
            && !self.user_name.is_empty()
            && !self.password.is_empty()
            && self.port > 0
    }
}
