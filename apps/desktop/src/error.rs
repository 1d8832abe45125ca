use std::borrow::Cow;

#[aegis_derive::aegis_error]
pub enum DesktopError {
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: aegis_kernel::config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Settings error{}: {source}", format_context(.context))]
    Settings { source: aegis_kernel::settings::SettingsError, context: Option<Cow<'static, str>> },

    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: aegis_kernel::registry::RegistryError, context: Option<Cow<'static, str>> },

    #[error("Permission error{}: {source}", format_context(.context))]
    Permission {
        source: aegis_kernel::security::permissions::PermissionError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Logger error{}: {source}", format_context(.context))]
    Logger { source: aegis_logger::LoggerError, context: Option<Cow<'static, str>> },

    #[error("Event bus error{}: {source}", format_context(.context))]
    Events { source: aegis_event_bus::EventBusError, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Resource parse error{}: {source}", format_context(.context))]
    Resource { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
