use std::borrow::Cow;

#[aegis_derive::aegis_error]
pub enum ConfiguratorError {
    #[error("Settings error{}: {source}", format_context(.context))]
    Settings {
        source: aegis_kernel::settings::SettingsError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid server credentials{}: {message}", format_context(.context))]
    InvalidCredentials { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
