use super::PlatformShim;
use super::clipboard::{Clipboard, HTML_MIME, html_to_plain};
use crate::error::DesktopError;
use aegis_domain::platform::{AppState, Capabilities, PlatformFamily};
use tracing::{debug, info};

/// Android: rich clipboard contents are flattened whenever the app comes to
/// the foreground, since text fields paste the raw markup otherwise.
#[derive(Debug)]
pub struct Android {
    clipboard: Box<dyn Clipboard>,
}

impl Android {
    #[must_use]
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self { clipboard }
    }

    #[must_use]
    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    fn sanitize_clipboard(&mut self) {
        if !self.clipboard.formats().iter().any(|f| f == HTML_MIME) {
            return;
        }
        if let Some(html) = self.clipboard.html() {
            self.clipboard.set_text(html_to_plain(&html));
            debug!("Clipboard HTML replaced with plain text");
        }
    }
}

impl PlatformShim for Android {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Android
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CLIPBOARD_SANITIZE
    }

    fn on_app_state(&mut self, state: AppState) {
        if state == AppState::Active {
            self.sanitize_clipboard();
        }
    }
}

/// Brings up the native view controller that hosts the visual tree.
pub type ControllerInit = Box<dyn FnMut() -> Result<(), DesktopError>>;

/// iOS: the native controller must exist before the visual tree loads.
///
/// The embedding application passes its controller bootstrap through
/// [`Ios::with_controller`]. Without one the shim only records that the
/// load may proceed.
#[derive(Default)]
pub struct Ios {
    controller: Option<ControllerInit>,
    controller_ready: bool,
}

impl Ios {
    #[must_use]
    pub fn with_controller(init: impl FnMut() -> Result<(), DesktopError> + 'static) -> Self {
        Self { controller: Some(Box::new(init)), controller_ready: false }
    }

    #[must_use]
    pub const fn is_controller_ready(&self) -> bool {
        self.controller_ready
    }
}

impl std::fmt::Debug for Ios {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ios")
            .field("controller", &self.controller.is_some())
            .field("controller_ready", &self.controller_ready)
            .finish()
    }
}

impl PlatformShim for Ios {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Ios
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NATIVE_CONTROLLER
    }

    fn before_load(&mut self) -> Result<(), DesktopError> {
        if self.controller_ready {
            return Ok(());
        }
        if let Some(init) = self.controller.as_mut() {
            init()?;
        }
        self.controller_ready = true;
        info!("Native controller initialized");
        Ok(())
    }
}
