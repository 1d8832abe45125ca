//! Explicitly owned process-wide state.

use crate::arbiter::InstanceListener;
use crate::event_loop::{EventLoop, LoopHandler};
use crate::host::PresentationHost;
use crate::platform::PlatformShim;
use aegis_configurator::Configurator;
use aegis_domain::instance::{ExitStatus, ProcessRole, StartupFlags};
use aegis_domain::platform::AppState;
use aegis_domain::registry::TeardownStep;
use aegis_event_bus::EventBus;
use aegis_kernel::registry::TypeRegistry;
use aegis_kernel::settings::SettingsStore;
use aegis_logger::DebugSink;
use tracing::{debug, info};

/// Everything the running shell owns. Torn down in reverse construction
/// order, either explicitly through [`AppContext::teardown`] or on drop.
#[derive(Debug)]
pub struct AppContext {
    pub(crate) flags: StartupFlags,
    pub(crate) role: ProcessRole,
    pub(crate) settings: SettingsStore,
    pub(crate) configurator: Configurator,
    pub(crate) bus: EventBus,
    pub(crate) debug_sink: DebugSink,
    pub(crate) shim: Box<dyn PlatformShim>,
    pub(crate) listener: Option<InstanceListener>,
    pub(crate) host: Option<Box<dyn PresentationHost>>,
    pub(crate) registry: TypeRegistry,
    pub(crate) event_loop: Option<EventLoop>,
    pub(crate) torn_down: bool,
}

impl AppContext {
    #[must_use]
    pub const fn flags(&self) -> StartupFlags {
        self.flags
    }

    #[must_use]
    pub const fn role(&self) -> ProcessRole {
        self.role
    }

    #[must_use]
    pub const fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    #[must_use]
    pub const fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub const fn debug_sink(&self) -> &DebugSink {
        &self.debug_sink
    }

    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn shim(&self) -> &dyn PlatformShim {
        self.shim.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> Option<&dyn PresentationHost> {
        self.host.as_deref()
    }

    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    #[must_use]
    pub fn is_activation_connected(&self) -> bool {
        self.event_loop.as_ref().is_some_and(EventLoop::is_activation_connected)
    }

    /// Runs the event loop until quit. Returns immediately if it already ran.
    pub async fn run(&mut self) -> ExitStatus {
        let Some(event_loop) = self.event_loop.take() else {
            return ExitStatus::SUCCESS;
        };
        info!(role = ?self.role, "Entering event loop");
        event_loop.run(self).await
    }

    /// Detaches host observers, drops the host, releases the singletons
    /// newest first, then closes the event bus. Runs once.
    pub fn teardown(&mut self) -> Vec<TeardownStep> {
        if self.torn_down {
            return Vec::new();
        }
        self.torn_down = true;

        let mut steps = Vec::new();
        if let Some(mut host) = self.host.take() {
            host.detach_observers();
            steps.push(TeardownStep::DetachObservers);
            drop(host);
            steps.push(TeardownStep::DropHost);
        }
        steps.extend(self.registry.release_singletons());
        self.listener.take();
        self.event_loop.take();
        let channels = self.bus.shutdown();
        steps.push(TeardownStep::CloseEventBus);

        debug!(?steps, channels, "Application context torn down");
        steps
    }
}

impl LoopHandler for AppContext {
    fn on_activation(&mut self) {
        if let Some(host) = self.host.as_mut() {
            info!("Secondary instance started, showing this window instead");
            host.show();
            host.raise();
        }
    }

    fn on_app_state(&mut self, state: AppState) {
        self.shim.on_app_state(state);
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.teardown();
    }
}
