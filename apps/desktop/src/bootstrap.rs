//! Initialization sequencer.
//!
//! Brings subsystems up in dependency order on the event-loop thread. The
//! config store and the core service handle exist before it starts; the
//! presentation host is built from the handle, the registry is sealed before
//! the visual tree loads, and platform adjustments come last.

use crate::arbiter::InstanceListener;
use crate::context::AppContext;
use crate::error::DesktopError;
use crate::event_loop::EventLoop;
use crate::host::{LoadEvent, PresentationHost};
use crate::platform::PlatformShim;
use crate::registry;
use crate::translations::{Translations, detect_locale};
use aegis_configurator::Configurator;
use aegis_domain::constants::{DEBUG_SINK, ENTRY_RESOURCE};
use aegis_domain::instance::{ExitStatus, ProcessRole, StartupFlags};
use aegis_domain::platform::InitialVisibility;
use aegis_event_bus::EventBus;
use aegis_kernel::config::ResolvedPaths;
use aegis_kernel::settings::SettingsStore;
use aegis_logger::DebugSink;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum BootstrapOutcome {
    Running(AppContext),
    Exit(ExitStatus),
}

/// Inputs of the sequencer, all constructed before it runs.
#[derive(Debug)]
pub struct Bootstrap {
    pub flags: StartupFlags,
    pub role: ProcessRole,
    pub paths: ResolvedPaths,
    pub settings: SettingsStore,
    pub configurator: Configurator,
    pub bus: EventBus,
    pub debug_sink: DebugSink,
    pub shim: Box<dyn PlatformShim>,
    pub listener: Option<InstanceListener>,
    /// Overrides locale detection.
    pub locale: Option<String>,
}

impl Bootstrap {
    /// Runs the startup sequence.
    ///
    /// `host_factory` receives a shared handle to the core service.
    ///
    /// # Errors
    /// Registry programming errors and event bus misuse are fatal. A visual
    /// tree that fails to materialize is not an error but an
    /// [`ExitStatus::LOAD_FAILURE`] outcome.
    pub fn run<F>(self, host_factory: F) -> Result<BootstrapOutcome, DesktopError>
    where
        F: FnOnce(Configurator) -> Box<dyn PresentationHost>,
    {
        let Self {
            flags,
            role,
            paths,
            settings,
            configurator,
            bus,
            debug_sink,
            shim,
            listener,
            locale,
        } = self;
        let family = shim.family();
        let mut event_loop = EventLoop::new(&bus)?;
        event_loop.connect_app_state(&bus)?;

        let locale = locale.unwrap_or_else(detect_locale);
        let translations = match Translations::load(&paths.assets_dir, &locale) {
            Ok(translations) => Some(translations),
            Err(err) => {
                debug!(locale, error = %err, "Translations not loaded");
                None
            },
        };

        // 1. Presentation host, built from the core service handle.
        let mut host = host_factory(configurator.clone());
        if let Some(translations) = translations {
            host.install_translations(translations);
        }

        // 2. Load failure observer.
        let entry = paths.assets_dir.join(ENTRY_RESOURCE);
        let load_failed = Rc::new(Cell::new(false));
        {
            let load_failed = Rc::clone(&load_failed);
            let expected = entry.clone();
            host.observe_load(Box::new(move |event: &LoadEvent| {
                if event.root.is_none() && event.entry == expected {
                    load_failed.set(true);
                }
            }));
        }

        // 3. Debug sink.
        host.expose(DEBUG_SINK, debug_sink.clone());

        // 4. Registry, sealed before anything is loaded.
        let registry = registry::populate(aegis::init(family))?;

        let mut ctx = AppContext {
            flags,
            role,
            settings,
            configurator,
            bus,
            debug_sink,
            shim,
            listener,
            host: None,
            registry,
            event_loop: None,
            torn_down: false,
        };

        if let Err(err) = ctx.shim.before_load() {
            warn!(error = %err, "Platform pre-load hook failed");
        }

        // 5. Visual tree.
        let roots = host.load(&entry, &ctx.registry);
        ctx.host = Some(host);
        if load_failed.get() {
            error!(entry = %entry.display(), "Failed to create the visual tree");
            ctx.teardown();
            return Ok(BootstrapOutcome::Exit(ExitStatus::LOAD_FAILURE));
        }

        let Some(host) = ctx.host.as_mut() else {
            return Err(DesktopError::from("presentation host missing after load"));
        };

        // 6. Root binding.
        if let Some(root) = roots.into_iter().next() {
            host.bind_root(root);
        }

        // 7. Disk logging.
        if ctx.settings.is_save_logs_enabled()
            && let Err(err) = ctx.debug_sink.set_saving_logs(true)
        {
            warn!(error = %err, "Initialization of debug subsystem failed");
        }

        // 8. Initial visibility.
        match ctx.shim.visibility_policy().decide(ctx.flags.autostart) {
            InitialVisibility::ShowOnStartup => host.show_on_startup(ctx.settings.is_start_minimized()),
            InitialVisibility::Show => host.show(),
        }

        // 9. Activation requests raise the window.
        if ctx.role.is_primary() && !family.is_mobile() {
            event_loop.connect_activations(&ctx.bus)?;
        }

        // 10. Platform adjustments.
        if let Err(err) = ctx.shim.apply(&ctx.settings, &paths.config_root) {
            warn!(error = %err, platform = %family, "Platform adjustments failed");
        }

        ctx.event_loop = Some(event_loop);
        info!(platform = %family, role = ?ctx.role, "Bootstrap complete");
        Ok(BootstrapOutcome::Running(ctx))
    }
}
