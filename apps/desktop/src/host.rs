//! Presentation host.
//!
//! The host owns the visual tree. The shell drives it through
//! [`PresentationHost`]; the built-in [`ManifestHost`] materializes its window
//! tree from a TOML manifest and checks every name the manifest needs against
//! the type registry.

use crate::error::{DesktopError, DesktopErrorExt};
use crate::translations::Translations;
use aegis_configurator::Configurator;
use aegis_domain::events::{AppStateChanged, QuitRequested};
use aegis_domain::platform::AppState;
use aegis_event_bus::EventBus;
use aegis_kernel::registry::TypeRegistry;
use aegis_logger::DebugSink;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};
use tracing::{debug, info, warn};

/// A top-level object produced by loading the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootObject {
    pub id: String,
    pub title: String,
}

/// Reported once per load attempt. `root` is `None` when nothing materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub entry: PathBuf,
    pub root: Option<RootObject>,
}

pub type LoadObserver = Box<dyn FnMut(&LoadEvent)>;

/// Window tree shipped inside the binary, used when no assets directory is
/// configured and none is installed next to the executable.
pub const BUNDLED_MANIFEST: &str = include_str!("../assets/ui/main.toml");

pub trait PresentationHost: fmt::Debug {
    fn install_translations(&mut self, translations: Translations);

    /// Registers a callback for load results. Kept until [`Self::detach_observers`].
    fn observe_load(&mut self, observer: LoadObserver);

    /// Makes `sink` reachable from the visual tree under `name`.
    fn expose(&mut self, name: &'static str, sink: DebugSink);

    fn load(&mut self, entry: &Path, registry: &TypeRegistry) -> Vec<RootObject>;

    /// Target of later show/raise calls.
    fn bind_root(&mut self, root: RootObject);

    fn show(&mut self);

    fn raise(&mut self);

    /// Startup presentation: stays hidden when `start_minimized` is set.
    fn show_on_startup(&mut self, start_minimized: bool);

    fn detach_observers(&mut self);
}

#[derive(Debug, Deserialize)]
struct Manifest {
    /// Registry names the tree binds to, either `Name` or `Name.Variant`.
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default, rename = "window")]
    windows: Vec<WindowSpec>,
}

#[derive(Debug, Deserialize)]
struct WindowSpec {
    id: String,
    #[serde(default)]
    title: Option<String>,
    /// Initial page as `Page.<Variant>`.
    #[serde(default)]
    start_page: Option<String>,
}

/// Window state as last driven by the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    pub visible: bool,
    pub raised: u32,
    pub page: Option<usize>,
}

pub struct ManifestHost {
    configurator: Configurator,
    bus: EventBus,
    translations: Option<Translations>,
    observers: Vec<LoadObserver>,
    exposed: BTreeMap<&'static str, DebugSink>,
    root: Option<RootObject>,
    pages: BTreeMap<String, usize>,
    window: WindowState,
    bundled: Option<&'static str>,
}

impl ManifestHost {
    #[must_use]
    pub fn new(configurator: Configurator, bus: EventBus) -> Self {
        Self {
            configurator,
            bus,
            translations: None,
            observers: Vec::new(),
            exposed: BTreeMap::new(),
            root: None,
            pages: BTreeMap::new(),
            window: WindowState::default(),
            bundled: None,
        }
    }

    /// Loads `manifest` instead when the entry resource does not exist.
    #[must_use]
    pub const fn with_bundled_manifest(mut self, manifest: &'static str) -> Self {
        self.bundled = Some(manifest);
        self
    }

    #[must_use]
    pub const fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    #[must_use]
    pub const fn window(&self) -> WindowState {
        self.window
    }

    #[must_use]
    pub const fn root(&self) -> Option<&RootObject> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn exposed(&self, name: &str) -> Option<&DebugSink> {
        self.exposed.get(name)
    }

    /// Ends the event loop, as the window's own quit action does.
    pub fn quit(&self, code: i32) -> Result<(), DesktopError> {
        self.bus.publish_queue(QuitRequested { code })?;
        Ok(())
    }

    fn materialize(&mut self, entry: &Path, registry: &TypeRegistry) -> Result<Vec<RootObject>, DesktopError> {
        let raw = match (fs::read_to_string(entry), self.bundled) {
            (Ok(raw), _) => raw,
            (Err(err), Some(bundled)) if err.kind() == io::ErrorKind::NotFound => {
                debug!(entry = %entry.display(), "Entry resource not installed, using the bundled window tree");
                bundled.to_owned()
            },
            (Err(source), _) => {
                return Err(DesktopError::Io {
                    source,
                    context: Some(format!("Failed to read {}", entry.display()).into()),
                });
            },
        };
        let manifest: Manifest =
            toml::from_str(&raw).context(format!("Failed to parse {}", entry.display()))?;

        for name in &manifest.requires {
            if !self.resolves(name, registry) {
                return Err(DesktopError::Internal {
                    message: format!("unresolved name {name}").into(),
                    context: Some(entry.display().to_string().into()),
                });
            }
        }

        manifest
            .windows
            .into_iter()
            .map(|spec| {
                if let Some(page) = &spec.start_page {
                    let ordinal = registry.resolve_variant(page).ok_or_else(|| DesktopError::Internal {
                        message: format!("unknown start page {page}").into(),
                        context: Some(spec.id.clone().into()),
                    })?;
                    self.pages.insert(spec.id.clone(), ordinal);
                }
                let title = spec.title.unwrap_or_else(|| spec.id.clone());
                let title = self.translations.as_ref().map_or_else(|| title.clone(), |t| t.tr(&title).to_owned());
                Ok(RootObject { id: spec.id, title })
            })
            .collect()
    }

    fn resolves(&self, name: &str, registry: &TypeRegistry) -> bool {
        if name.contains('.') {
            registry.resolve_variant(name).is_some()
        } else {
            registry.contains(name) || self.exposed.contains_key(name)
        }
    }

    fn notify(&mut self, event: &LoadEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

    fn report_state(&self, state: AppState) {
        if let Err(err) = self.bus.publish(AppStateChanged(state)) {
            debug!(error = %err, "Application state not published");
        }
    }
}

impl fmt::Debug for ManifestHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestHost")
            .field("observers", &self.observers.len())
            .field("exposed", &self.exposed.keys().collect::<Vec<_>>())
            .field("root", &self.root)
            .field("window", &self.window)
            .field("bundled", &self.bundled.is_some())
            .finish_non_exhaustive()
    }
}

impl PresentationHost for ManifestHost {
    fn install_translations(&mut self, translations: Translations) {
        debug!(locale = translations.locale(), entries = translations.len(), "Translations installed");
        self.translations = Some(translations);
    }

    fn observe_load(&mut self, observer: LoadObserver) {
        self.observers.push(observer);
    }

    fn expose(&mut self, name: &'static str, sink: DebugSink) {
        self.exposed.insert(name, sink);
    }

    fn load(&mut self, entry: &Path, registry: &TypeRegistry) -> Vec<RootObject> {
        let roots = match self.materialize(entry, registry) {
            Ok(roots) => roots,
            Err(err) => {
                warn!(error = %err, entry = %entry.display(), "Visual tree failed to load");
                Vec::new()
            },
        };

        if roots.is_empty() {
            self.notify(&LoadEvent { entry: entry.to_path_buf(), root: None });
        }
        for root in &roots {
            self.notify(&LoadEvent { entry: entry.to_path_buf(), root: Some(root.clone()) });
        }
        roots
    }

    fn bind_root(&mut self, root: RootObject) {
        self.window.page = self.pages.get(&root.id).copied();
        self.root = Some(root);
    }

    fn show(&mut self) {
        let Some(root) = &self.root else {
            return;
        };
        debug!(window = %root.id, "Showing window");
        self.window.visible = true;
        self.report_state(AppState::Active);
    }

    fn raise(&mut self) {
        if self.root.is_some() {
            self.window.raised += 1;
        }
    }

    fn show_on_startup(&mut self, start_minimized: bool) {
        if start_minimized {
            info!("Starting minimized");
            self.window.visible = false;
            self.report_state(AppState::Hidden);
        } else {
            self.show();
        }
    }

    fn detach_observers(&mut self) {
        self.observers.clear();
    }
}
