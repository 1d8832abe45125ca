#![allow(dead_code)]

use aegis_configurator::Configurator;
use aegis_desktop::host::{LoadEvent, LoadObserver, PresentationHost, RootObject};
use aegis_desktop::platform::PlatformShim;
use aegis_desktop::translations::Translations;
use aegis_desktop::DesktopError;
use aegis_domain::platform::{AppState, Capabilities, PlatformFamily, VisibilityPolicy};
use aegis_kernel::config::ResolvedPaths;
use aegis_kernel::registry::TypeRegistry;
use aegis_kernel::settings::SettingsStore;
use aegis_logger::{DebugSink, Logger};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::LazyLock;

static LOGGER: LazyLock<Logger> =
    LazyLock::new(|| Logger::builder().name("aegis-test").console(false).init().expect("logger"));

pub fn debug_sink(log_dir: &Path) -> DebugSink {
    LOGGER.debug_sink(log_dir)
}

pub const MANIFEST: &str = r#"
requires = ["ConnectionState", "PageType", "ContainerProps", "ProtocolProps", "Debug"]

[[window]]
id = "main"
title = "AegisVPN"
start_page = "Page.Vpn"
"#;

pub fn paths(root: &Path) -> ResolvedPaths {
    ResolvedPaths {
        config_root: root.join("config"),
        log_dir: root.join("log"),
        runtime_dir: root.join("run"),
        assets_dir: root.join("assets"),
    }
}

pub fn write_manifest(paths: &ResolvedPaths, contents: &str) {
    let ui = paths.assets_dir.join("ui");
    std::fs::create_dir_all(&ui).expect("assets dir");
    std::fs::write(ui.join("main.toml"), contents).expect("manifest");
}

pub fn settings(paths: &ResolvedPaths) -> SettingsStore {
    SettingsStore::open(paths.settings_file()).expect("settings")
}

/// Host and shim calls in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InstallTranslations(String),
    ObserveLoad,
    Expose(&'static str),
    BeforeLoad,
    Load,
    BindRoot(String),
    Show,
    Raise,
    ShowOnStartup(bool),
    DetachObservers,
    Apply,
    AppState(AppState),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Host that materializes a fixed set of roots and records every call.
pub struct RecordingHost {
    pub log: CallLog,
    pub roots: Vec<RootObject>,
    pub configurator: Configurator,
    observers: Vec<LoadObserver>,
}

impl RecordingHost {
    pub fn new(log: CallLog, roots: Vec<RootObject>, configurator: Configurator) -> Self {
        Self { log, roots, configurator, observers: Vec::new() }
    }
}

impl std::fmt::Debug for RecordingHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHost").field("roots", &self.roots).finish_non_exhaustive()
    }
}

impl PresentationHost for RecordingHost {
    fn install_translations(&mut self, translations: Translations) {
        self.log.borrow_mut().push(Call::InstallTranslations(translations.locale().to_owned()));
    }

    fn observe_load(&mut self, observer: LoadObserver) {
        self.log.borrow_mut().push(Call::ObserveLoad);
        self.observers.push(observer);
    }

    fn expose(&mut self, name: &'static str, _sink: DebugSink) {
        self.log.borrow_mut().push(Call::Expose(name));
    }

    fn load(&mut self, entry: &Path, registry: &TypeRegistry) -> Vec<RootObject> {
        assert!(registry.is_sealed(), "registry must be sealed before load");
        self.log.borrow_mut().push(Call::Load);
        let events: Vec<LoadEvent> = if self.roots.is_empty() {
            vec![LoadEvent { entry: entry.to_path_buf(), root: None }]
        } else {
            self.roots
                .iter()
                .map(|root| LoadEvent { entry: entry.to_path_buf(), root: Some(root.clone()) })
                .collect()
        };
        for event in &events {
            for observer in &mut self.observers {
                observer(event);
            }
        }
        self.roots.clone()
    }

    fn bind_root(&mut self, root: RootObject) {
        self.log.borrow_mut().push(Call::BindRoot(root.id));
    }

    fn show(&mut self) {
        self.log.borrow_mut().push(Call::Show);
    }

    fn raise(&mut self) {
        self.log.borrow_mut().push(Call::Raise);
    }

    fn show_on_startup(&mut self, start_minimized: bool) {
        self.log.borrow_mut().push(Call::ShowOnStartup(start_minimized));
    }

    fn detach_observers(&mut self) {
        self.log.borrow_mut().push(Call::DetachObservers);
        self.observers.clear();
    }
}

/// Shim with a configurable family that records its hooks.
#[derive(Debug)]
pub struct RecordingShim {
    pub family: PlatformFamily,
    pub log: CallLog,
}

impl PlatformShim for RecordingShim {
    fn family(&self) -> PlatformFamily {
        self.family
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn visibility_policy(&self) -> VisibilityPolicy {
        if self.family == PlatformFamily::Windows {
            VisibilityPolicy::FollowAutostartFlag
        } else {
            VisibilityPolicy::AlwaysShowOnStartup
        }
    }

    fn before_load(&mut self) -> Result<(), DesktopError> {
        self.log.borrow_mut().push(Call::BeforeLoad);
        Ok(())
    }

    fn apply(&mut self, _settings: &SettingsStore, _config_root: &Path) -> Result<(), DesktopError> {
        self.log.borrow_mut().push(Call::Apply);
        Ok(())
    }

    fn on_app_state(&mut self, state: AppState) {
        self.log.borrow_mut().push(Call::AppState(state));
    }
}

pub fn main_window() -> RootObject {
    RootObject { id: "main".to_owned(), title: "AegisVPN".to_owned() }
}
