//! Facade crate for the Aegis client features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] once during bootstrap to build the singleton service handles.
//! - Hand the returned [`Services`] to the type registry; it takes ownership.

pub use aegis_domain as domain;
pub use aegis_event_bus as events;
pub use aegis_kernel as kernel;

use aegis_domain::platform::PlatformFamily;
use aegis_kernel::registry::{RegistryError, TypeRegistry};

/// Feature registry for runtime introspection.
pub mod features {
    pub use aegis_configurator as configurator;
    pub use aegis_containers as containers;
    pub use aegis_protocols as protocols;

    /// Feature slices compiled into this build.
    pub const ENABLED: &[&str] = &["configurator", "containers", "protocols"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Singleton service handles exposed to the presentation layer.
#[derive(Debug, Clone)]
pub struct Services {
    pub containers: features::containers::ContainerProps,
    pub protocols: features::protocols::ProtocolProps,
}

impl Services {
    /// Moves both handles into `registry`.
    ///
    /// `ContainerProps` goes first so teardown, which runs newest first,
    /// releases `ProtocolProps` before it.
    pub fn register(self, registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        registry.register_singleton(self.containers)?;
        registry.register_singleton(self.protocols)
    }
}

/// Builds every singleton service for `platform`.
#[must_use]
pub fn init(platform: PlatformFamily) -> Services {
    Services {
        containers: features::containers::init(platform),
        protocols: features::protocols::init(),
    }
}
