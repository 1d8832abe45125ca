//! Shapes published to the presentation layer's name lookup table.
//!
//! The table itself lives in the kernel; this module only defines what can
//! be stored in it.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use strum::VariantNames;

/// A long-lived service handle owned by the registry.
pub trait Singleton: Any + Debug + Send + Sync {
    /// Name the presentation layer resolves this handle by.
    fn registry_name(&self) -> &'static str;

    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A named enumeration with its variant names in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub type_name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumDescriptor {
    #[must_use]
    pub const fn of<E: VariantNames>(type_name: &'static str) -> Self {
        Self { type_name, variants: E::VARIANTS }
    }

    /// Ordinal of `variant`, as the presentation layer sees it.
    #[must_use]
    pub fn ordinal(&self, variant: &str) -> Option<usize> {
        self.variants.iter().position(|v| *v == variant)
    }
}

/// A named record shape (value type with named fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub type_name: &'static str,
    pub fields: &'static [&'static str],
}

/// A single entry of the lookup table.
#[derive(Debug, Clone)]
pub enum RegistryEntry {
    Enumeration(EnumDescriptor),
    Record(RecordDescriptor),
    Singleton(Arc<dyn Singleton>),
}

impl RegistryEntry {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Enumeration(_) => "enumeration",
            Self::Record(_) => "record",
            Self::Singleton(_) => "singleton",
        }
    }
}

/// One step of application context teardown, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownStep {
    /// Observers installed on the presentation host are disconnected.
    DetachObservers,
    /// The presentation host is destroyed.
    DropHost,
    /// A registry-owned singleton is released.
    ReleaseSingleton(&'static str),
    /// The event bus is closed.
    CloseEventBus,
}
