//! Write-once lookup table of names the presentation layer can reference.
//!
//! Population happens once during bootstrap, before the visual tree loads;
//! afterwards the table is sealed. Names are never overwritten.

use aegis_domain::registry::{
    EnumDescriptor, RecordDescriptor, RegistryEntry, Singleton, TeardownStep,
};
use fxhash::FxHashMap;
use std::borrow::Cow;
use std::sync::Arc;
use strum::VariantNames;
use tracing::{debug, trace};

#[aegis_derive::aegis_error]
pub enum RegistryError {
    /// The name is already taken; the existing entry is kept.
    #[error("Duplicate registration{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The registry no longer accepts registrations.
    #[error("Registry sealed{}: {message}", format_context(.context))]
    Sealed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An alias points at a name that is missing or not an enumeration.
    #[error("Invalid alias target{}: {message}", format_context(.context))]
    InvalidAlias { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Name lookup table owned by the application context.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: FxHashMap<&'static str, RegistryEntry>,
    order: Vec<&'static str>,
    sealed: bool,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an enumeration under `name`, exposing its variant names.
    pub fn register_enum<E: VariantNames>(&mut self, name: &'static str) -> Result<(), RegistryError> {
        self.insert(name, RegistryEntry::Enumeration(EnumDescriptor::of::<E>(name)))
    }

    /// Registers a record shape under its own type name.
    pub fn register_record(&mut self, record: RecordDescriptor) -> Result<(), RegistryError> {
        self.insert(record.type_name, RegistryEntry::Record(record))
    }

    /// Makes an already registered enumeration reachable under `alias` too.
    pub fn register_alias(
        &mut self,
        alias: &'static str,
        target: &'static str,
    ) -> Result<(), RegistryError> {
        let Some(RegistryEntry::Enumeration(descriptor)) = self.entries.get(target) else {
            return Err(RegistryError::InvalidAlias {
                message: format!("{alias} -> {target}").into(),
                context: Some("Aliases must point at a registered enumeration".into()),
            });
        };
        let descriptor = *descriptor;
        self.insert(alias, RegistryEntry::Enumeration(descriptor))
    }

    /// Transfers ownership of a singleton service handle to the registry.
    pub fn register_singleton<S: Singleton>(&mut self, service: S) -> Result<(), RegistryError> {
        let name = service.registry_name();
        self.insert(name, RegistryEntry::Singleton(Arc::new(service)))
    }

    /// Freezes the table; further registrations fail with [`RegistryError::Sealed`].
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!(entries = self.order.len(), "Type registry sealed");
        }
        self.sealed = true;
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<EnumDescriptor> {
        match self.entries.get(name)? {
            RegistryEntry::Enumeration(descriptor) => Some(*descriptor),
            _ => None,
        }
    }

    /// Resolves `Name.Variant` to the variant's ordinal.
    #[must_use]
    pub fn resolve_variant(&self, qualified: &str) -> Option<usize> {
        let (name, variant) = qualified.split_once('.')?;
        self.enumeration(name)?.ordinal(variant)
    }

    #[must_use]
    pub fn record(&self, name: &str) -> Option<RecordDescriptor> {
        match self.entries.get(name)? {
            RegistryEntry::Record(record) => Some(*record),
            _ => None,
        }
    }

    /// Borrows a registered singleton as its concrete type.
    #[must_use]
    pub fn singleton<S: Singleton>(&self, name: &str) -> Option<&S> {
        match self.entries.get(name)? {
            RegistryEntry::Singleton(service) => service.as_any().downcast_ref::<S>(),
            _ => None,
        }
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drops every singleton, newest first, and reports each release.
    ///
    /// Enumerations and records stay resolvable.
    pub fn release_singletons(&mut self) -> Vec<TeardownStep> {
        let singletons: Vec<&'static str> = self
            .order
            .iter()
            .rev()
            .copied()
            .filter(|name| matches!(self.entries.get(name), Some(RegistryEntry::Singleton(_))))
            .collect();

        singletons
            .into_iter()
            .map(|name| {
                self.entries.remove(name);
                self.order.retain(|n| *n != name);
                trace!(name, "Singleton released");
                TeardownStep::ReleaseSingleton(name)
            })
            .collect()
    }

    fn insert(&mut self, name: &'static str, entry: RegistryEntry) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed { message: name.into(), context: None });
        }
        if let Some(existing) = self.entries.get(name) {
            return Err(RegistryError::Duplicate {
                message: name.into(),
                context: Some(format!("already registered as {}", existing.kind()).into()),
            });
        }

        trace!(name, kind = entry.kind(), "Registering type");
        self.entries.insert(name, entry);
        self.order.push(name);
        Ok(())
    }
}
