use aegis_kernel::domain::registry::{RecordDescriptor, Singleton, TeardownStep};
use aegis_kernel::registry::{RegistryError, TypeRegistry};
use proptest::prelude::*;
use std::any::Any;
use strum_macros::VariantNames;

#[derive(Debug, VariantNames)]
enum Color {
    Red,
    Green,
}

#[derive(Debug, VariantNames)]
enum Shape {
    Circle,
}

#[derive(Debug)]
struct Palette(&'static str);

impl Singleton for Palette {
    fn registry_name(&self) -> &'static str {
        self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn enumerations_resolve_qualified_variants() {
    let mut registry = TypeRegistry::new();
    registry.register_enum::<Color>("Color").unwrap();
    registry.register_alias("Colour", "Color").unwrap();

    assert_eq!(registry.resolve_variant("Color.Green"), Some(1));
    assert_eq!(registry.resolve_variant("Colour.Red"), Some(0));
    assert_eq!(registry.resolve_variant("Color.Blue"), None);
    assert_eq!(registry.resolve_variant("Green"), None);
}

#[test]
fn duplicate_names_are_rejected_without_overwriting() {
    let mut registry = TypeRegistry::new();
    registry.register_enum::<Color>("Color").unwrap();

    let err = registry.register_enum::<Shape>("Color").unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { .. }));
    assert_eq!(registry.enumeration("Color").map(|d| d.variants.len()), Some(2));

    registry.register_singleton(Palette("Palette")).unwrap();
    let err = registry.register_singleton(Palette("Palette")).unwrap_err();
    assert_eq!(err.kind(), "Duplicate");
}

#[test]
fn sealed_registry_rejects_registration() {
    let mut registry = TypeRegistry::new();
    registry.register_record(RecordDescriptor { type_name: "Point", fields: &["x", "y"] }).unwrap();
    registry.seal();

    assert!(registry.is_sealed());
    let err = registry.register_enum::<Color>("Color").unwrap_err();
    assert!(matches!(err, RegistryError::Sealed { .. }));
    assert_eq!(registry.record("Point").map(|r| r.fields), Some(&["x", "y"][..]));
}

#[test]
fn aliases_must_target_enumerations() {
    let mut registry = TypeRegistry::new();
    registry.register_singleton(Palette("Palette")).unwrap();

    assert!(matches!(
        registry.register_alias("Alias", "Palette"),
        Err(RegistryError::InvalidAlias { .. })
    ));
    assert!(matches!(
        registry.register_alias("Alias", "Missing"),
        Err(RegistryError::InvalidAlias { .. })
    ));
}

#[test]
fn singletons_downcast_and_release_newest_first() {
    let mut registry = TypeRegistry::new();
    registry.register_singleton(Palette("First")).unwrap();
    registry.register_enum::<Color>("Color").unwrap();
    registry.register_singleton(Palette("Second")).unwrap();
    registry.seal();

    assert_eq!(registry.singleton::<Palette>("First").map(|p| p.0), Some("First"));
    assert!(registry.singleton::<Palette>("Color").is_none());

    let steps = registry.release_singletons();
    assert_eq!(
        steps,
        vec![TeardownStep::ReleaseSingleton("Second"), TeardownStep::ReleaseSingleton("First")]
    );
    assert!(registry.get("First").is_none());
    assert!(registry.enumeration("Color").is_some());
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Color"]);
}

proptest! {
    #[test]
    fn first_registration_wins(names in proptest::collection::vec("[A-Z][a-z]{0,6}", 1..16)) {
        let mut registry = TypeRegistry::new();
        let mut seen = std::collections::HashSet::new();
        for name in names {
            let name: &'static str = Box::leak(name.into_boxed_str());
            let result = registry.register_enum::<Color>(name);
            if seen.insert(name) {
                prop_assert!(result.is_ok());
            } else {
                let rejected = matches!(result, Err(RegistryError::Duplicate { .. }));
                prop_assert!(rejected, "second registration of {} was not rejected", name);
            }
        }
        prop_assert_eq!(registry.len(), seen.len());
    }
}
