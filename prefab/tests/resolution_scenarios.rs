//! End-to-end resolution scenarios
//!
//! Each test drives a fresh resolver through the public API only: standard
//! containers, maps, constructor-free fallback construction, recursive types
//! and caller-supplied overrides.

use std::cell::Cell;
use std::rc::Rc;

use prefab::{
    ClassCatalog, ClassLayout, Configuration, Factory, GenericConstructor, PrefabError,
    TypeDescriptor, Value, ValueResolver, standard_factories,
};

fn td(s: &str) -> TypeDescriptor {
    s.parse().unwrap()
}

fn catalog(layouts: Vec<ClassLayout>) -> ClassCatalog {
    let mut catalog = ClassCatalog::new();
    for layout in layouts {
        catalog.register(layout).unwrap();
    }
    catalog
}

#[test]
fn test_ordered_sequence_of_integer() {
    let mut resolver = ValueResolver::standard();
    let int = resolver.resolve(&td("i32")).unwrap();
    let triple = resolver.resolve(&td("Vec<i32>")).unwrap();

    let red = triple.red.as_instance().unwrap();
    let black = triple.black.as_instance().unwrap();
    assert_eq!(red.elements().unwrap(), &[int.red.clone()]);
    assert_eq!(black.elements().unwrap(), &[int.black.clone()]);

    assert_eq!(triple.red_copy, triple.red);
    assert!(!triple.red_copy.same_reference(&triple.red));
}

#[test]
fn test_mapping_from_string_to_integer() {
    let mut resolver = ValueResolver::standard();
    let triple = resolver.resolve(&td("HashMap<String, i32>")).unwrap();

    let red = triple.red.as_instance().unwrap().entries().unwrap();
    let black = triple.black.as_instance().unwrap().entries().unwrap();
    assert_eq!(red.len(), 1);
    assert_eq!(red[0].0.as_text(), Some("one"));
    assert_eq!(red[0].1, Value::I32(2));
    assert_eq!(black[0].0.as_text(), Some("two"));
    assert_eq!(black[0].1, Value::I32(2));

    assert_eq!(triple.red_copy, triple.red);
    assert!(!triple.red_copy.same_reference(&triple.red));
}

#[test]
fn test_map_over_single_valued_key_does_not_fail() {
    let mut resolver = ValueResolver::new(
        standard_factories(),
        catalog(vec![ClassLayout::enumeration("Solo", ["Only"])]),
    );

    let triple = resolver.resolve(&td("BTreeMap<Solo, String>")).unwrap();
    let red = triple.red.as_instance().unwrap().entries().unwrap();
    let black = triple.black.as_instance().unwrap().entries().unwrap();
    assert!(red.len() <= 1);
    assert!(black.is_empty());
}

#[test]
fn test_fallback_builds_single_int_field_without_constructor() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut resolver = ValueResolver::new(
        standard_factories(),
        catalog(vec![
            ClassLayout::class("Meter")
                .field("reading", "i32")
                .constructor(move |_| {
                    counter.set(counter.get() + 1);
                    Value::Null
                }),
        ]),
    );

    let triple = resolver.resolve(&td("Meter")).unwrap();
    let red = triple.red.as_instance().unwrap();
    let black = triple.black.as_instance().unwrap();

    assert_ne!(red.field("reading"), black.field("reading"));
    assert!(triple.is_well_formed());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_self_referential_type() {
    let mut resolver = ValueResolver::new(
        standard_factories(),
        catalog(vec![
            ClassLayout::class("LinkedNode")
                .field("payload", "String")
                .field("next", "Option<LinkedNode>")
                .field("parent", "LinkedNode"),
        ]),
    );

    let triple = resolver.resolve(&td("LinkedNode")).unwrap();
    assert!(triple.is_well_formed());

    let again = resolver.resolve(&td("LinkedNode")).unwrap();
    assert!(Rc::ptr_eq(&triple, &again));
}

#[test]
fn test_generic_record_through_inheritance() {
    let mut resolver = ValueResolver::new(
        standard_factories(),
        catalog(vec![
            ClassLayout::abstract_class("Keyed")
                .type_parameters(["K"])
                .field("key", "K"),
            ClassLayout::class("Entry")
                .type_parameters(["K", "V"])
                .extends("Keyed<K>")
                .field("values", "VecDeque<V>"),
        ]),
    );

    let triple = resolver.resolve(&td("Entry<char, f64>")).unwrap();
    let black = triple.black.as_instance().unwrap();
    assert_eq!(black.field("key"), Some(&Value::Char('b')));
    assert_eq!(black.field("values").unwrap().to_string(), "[2.0]");
}

#[test]
fn test_unresolvable_type_reports_its_identity() {
    let mut resolver = ValueResolver::new(
        standard_factories(),
        catalog(vec![
            ClassLayout::interface("Clock"),
            ClassLayout::class("Scheduler").field("clock", "Clock"),
        ]),
    );

    match resolver.resolve(&td("Scheduler")) {
        Err(PrefabError::CannotSynthesizeValue { identity, .. }) => assert_eq!(identity, "Clock"),
        other => panic!("expected CannotSynthesizeValue, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_override_makes_unresolvable_type_resolvable() {
    let mut context = Configuration::for_type("Scheduler")
        .with_catalog(catalog(vec![
            ClassLayout::interface("Clock"),
            ClassLayout::class("Scheduler").field("clock", "Clock"),
        ]))
        .with_prefab_values("Clock", Value::marker("utc"), Value::marker("local"))
        .build()
        .unwrap();

    let triple = context.triple().unwrap();
    assert!(triple.is_well_formed());
    assert_eq!(context.unequal_examples().len(), 2);
}

#[test]
fn test_copy_factory_wraps_underlying_collection() {
    let mut registry = standard_factories();
    registry.register(
        "Stack",
        Factory::copy("Vec", |inner| {
            Value::record(td("Stack"), vec![("items".to_string(), inner)])
        }),
    );
    let mut resolver = ValueResolver::new(registry, ClassCatalog::new());

    let triple = resolver.resolve(&td("Stack<i64>")).unwrap();
    let red = triple.red.as_instance().unwrap();
    assert_eq!(red.field("items").unwrap().to_string(), "[1]");
    assert!(triple.is_well_formed());
}

#[test]
fn test_generic_prefab_values_with_nested_arguments() {
    let mut context = Configuration::for_type("Either<Vec<String>, Option<bool>>")
        .with_generic_prefab_values(
            "Either",
            GenericConstructor::binary(|left, right| {
                Value::record(
                    td("Either"),
                    vec![("left".to_string(), left), ("right".to_string(), right)],
                )
            }),
        )
        .build()
        .unwrap();

    let red = context.red().unwrap();
    let red = red.as_instance().unwrap();
    assert_eq!(red.field("left").unwrap().to_string(), r#"["one"]"#);
    assert_eq!(red.field("right").unwrap().to_string(), "[true]");
}

#[test]
fn test_primitive_override_is_shared_by_fields_and_containers() {
    let mut context = Configuration::for_type("Box1")
        .with_catalog(catalog(vec![
            ClassLayout::class("Box1")
                .field("n", "i32")
                .field("ns", "Vec<i32>"),
        ]))
        .with_prefab_values("i32", Value::I32(7), Value::I32(8))
        .build()
        .unwrap();

    let red = context.red().unwrap();
    assert_eq!(red.to_string(), "Box1 { n: 7, ns: [7] }");
}
