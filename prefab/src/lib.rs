#![allow(clippy::result_large_err)]
#![allow(clippy::new_without_default)]

//! # Prefab - Distinct Example Values for Arbitrary Types
//!
//! Prefab synthesizes, for any describable type, three values: a *red* value,
//! a *black* value that is unequal to red, and a *red copy* that is equal to
//! red but is a different reference. Equality-contract checkers use these to
//! populate fields without calling constructors.
//!
//! Types are named by [`TypeDescriptor`]s. Standard types (primitives,
//! `String`, the collections) have registered factories; everything else is
//! built field by field from its [`ClassLayout`] in a [`ClassCatalog`].
//! Resolution is memoized for the lifetime of a [`ValueResolver`], and
//! recursive types terminate with hollow placeholders.
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab::{ClassCatalog, ClassLayout, Configuration};
//!
//! let mut catalog = ClassCatalog::new();
//! catalog
//!     .register(ClassLayout::class("Point").field("x", "i32").field("y", "i32"))
//!     .unwrap();
//!
//! let mut context = Configuration::for_type("Point")
//!     .with_catalog(catalog)
//!     .build()
//!     .unwrap();
//!
//! let triple = context.triple().unwrap();
//! assert_ne!(triple.red, triple.black);
//! assert_eq!(triple.red, triple.red_copy);
//! assert!(!triple.red.same_reference(&triple.red_copy));
//! ```

// Public modules
pub mod catalog;
pub mod colors;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod guard;
pub mod instantiate;
pub mod registry;
pub mod resolver;
pub mod triple;
pub mod value;

// Re-export the main public API
pub use catalog::{ClassCatalog, ClassKind, ClassLayout, Described, FieldDecl, TypeCatalog};
pub use colors::Primitive;
pub use config::{Configuration, VerificationContext};
pub use descriptor::{IntoDescriptor, TypeDescriptor};
pub use error::{PrefabError, Result};
pub use factory::{
    CollectionFactory, ConstantFactory, CopyFactory, Factory, FallbackFactory, GenericConstructor,
    GenericFactory, MapFactory, standard_factories,
};
pub use guard::GuardStack;
pub use registry::FactoryRegistry;
pub use resolver::ValueResolver;
pub use triple::ValueTriple;
pub use value::{Instance, Object, Value};

// Re-export derive macro from separate crate when derive feature is enabled
#[cfg(feature = "derive")]
pub use prefab_derive::Layout;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_integration() {
        let mut resolver = ValueResolver::standard();
        let descriptor: TypeDescriptor = "HashMap<String, i32>".parse().unwrap();

        let triple = resolver.resolve(&descriptor).unwrap();
        assert_eq!(triple.red.to_string(), r#"{"one": 2}"#);
        assert_eq!(triple.black.to_string(), r#"{"two": 2}"#);
        assert!(triple.is_well_formed());
    }

    #[test]
    fn test_error_display() {
        let error = PrefabError::cannot_synthesize("Shape", "interface has no storage");
        assert!(error.to_string().contains("Shape"));
    }
}
