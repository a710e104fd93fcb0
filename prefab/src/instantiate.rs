//! Construction without running user code.
//!
//! This is the only place that creates records by allocating a zero-valued
//! instance of a layout and writing fields directly. Constructors registered in
//! the catalog are never called here: the type may only have constructors that
//! take arguments, may be abstract, or may fail on purpose.

use crate::catalog::{ClassKind, FieldDecl, TypeCatalog};
use crate::colors::Primitive;
use crate::descriptor::TypeDescriptor;
use crate::error::{PrefabError, Result};
use crate::value::{Instance, Object, Record, Value};

/// A zero-valued instance whose fields can still be written
#[derive(Debug, Clone)]
pub struct Blank {
    descriptor: TypeDescriptor,
    fields: Vec<(String, Value)>,
}

/// Allocate storage for `descriptor` with every field zeroed.
///
/// Fails when the catalog has no layout for the type, when the layout has no
/// storage (interfaces), or for enumerations, whose instances are interned
/// constants rather than allocations.
pub fn allocate(catalog: &dyn TypeCatalog, descriptor: &TypeDescriptor) -> Result<Blank> {
    let layout = catalog.layout(descriptor.identity()).ok_or_else(|| {
        PrefabError::cannot_synthesize(
            descriptor.to_string(),
            "no layout is registered for this type",
        )
    })?;
    match layout.kind() {
        ClassKind::Interface => {
            return Err(PrefabError::cannot_synthesize(
                descriptor.to_string(),
                "interface has no storage layout",
            ));
        }
        ClassKind::Enum(_) => {
            return Err(PrefabError::cannot_synthesize(
                descriptor.to_string(),
                "enum constants cannot be allocated",
            ));
        }
        ClassKind::Class | ClassKind::Abstract => {}
    }

    let fields = catalog.fields(descriptor)?;
    Ok(Blank::zeroed(descriptor.clone(), &fields))
}

impl Blank {
    fn zeroed(descriptor: TypeDescriptor, fields: &[FieldDecl]) -> Self {
        let fields = fields
            .iter()
            .map(|field| {
                let zero = Primitive::from_identity(field.ty.identity())
                    .map(Primitive::zero)
                    .unwrap_or(Value::Null);
                (field.name.clone(), zero)
            })
            .collect();
        Self { descriptor, fields }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Write a field directly. A name declared on both a superclass and a
    /// subclass addresses the subclass slot.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = self
            .fields
            .iter()
            .rposition(|(field, _)| field == name)
            .ok_or_else(|| {
                PrefabError::invalid_argument(format!(
                    "{} has no field {}",
                    self.descriptor, name
                ))
            })?;
        self.fields[index].1 = value;
        Ok(())
    }

    /// Write the slot at `index`, in the order the catalog lists the fields
    pub fn set_slot(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.fields.len();
        let slot = self.fields.get_mut(index).ok_or_else(|| {
            PrefabError::invalid_argument(format!(
                "{} has {} field slots, no slot {}",
                self.descriptor, len, index
            ))
        })?;
        slot.1 = value;
        Ok(())
    }

    /// Read a field directly, preferring the subclass slot for shadowed names
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .rev()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Number of field slots, inherited ones included
    pub fn slot_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Freeze into a shared instance
    pub fn seal(self) -> Instance {
        Instance::new(Object::Record(Record {
            descriptor: self.descriptor,
            fields: self.fields,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassCatalog, ClassLayout};

    fn td(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn test_allocate_zeroes_fields_without_constructing() {
        let mut catalog = ClassCatalog::new();
        catalog
            .register(
                ClassLayout::class("Account")
                    .field("balance", "i64")
                    .field("owner", "String")
                    .constructor(|_| panic!("constructor must not run")),
            )
            .unwrap();

        let blank = allocate(&catalog, &td("Account")).unwrap();
        assert_eq!(blank.get("balance"), Some(&Value::I64(0)));
        assert_eq!(blank.get("owner"), Some(&Value::Null));
        assert_eq!(blank.field_names().collect::<Vec<_>>(), vec!["balance", "owner"]);
    }

    #[test]
    fn test_set_and_seal() {
        let mut catalog = ClassCatalog::new();
        catalog
            .register(ClassLayout::class("Point").field("x", "i32"))
            .unwrap();

        let mut blank = allocate(&catalog, &td("Point")).unwrap();
        blank.set("x", Value::I32(5)).unwrap();
        assert!(blank.set("y", Value::I32(1)).is_err());

        let instance = blank.seal();
        assert_eq!(instance.field("x"), Some(&Value::I32(5)));
    }

    #[test]
    fn test_shadowed_fields_keep_separate_slots() {
        let mut catalog = ClassCatalog::new();
        catalog
            .register(ClassLayout::class("Base").field("x", "i32"))
            .unwrap();
        catalog
            .register(ClassLayout::class("Derived").extends("Base").field("x", "String"))
            .unwrap();

        let mut blank = allocate(&catalog, &td("Derived")).unwrap();
        assert_eq!(blank.slot_count(), 2);
        assert_eq!(blank.get("x"), Some(&Value::Null));

        blank.set_slot(0, Value::I32(3)).unwrap();
        blank.set("x", Value::text("own")).unwrap();
        assert!(blank.set_slot(2, Value::I32(1)).is_err());

        let instance = blank.seal();
        let record = instance.as_record().unwrap();
        assert_eq!(record.fields[0].1, Value::I32(3));
        assert_eq!(instance.field("x").and_then(Value::as_text), Some("own"));
    }

    #[test]
    fn test_allocate_rejects_layouts_without_storage() {
        let mut catalog = ClassCatalog::new();
        catalog.register(ClassLayout::interface("Shape")).unwrap();
        catalog
            .register(ClassLayout::enumeration("Suit", ["Hearts"]))
            .unwrap();

        for identity in ["Shape", "Suit", "Unknown"] {
            assert!(matches!(
                allocate(&catalog, &td(identity)),
                Err(PrefabError::CannotSynthesizeValue { .. })
            ));
        }
    }
}
