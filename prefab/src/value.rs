//! Dynamic runtime values produced by synthesis.
//!
//! Primitive kinds are stored inline. Everything else lives behind an
//! [`Instance`], a shared reference whose pointer identity stands in for object
//! identity: two values can be equal while being distinct references, which is
//! exactly the distinction a red copy has to demonstrate.

use std::fmt;
use std::rc::Rc;

use crate::descriptor::TypeDescriptor;

/// A synthesized value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Ref(Instance),
}

impl Value {
    /// A string value
    pub fn text(text: impl Into<String>) -> Self {
        Value::Ref(Instance::new(Object::Text(text.into())))
    }

    /// An opaque object compared by its label
    pub fn marker(label: impl Into<String>) -> Self {
        Value::Ref(Instance::new(Object::Marker(label.into())))
    }

    /// A single-argument container holding `elements`
    pub fn collection(container: impl Into<String>, ordered: bool, elements: Vec<Value>) -> Self {
        Value::Ref(Instance::new(Object::Collection(Collection {
            container: container.into(),
            ordered,
            elements,
        })))
    }

    /// A map built by inserting `entries` in order
    pub fn map(container: impl Into<String>, entries: Vec<(Value, Value)>) -> Self {
        let mut map = MapObject::new(container);
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Ref(Instance::new(Object::Map(map)))
    }

    /// A record built through the ordinary construction path
    pub fn record(descriptor: TypeDescriptor, fields: Vec<(String, Value)>) -> Self {
        Value::Ref(Instance::new(Object::Record(Record { descriptor, fields })))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Ref(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        self.as_instance().and_then(Instance::text)
    }

    /// Whether both values are the same reference.
    ///
    /// Inline primitives and `Null` have no identity and are never the same
    /// reference as anything.
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Ref(a), Value::Ref(b)) => a.same_reference(b),
            _ => false,
        }
    }

    /// An equal value behind a new reference where the shape allows it
    pub fn duplicate(&self) -> Value {
        match self {
            Value::Ref(instance) => Value::Ref(instance.duplicate()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::I128(a), Value::I128(b)) => a == b,
            (Value::Isize(a), Value::Isize(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::U128(a), Value::U128(b)) => a == b,
            (Value::Usize(a), Value::Usize(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{:?}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::I128(v) => write!(f, "{}", v),
            Value::Isize(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::U128(v) => write!(f, "{}", v),
            Value::Usize(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{:?}", v),
            Value::F64(v) => write!(f, "{:?}", v),
            Value::Ref(instance) => write!(f, "{}", instance),
        }
    }
}

/// Shared reference to an object
#[derive(Debug, Clone)]
pub struct Instance(Rc<Object>);

impl Instance {
    pub fn new(object: Object) -> Self {
        Self(Rc::new(object))
    }

    /// A cycle placeholder for `descriptor`, equal only to itself
    pub fn hollow(descriptor: TypeDescriptor) -> Self {
        Self::new(Object::Hollow(descriptor))
    }

    pub fn object(&self) -> &Object {
        &self.0
    }

    pub fn same_reference(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A new reference holding a shallow copy of this object.
    ///
    /// Enum constants are interned and hollow placeholders only have identity,
    /// so both duplicate to themselves.
    pub fn duplicate(&self) -> Instance {
        match self.object() {
            Object::EnumConstant { .. } | Object::Hollow(_) => self.clone(),
            object => Instance::new(object.clone()),
        }
    }

    pub fn is_hollow(&self) -> bool {
        matches!(self.object(), Object::Hollow(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self.object() {
            Object::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[Value]> {
        match self.object() {
            Object::Collection(collection) => Some(&collection.elements),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self.object() {
            Object::Map(map) => Some(map.entries()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.object() {
            Object::Record(record) => Some(record),
            _ => None,
        }
    }

    /// A record field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.field(name))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        if self.same_reference(other) {
            return true;
        }
        match (self.object(), other.object()) {
            (Object::Hollow(_), _) | (_, Object::Hollow(_)) => false,
            (a, b) => a.structurally_eq(b),
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.object())
    }
}

/// The shapes a referenced value can take
#[derive(Debug, Clone)]
pub enum Object {
    Text(String),
    Marker(String),
    EnumConstant { enumeration: String, name: String },
    Collection(Collection),
    Map(MapObject),
    Record(Record),
    Hollow(TypeDescriptor),
}

impl Object {
    fn structurally_eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Text(a), Object::Text(b)) => a == b,
            (Object::Marker(a), Object::Marker(b)) => a == b,
            (
                Object::EnumConstant {
                    enumeration: e1,
                    name: n1,
                },
                Object::EnumConstant {
                    enumeration: e2,
                    name: n2,
                },
            ) => e1 == e2 && n1 == n2,
            (Object::Collection(a), Object::Collection(b)) => a == b,
            (Object::Map(a), Object::Map(b)) => a == b,
            (Object::Record(a), Object::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Text(text) => write!(f, "{:?}", text),
            Object::Marker(label) => write!(f, "<{}>", label),
            Object::EnumConstant { enumeration, name } => write!(f, "{}::{}", enumeration, name),
            Object::Collection(collection) => {
                write!(f, "[")?;
                write_separated(f, collection.elements.iter())?;
                write!(f, "]")
            }
            Object::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Object::Record(record) => {
                write!(f, "{} {{", record.descriptor)?;
                for (i, (name, value)) in record.fields.iter().enumerate() {
                    write!(f, "{}{}: {}", if i > 0 { ", " } else { " " }, name, value)?;
                }
                write!(f, " }}")
            }
            Object::Hollow(descriptor) => write!(f, "<hollow {}>", descriptor),
        }
    }
}

fn write_separated<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, value) in values.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

/// Elements of a single-argument container
#[derive(Debug, Clone)]
pub struct Collection {
    pub container: String,
    /// Unordered collections compare as multisets
    pub ordered: bool,
    pub elements: Vec<Value>,
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        if self.container != other.container
            || self.ordered != other.ordered
            || self.elements.len() != other.elements.len()
        {
            return false;
        }
        if self.ordered {
            return self.elements == other.elements;
        }

        let mut unmatched: Vec<&Value> = other.elements.iter().collect();
        self.elements.iter().all(|element| {
            match unmatched.iter().position(|candidate| *candidate == element) {
                Some(position) => {
                    unmatched.swap_remove(position);
                    true
                }
                None => false,
            }
        })
    }
}

/// Insertion-ordered map with put-replaces semantics; compares without regard to order
#[derive(Debug, Clone)]
pub struct MapObject {
    container: String,
    entries: Vec<(Value, Value)>,
}

impl MapObject {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            entries: Vec::new(),
        }
    }

    /// Insert an entry, replacing the value of an equal key
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for MapObject {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

/// Named fields of a user type
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub descriptor: TypeDescriptor,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// The field named `name`; a subclass field shadows an inherited one
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .rev()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_equal_but_distinct() {
        let red = Value::collection("Vec", true, vec![Value::I32(1)]);
        let copy = red.duplicate();
        assert_eq!(red, copy);
        assert!(!red.same_reference(&copy));
        assert!(red.same_reference(&red.clone()));
    }

    #[test]
    fn test_primitives_have_no_identity() {
        let one = Value::I32(1);
        assert_eq!(one, Value::I32(1));
        assert!(!one.same_reference(&one));
        assert_ne!(Value::I32(1), Value::I64(1));
    }

    #[test]
    fn test_hollow_compares_by_identity() {
        let descriptor = TypeDescriptor::of("Node").unwrap();
        let a = Instance::hollow(descriptor.clone());
        let b = Instance::hollow(descriptor);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.duplicate().same_reference(&a));
    }

    #[test]
    fn test_unordered_collections_ignore_order() {
        let a = Value::collection("HashSet", false, vec![Value::I32(1), Value::I32(2)]);
        let b = Value::collection("HashSet", false, vec![Value::I32(2), Value::I32(1)]);
        let c = Value::collection("HashSet", false, vec![Value::I32(1), Value::I32(1)]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let ordered = Value::collection("Vec", true, vec![Value::I32(2), Value::I32(1)]);
        let reversed = Value::collection("Vec", true, vec![Value::I32(1), Value::I32(2)]);
        assert_ne!(ordered, reversed);
    }

    #[test]
    fn test_map_insert_replaces_equal_keys() {
        let mut map = MapObject::new("HashMap");
        map.insert(Value::text("one"), Value::I32(1));
        map.insert(Value::text("one"), Value::I32(2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::text("one")), Some(&Value::I32(2)));

        let a = Value::map(
            "HashMap",
            vec![(Value::I32(1), Value::I32(2)), (Value::I32(3), Value::I32(4))],
        );
        let b = Value::map(
            "HashMap",
            vec![(Value::I32(3), Value::I32(4)), (Value::I32(1), Value::I32(2))],
        );
        assert_eq!(a, b);
        assert_ne!(a, Value::map("BTreeMap", vec![(Value::I32(1), Value::I32(2))]));
    }

    #[test]
    fn test_record_equality_is_field_by_field() {
        let point = TypeDescriptor::of("Point").unwrap();
        let a = Value::record(point.clone(), vec![("x".into(), Value::I32(1))]);
        let b = Value::record(point.clone(), vec![("x".into(), Value::I32(1))]);
        let c = Value::record(point, vec![("x".into(), Value::I32(2))]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_instance().unwrap().field("x"), Some(&Value::I32(1)));
    }

    #[test]
    fn test_display() {
        let point = TypeDescriptor::of("Point").unwrap();
        let value = Value::record(
            point,
            vec![
                ("x".into(), Value::I32(1)),
                (
                    "tags".into(),
                    Value::map("HashMap", vec![(Value::text("one"), Value::I32(2))]),
                ),
            ],
        );
        assert_eq!(value.to_string(), r#"Point { x: 1, tags: {"one": 2} }"#);
        assert_eq!(
            Value::collection("Vec", true, vec![Value::Char('a')]).to_string(),
            "['a']"
        );
    }
}
