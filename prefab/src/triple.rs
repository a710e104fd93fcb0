//! The red/black/red-copy triple.

use std::fmt;

use crate::descriptor::TypeDescriptor;
use crate::value::{Instance, Value};

/// Three values of one type: `red` and `black` differ, `red_copy` equals `red`
/// but is a different reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTriple {
    pub red: Value,
    pub black: Value,
    pub red_copy: Value,
}

impl ValueTriple {
    pub fn new(red: Value, black: Value, red_copy: Value) -> Self {
        Self {
            red,
            black,
            red_copy,
        }
    }

    /// Placeholder triple for a type whose resolution is already in flight.
    ///
    /// Red and black are distinct markers. The copy shares the red marker,
    /// since hollow values are equal only to themselves.
    pub fn hollow(descriptor: &TypeDescriptor) -> Self {
        let red = Value::Ref(Instance::hollow(descriptor.clone()));
        let black = Value::Ref(Instance::hollow(descriptor.clone()));
        Self {
            red_copy: red.clone(),
            red,
            black,
        }
    }

    /// Apply `f` to each color
    pub fn map(&self, mut f: impl FnMut(&Value) -> Value) -> ValueTriple {
        ValueTriple {
            red: f(&self.red),
            black: f(&self.black),
            red_copy: f(&self.red_copy),
        }
    }

    /// Whether the triple upholds the color invariants
    pub fn is_well_formed(&self) -> bool {
        self.red != self.black
            && self.red_copy == self.red
            && !self.red_copy.same_reference(&self.red)
    }
}

impl fmt::Display for ValueTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "red: {}, black: {}, red copy: {}",
            self.red, self.black, self.red_copy
        )
    }
}
