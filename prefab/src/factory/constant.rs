use std::rc::Rc;

use crate::triple::ValueTriple;
use crate::value::Value;

/// Returns three pre-built values, ignoring type arguments.
///
/// The values must already satisfy the triple invariants; this factory does not
/// check or repair them.
#[derive(Debug, Clone)]
pub struct ConstantFactory {
    triple: Rc<ValueTriple>,
}

impl ConstantFactory {
    pub fn new(triple: ValueTriple) -> Self {
        Self {
            triple: Rc::new(triple),
        }
    }

    /// Build from a red and a black example; the red copy is a duplicate of red
    pub fn from_examples(red: Value, black: Value) -> Self {
        let red_copy = red.duplicate();
        Self::new(ValueTriple::new(red, black, red_copy))
    }

    pub fn triple(&self) -> &ValueTriple {
        &self.triple
    }

    pub(crate) fn create_values(&self) -> ValueTriple {
        ValueTriple::clone(&self.triple)
    }
}
