//! Recursion guard for in-flight resolutions.

use std::fmt;

use indexmap::IndexSet;

use crate::descriptor::TypeDescriptor;

/// Ordered set of descriptors being resolved on the current call path.
///
/// Never mutated in place: [`GuardStack::with`] returns an extended clone, so
/// sibling type-argument resolutions each see only their own ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardStack {
    in_flight: IndexSet<TypeDescriptor>,
}

impl GuardStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.in_flight.contains(descriptor)
    }

    /// A copy of this stack with `descriptor` pushed on top
    pub fn with(&self, descriptor: &TypeDescriptor) -> GuardStack {
        let mut in_flight = self.in_flight.clone();
        in_flight.insert(descriptor.clone());
        GuardStack { in_flight }
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Descriptors from outermost to innermost
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.in_flight.iter()
    }
}

impl fmt::Display for GuardStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, descriptor) in self.in_flight.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", descriptor)?;
        }
        Ok(())
    }
}
