use std::fmt;
use std::rc::Rc;

use super::{check_arity, resolve_argument};
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::guard::GuardStack;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::Value;

/// Construction entry point for a container: given the container's descriptor
/// and its elements, build a new container instance.
pub type CollectionBuilder = Rc<dyn Fn(&TypeDescriptor, Vec<Value>) -> Value>;

/// Factory for single-argument containers.
///
/// Red holds the element type's red value, black its black value, and the red
/// copy is a second container built from the same red element.
#[derive(Clone)]
pub struct CollectionFactory {
    builder: CollectionBuilder,
}

impl CollectionFactory {
    pub fn new(builder: impl Fn(&TypeDescriptor, Vec<Value>) -> Value + 'static) -> Self {
        Self {
            builder: Rc::new(builder),
        }
    }

    /// Containers that compare element by element, in order
    pub fn ordered() -> Self {
        Self::new(|descriptor, elements| {
            Value::collection(descriptor.identity(), true, elements)
        })
    }

    /// Containers that compare as multisets
    pub fn unordered() -> Self {
        Self::new(|descriptor, elements| {
            Value::collection(descriptor.identity(), false, elements)
        })
    }

    pub(crate) fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        check_arity(descriptor, 1)?;
        let element = resolve_argument(0, descriptor, resolver, guard)?;

        Ok(ValueTriple::new(
            (self.builder)(descriptor, vec![element.red.clone()]),
            (self.builder)(descriptor, vec![element.black.clone()]),
            (self.builder)(descriptor, vec![element.red.clone()]),
        ))
    }
}

/// Factory for a type that wraps another container.
///
/// The underlying container is resolved with the same type arguments as the
/// requested type, and each of its colors is passed through the entry point.
#[derive(Clone)]
pub struct CopyFactory {
    underlying: String,
    entry_point: Rc<dyn Fn(Value) -> Value>,
}

impl CopyFactory {
    pub fn new(underlying: impl Into<String>, entry_point: impl Fn(Value) -> Value + 'static) -> Self {
        Self {
            underlying: underlying.into(),
            entry_point: Rc::new(entry_point),
        }
    }

    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    pub(crate) fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        let source = descriptor.rename(self.underlying.as_str())?;
        let triple = resolver.resolve_with(&source, guard)?;
        Ok(triple.map(|value| (self.entry_point)(value.clone())))
    }
}

impl fmt::Debug for CopyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyFactory")
            .field("underlying", &self.underlying)
            .finish_non_exhaustive()
    }
}
