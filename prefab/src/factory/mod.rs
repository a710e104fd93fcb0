//! The factory family.
//!
//! Every registered factory is one variant of the closed [`Factory`] enum; the
//! registry picks the variant by type identity and the resolver dispatches on
//! it. [`FallbackFactory`] is not registrable: the resolver owns it and uses it
//! when no variant is registered or a variant declines the shape.

mod collection;
mod constant;
mod defaults;
mod fallback;
mod generic;
mod map;

use std::fmt;
use std::rc::Rc;

pub use collection::{CollectionBuilder, CollectionFactory, CopyFactory};
pub use constant::ConstantFactory;
pub use defaults::standard_factories;
pub use fallback::FallbackFactory;
pub use generic::{GenericConstructor, GenericFactory};
pub use map::MapFactory;

use crate::descriptor::TypeDescriptor;
use crate::error::{PrefabError, Result};
use crate::guard::GuardStack;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::Value;

/// A registered value factory
#[derive(Clone)]
pub enum Factory {
    /// Three fixed values
    Constant(ConstantFactory),
    /// Single-argument container built from its element's colors
    Collection(CollectionFactory),
    /// A type wrapping another container, built through an entry point
    Copy(CopyFactory),
    /// Two-argument map-like container
    Map(MapFactory),
    /// Caller-supplied constructor over the resolved type arguments
    Generic(GenericFactory),
}

impl Factory {
    /// Produce the triple for `descriptor`. `guard` already contains `descriptor`.
    pub fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        match self {
            Factory::Constant(factory) => Ok(factory.create_values()),
            Factory::Collection(factory) => factory.create_values(descriptor, resolver, guard),
            Factory::Copy(factory) => factory.create_values(descriptor, resolver, guard),
            Factory::Map(factory) => factory.create_values(descriptor, resolver, guard),
            Factory::Generic(factory) => factory.create_values(descriptor, resolver, guard),
        }
    }

    /// A constant factory. The caller guarantees the triple is well formed.
    pub fn values(red: Value, black: Value, red_copy: Value) -> Self {
        Factory::Constant(ConstantFactory::new(ValueTriple::new(red, black, red_copy)))
    }

    /// A constant factory whose red copy is derived from `red`
    pub fn examples(red: Value, black: Value) -> Self {
        Factory::Constant(ConstantFactory::from_examples(red, black))
    }

    pub fn ordered_collection() -> Self {
        Factory::Collection(CollectionFactory::ordered())
    }

    pub fn unordered_collection() -> Self {
        Factory::Collection(CollectionFactory::unordered())
    }

    pub fn map() -> Self {
        Factory::Map(MapFactory)
    }

    /// A factory for a type that wraps `underlying` with the same type arguments
    pub fn copy(
        underlying: impl Into<String>,
        entry_point: impl Fn(Value) -> Value + 'static,
    ) -> Self {
        Factory::Copy(CopyFactory::new(underlying, entry_point))
    }

    pub fn generic(constructor: GenericConstructor) -> Self {
        Factory::Generic(GenericFactory::new(constructor))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Factory::Constant(_) => "constant",
            Factory::Collection(_) => "collection",
            Factory::Copy(_) => "copy",
            Factory::Map(_) => "map",
            Factory::Generic(_) => "generic",
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Constant(factory) => f.debug_tuple("Constant").field(factory).finish(),
            Factory::Copy(factory) => f.debug_tuple("Copy").field(factory).finish(),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Decline descriptors carrying more type arguments than the factory understands
pub(crate) fn check_arity(descriptor: &TypeDescriptor, arity: usize) -> Result<()> {
    let given = descriptor.arguments().len();
    if given > arity {
        return Err(PrefabError::unsupported(
            descriptor.to_string(),
            format!("expected at most {} type arguments, got {}", arity, given),
        ));
    }
    Ok(())
}

/// Resolve the type argument at `index`, defaulting to `Object` for raw descriptors
pub(crate) fn resolve_argument(
    index: usize,
    descriptor: &TypeDescriptor,
    resolver: &mut ValueResolver,
    guard: &GuardStack,
) -> Result<Rc<ValueTriple>> {
    let argument = descriptor.argument_or_object(index);
    resolver.resolve_with(&argument, guard)
}
