//! Recursive value resolution.
//!
//! [`ValueResolver`] answers "give me red, black and a red copy of this type".
//! Resolution is memoized per descriptor for the lifetime of the resolver,
//! short-circuits type cycles with hollow placeholders, and dispatches to the
//! registered factory for the descriptor's identity or to the fallback.
//!
//! One resolver serves one verification run. It is not meant to be shared
//! between threads or runs.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::catalog::{ClassCatalog, TypeCatalog};
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::factory::{FallbackFactory, standard_factories};
use crate::guard::GuardStack;
use crate::registry::FactoryRegistry;
use crate::triple::ValueTriple;
use crate::value::Value;

/// Memoizing resolver from type descriptors to value triples
pub struct ValueResolver {
    registry: FactoryRegistry,
    catalog: Rc<dyn TypeCatalog>,
    fallback: FallbackFactory,
    cache: HashMap<TypeDescriptor, Rc<ValueTriple>>,
    hollows: HashMap<TypeDescriptor, Rc<ValueTriple>>,
}

impl ValueResolver {
    pub fn new(registry: FactoryRegistry, catalog: impl TypeCatalog + 'static) -> Self {
        Self::with_shared_catalog(registry, Rc::new(catalog))
    }

    pub fn with_shared_catalog(registry: FactoryRegistry, catalog: Rc<dyn TypeCatalog>) -> Self {
        Self {
            registry,
            catalog,
            fallback: FallbackFactory,
            cache: HashMap::new(),
            hollows: HashMap::new(),
        }
    }

    /// A resolver over the standard factories and an empty catalog
    pub fn standard() -> Self {
        Self::new(standard_factories(), ClassCatalog::new())
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> Rc<dyn TypeCatalog> {
        Rc::clone(&self.catalog)
    }

    /// Resolve a top-level request
    pub fn resolve(&mut self, descriptor: &TypeDescriptor) -> Result<Rc<ValueTriple>> {
        self.resolve_with(descriptor, &GuardStack::new())
    }

    /// Resolve `descriptor` on a call path whose in-flight types are `guard`
    pub fn resolve_with(
        &mut self,
        descriptor: &TypeDescriptor,
        guard: &GuardStack,
    ) -> Result<Rc<ValueTriple>> {
        if let Some(triple) = self.cache.get(descriptor) {
            trace!(target: "prefab::resolver", ty = %descriptor, "Cache hit");
            return Ok(Rc::clone(triple));
        }

        if guard.contains(descriptor) {
            debug!(
                target: "prefab::resolver",
                ty = %descriptor,
                path = %guard,
                "Type cycle, using hollow placeholder"
            );
            return Ok(self.hollow(descriptor));
        }

        let guard = guard.with(descriptor);
        let triple = Rc::new(self.create(descriptor, &guard)?);
        self.cache.insert(descriptor.clone(), Rc::clone(&triple));
        Ok(triple)
    }

    fn create(&mut self, descriptor: &TypeDescriptor, guard: &GuardStack) -> Result<ValueTriple> {
        let Some(factory) = self.registry.lookup(descriptor.identity()).cloned() else {
            debug!(target: "prefab::resolver", ty = %descriptor, "No factory, using fallback");
            return self.create_fallback(descriptor, guard);
        };

        trace!(
            target: "prefab::resolver",
            ty = %descriptor,
            factory = factory.kind(),
            "Dispatching to factory"
        );
        match factory.create_values(descriptor, self, guard) {
            Err(err) if err.is_unsupported() => {
                debug!(
                    target: "prefab::resolver",
                    ty = %descriptor,
                    error = %err,
                    "Factory declined, using fallback"
                );
                self.create_fallback(descriptor, guard)
            }
            other => other,
        }
    }

    fn create_fallback(
        &mut self,
        descriptor: &TypeDescriptor,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        let fallback = self.fallback;
        fallback
            .create_values(descriptor, self, guard)
            .map_err(|err| err.into_fatal())
    }

    fn hollow(&mut self, descriptor: &TypeDescriptor) -> Rc<ValueTriple> {
        let triple = self
            .hollows
            .entry(descriptor.clone())
            .or_insert_with(|| Rc::new(ValueTriple::hollow(descriptor)));
        Rc::clone(triple)
    }

    pub fn red(&mut self, descriptor: &TypeDescriptor) -> Result<Value> {
        Ok(self.resolve(descriptor)?.red.clone())
    }

    pub fn black(&mut self, descriptor: &TypeDescriptor) -> Result<Value> {
        Ok(self.resolve(descriptor)?.black.clone())
    }

    pub fn red_copy(&mut self, descriptor: &TypeDescriptor) -> Result<Value> {
        Ok(self.resolve(descriptor)?.red_copy.clone())
    }

    /// Whether `descriptor` has already been resolved
    pub fn is_cached(&self, descriptor: &TypeDescriptor) -> bool {
        self.cache.contains_key(descriptor)
    }

    /// Number of resolved descriptors
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
