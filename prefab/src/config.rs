//! Configuration for a verification run.
//!
//! A [`Configuration`] collects the type under test, its catalog, and any
//! caller-supplied prefab values, then builds a [`VerificationContext`] whose
//! resolver sees the standard factories overlaid with the caller's.

use std::rc::Rc;

use tracing::debug;

use crate::catalog::ClassCatalog;
use crate::descriptor::{IntoDescriptor, TypeDescriptor};
use crate::error::{PrefabError, Result};
use crate::factory::{Factory, GenericConstructor, standard_factories};
use crate::registry::FactoryRegistry;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::Value;

/// Builder for a verification run
#[derive(Debug)]
pub struct Configuration {
    descriptor: Result<TypeDescriptor>,
    catalog: ClassCatalog,
    overrides: FactoryRegistry,
    use_standard_factories: bool,
    unequal_examples: Vec<Value>,
    error: Option<PrefabError>,
}

impl Configuration {
    /// Start configuring a run for the given type
    pub fn for_type(descriptor: impl IntoDescriptor) -> Self {
        Self {
            descriptor: descriptor.into_descriptor(),
            catalog: ClassCatalog::new(),
            overrides: FactoryRegistry::new(),
            use_standard_factories: true,
            unequal_examples: Vec::new(),
            error: None,
        }
    }

    /// Use `catalog` for types resolved without a registered factory
    pub fn with_catalog(mut self, catalog: ClassCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Supply red and black values for a type the resolver cannot build on its own.
    ///
    /// The two values must differ; the red copy is derived from red.
    pub fn with_prefab_values(mut self, identity: &str, red: Value, black: Value) -> Self {
        match validate_prefab_values(identity, &red, &black) {
            Ok(()) => self.overrides.register(identity, Factory::examples(red, black)),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Supply a constructor for a generic type, called once per color with
    /// that color of each type argument
    pub fn with_generic_prefab_values(
        mut self,
        identity: &str,
        constructor: GenericConstructor,
    ) -> Self {
        match validate_identity(identity) {
            Ok(()) => self.overrides.register(identity, Factory::generic(constructor)),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Register an arbitrary factory, replacing any standard one for the identity
    pub fn with_factory(mut self, identity: &str, factory: Factory) -> Self {
        match validate_identity(identity) {
            Ok(()) => self.overrides.register(identity, factory),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Start from an empty registry instead of the standard factories
    pub fn without_standard_factories(mut self) -> Self {
        self.use_standard_factories = false;
        self
    }

    /// Instances of the type under test known to be unequal to each other
    pub fn with_unequal_examples(mut self, examples: impl IntoIterator<Item = Value>) -> Self {
        self.unequal_examples.extend(examples);
        self
    }

    /// Check the configuration without building anything
    pub fn validate(&self) -> Result<()> {
        if let Err(err) = &self.descriptor {
            return Err(err.clone());
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Build the context for this run
    pub fn build(self) -> Result<VerificationContext> {
        self.validate()?;
        let descriptor = self.descriptor?;

        let registry = if self.use_standard_factories {
            standard_factories().merge(&self.overrides)
        } else {
            self.overrides
        };
        let mut resolver = ValueResolver::new(registry, self.catalog);

        let unequal_examples = if self.unequal_examples.is_empty() {
            let triple = resolver.resolve(&descriptor)?;
            vec![triple.red.clone(), triple.black.clone()]
        } else {
            self.unequal_examples
        };

        debug!(
            target: "prefab::resolver",
            ty = %descriptor,
            factories = resolver.registry().len(),
            examples = unequal_examples.len(),
            "Verification context ready"
        );

        Ok(VerificationContext {
            descriptor,
            resolver,
            unequal_examples,
        })
    }

    fn record_error(&mut self, err: PrefabError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

fn validate_identity(identity: &str) -> Result<()> {
    if identity.trim().is_empty() {
        return Err(PrefabError::invalid_argument("type identity must not be empty"));
    }
    Ok(())
}

fn validate_prefab_values(identity: &str, red: &Value, black: &Value) -> Result<()> {
    validate_identity(identity)?;
    if red.is_null() || black.is_null() {
        return Err(PrefabError::invalid_argument(format!(
            "prefab values for {} must not be null",
            identity
        )));
    }
    if red == black {
        return Err(PrefabError::invalid_argument(format!(
            "both values for {} are equal",
            identity
        )));
    }
    Ok(())
}

/// Everything a verification run needs about its type under test
pub struct VerificationContext {
    descriptor: TypeDescriptor,
    resolver: ValueResolver,
    unequal_examples: Vec<Value>,
}

impl VerificationContext {
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn resolver(&mut self) -> &mut ValueResolver {
        &mut self.resolver
    }

    /// The triple for the type under test
    pub fn triple(&mut self) -> Result<Rc<ValueTriple>> {
        self.resolver.resolve(&self.descriptor)
    }

    /// The triple for any other type in the same run
    pub fn resolve(&mut self, descriptor: &TypeDescriptor) -> Result<Rc<ValueTriple>> {
        self.resolver.resolve(descriptor)
    }

    pub fn red(&mut self) -> Result<Value> {
        self.resolver.red(&self.descriptor)
    }

    pub fn black(&mut self) -> Result<Value> {
        self.resolver.black(&self.descriptor)
    }

    pub fn red_copy(&mut self) -> Result<Value> {
        self.resolver.red_copy(&self.descriptor)
    }

    pub fn unequal_examples(&self) -> &[Value] {
        &self.unequal_examples
    }
}
