//! Factory registry keyed by type identity.
//!
//! Keys are identity strings rather than live type handles, so factories can be
//! registered for types nothing has resolved yet, and registries built
//! independently (standard defaults, caller overrides) compose with `merge`.

use std::collections::HashMap;

use tracing::debug;

use crate::factory::Factory;

/// Mapping from type identity to the factory that builds its values
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Factory>,
}

impl FactoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for an identity. Registering again replaces the
    /// earlier factory; an empty identity is ignored. Identities are trimmed
    /// here and on every lookup.
    pub fn register(&mut self, identity: impl AsRef<str>, factory: Factory) {
        let identity = identity.as_ref().trim();
        if identity.is_empty() {
            return;
        }
        self.factories.insert(identity.to_string(), factory);
    }

    /// The factory registered for an identity
    pub fn lookup(&self, identity: &str) -> Option<&Factory> {
        self.factories.get(identity.trim())
    }

    /// Check if a factory is registered for an identity
    pub fn contains(&self, identity: &str) -> bool {
        self.factories.contains_key(identity.trim())
    }

    /// Remove the factory for an identity
    pub fn remove(&mut self, identity: &str) -> bool {
        self.factories.remove(identity.trim()).is_some()
    }

    /// A new registry with the entries of both; `other` wins on collisions.
    /// Neither input is modified.
    pub fn merge(&self, other: &FactoryRegistry) -> FactoryRegistry {
        let mut merged = self.clone();
        for (identity, factory) in &other.factories {
            merged.factories.insert(identity.clone(), factory.clone());
        }
        debug!(
            target: "prefab::registry",
            base = self.len(),
            overrides = other.len(),
            merged = merged.len(),
            "Merged factory registries"
        );
        merged
    }

    /// Registered identities, in no particular order
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Factory)> {
        self.factories
            .iter()
            .map(|(identity, factory)| (identity.as_str(), factory))
    }

    /// Get the number of registered factories
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn constant(red: i32, black: i32) -> Factory {
        Factory::values(Value::I32(red), Value::I32(black), Value::I32(red))
    }

    fn red_of(registry: &FactoryRegistry, identity: &str) -> Option<Value> {
        match registry.lookup(identity)? {
            Factory::Constant(factory) => Some(factory.triple().red.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_registry_basic_operations() {
        let mut registry = FactoryRegistry::new();

        // Initially empty
        assert!(registry.is_empty());
        assert!(!registry.contains("Money"));
        assert!(registry.lookup("Money").is_none());

        // Registration is by name only; nothing needs to know the type yet
        registry.register("Money", constant(1, 2));
        assert!(registry.contains("Money"));
        assert_eq!(registry.len(), 1);

        // Last write wins
        registry.register("Money", constant(3, 4));
        assert_eq!(registry.len(), 1);
        assert_eq!(red_of(&registry, "Money"), Some(Value::I32(3)));

        assert!(registry.remove("Money"));
        assert!(!registry.remove("Money"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_identity_is_ignored() {
        let mut registry = FactoryRegistry::new();
        registry.register("", constant(1, 2));
        registry.register("  ", constant(1, 2));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identities_are_trimmed_on_both_sides() {
        let mut registry = FactoryRegistry::new();
        registry.register(" Money ", constant(1, 2));

        assert!(registry.contains("Money"));
        assert!(registry.contains(" Money "));
        assert_eq!(red_of(&registry, "\tMoney"), Some(Value::I32(1)));
        assert_eq!(registry.identities().collect::<Vec<_>>(), vec!["Money"]);

        assert!(registry.remove("Money "));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_merge_prefers_other_and_leaves_inputs_alone() {
        let mut defaults = FactoryRegistry::new();
        defaults.register("A", constant(1, 2));
        defaults.register("B", constant(1, 2));

        let mut overrides = FactoryRegistry::new();
        overrides.register("B", constant(5, 6));
        overrides.register("C", Factory::map());

        let merged = defaults.merge(&overrides);
        assert_eq!(merged.len(), 3);
        assert_eq!(red_of(&merged, "A"), Some(Value::I32(1)));
        assert_eq!(red_of(&merged, "B"), Some(Value::I32(5)));
        assert_eq!(merged.lookup("C").map(Factory::kind), Some("map"));

        assert_eq!(defaults.len(), 2);
        assert_eq!(red_of(&defaults, "B"), Some(Value::I32(1)));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_iter_lists_every_entry() {
        let mut registry = FactoryRegistry::new();
        registry.register("A", constant(1, 2));
        registry.register("B", Factory::ordered_collection());

        let mut kinds: Vec<_> = registry
            .iter()
            .map(|(identity, factory)| format!("{}={}", identity, factory.kind()))
            .collect();
        kinds.sort();
        assert_eq!(kinds, vec!["A=constant", "B=collection"]);
    }
}
