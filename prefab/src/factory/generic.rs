use std::fmt;
use std::rc::Rc;

use super::{check_arity, resolve_argument};
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::guard::GuardStack;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::Value;

/// A caller-supplied constructor for a generic type, taking one value per type argument
#[derive(Clone)]
pub enum GenericConstructor {
    Unary(Rc<dyn Fn(Value) -> Value>),
    Binary(Rc<dyn Fn(Value, Value) -> Value>),
}

impl GenericConstructor {
    pub fn unary(f: impl Fn(Value) -> Value + 'static) -> Self {
        GenericConstructor::Unary(Rc::new(f))
    }

    pub fn binary(f: impl Fn(Value, Value) -> Value + 'static) -> Self {
        GenericConstructor::Binary(Rc::new(f))
    }

    pub fn arity(&self) -> usize {
        match self {
            GenericConstructor::Unary(_) => 1,
            GenericConstructor::Binary(_) => 2,
        }
    }

    fn call(&self, arguments: &[&Value]) -> Value {
        match self {
            GenericConstructor::Unary(f) => f(arguments[0].clone()),
            GenericConstructor::Binary(f) => f(arguments[0].clone(), arguments[1].clone()),
        }
    }
}

impl fmt::Debug for GenericConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericConstructor(arity {})", self.arity())
    }
}

/// Builds each color by calling the constructor with that color of every type argument
#[derive(Debug, Clone)]
pub struct GenericFactory {
    constructor: GenericConstructor,
}

impl GenericFactory {
    pub fn new(constructor: GenericConstructor) -> Self {
        Self { constructor }
    }

    pub fn arity(&self) -> usize {
        self.constructor.arity()
    }

    pub(crate) fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        let arity = self.arity();
        check_arity(descriptor, arity)?;

        let arguments = (0..arity)
            .map(|index| resolve_argument(index, descriptor, resolver, guard))
            .collect::<Result<Vec<_>>>()?;
        let reds: Vec<&Value> = arguments.iter().map(|t| &t.red).collect();
        let blacks: Vec<&Value> = arguments.iter().map(|t| &t.black).collect();

        Ok(ValueTriple::new(
            self.constructor.call(&reds),
            self.constructor.call(&blacks),
            self.constructor.call(&reds),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClassCatalog;
    use crate::error::PrefabError;
    use crate::factory::{Factory, standard_factories};

    fn td(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    fn single_container() -> GenericConstructor {
        let descriptor = td("SingleGenericContainer");
        GenericConstructor::unary(move |t| {
            Value::record(descriptor.clone(), vec![("t".to_string(), t)])
        })
    }

    fn double_container() -> GenericConstructor {
        let descriptor = td("DoubleGenericContainer");
        GenericConstructor::binary(move |t, u| {
            Value::record(
                descriptor.clone(),
                vec![("t".to_string(), t), ("u".to_string(), u)],
            )
        })
    }

    #[test]
    fn test_unary_constructor_receives_argument_colors() {
        let mut registry = standard_factories();
        registry.register("SingleGenericContainer", Factory::generic(single_container()));
        let mut resolver = ValueResolver::new(registry, ClassCatalog::new());

        let triple = resolver
            .resolve(&td("SingleGenericContainer<i32>"))
            .unwrap();
        assert_eq!(triple.red.as_instance().unwrap().field("t"), Some(&Value::I32(1)));
        assert_eq!(triple.black.as_instance().unwrap().field("t"), Some(&Value::I32(2)));
        assert!(triple.is_well_formed());
    }

    #[test]
    fn test_binary_constructor() {
        let mut registry = standard_factories();
        registry.register("DoubleGenericContainer", Factory::generic(double_container()));
        let mut resolver = ValueResolver::new(registry, ClassCatalog::new());

        let triple = resolver
            .resolve(&td("DoubleGenericContainer<String, bool>"))
            .unwrap();
        let red = triple.red.as_instance().unwrap();
        assert_eq!(red.field("t").and_then(Value::as_text), Some("one"));
        assert_eq!(red.field("u"), Some(&Value::Bool(true)));
        assert!(triple.is_well_formed());
    }

    #[test]
    fn test_arity_mismatch_is_declined() {
        let mut registry = standard_factories();
        registry.register("SingleGenericContainer", Factory::generic(single_container()));
        let mut resolver = ValueResolver::new(registry, ClassCatalog::new());

        let err = resolver
            .resolve(&td("SingleGenericContainer<i32, i32>"))
            .unwrap_err();
        assert!(matches!(err, PrefabError::CannotSynthesizeValue { .. }));
    }
}
