use super::{check_arity, resolve_argument};
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::guard::GuardStack;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::{Instance, MapObject, Object, Value};

/// Factory for two-argument map-like containers.
///
/// Red is `{red key: black value}` so that a key and its value are never the
/// same color. Black is `{black key: black value}`, except when the key type has
/// a single value (red key equals black key): then black stays empty rather
/// than colliding with red's only key.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapFactory;

impl MapFactory {
    pub(crate) fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        check_arity(descriptor, 2)?;
        let keys = resolve_argument(0, descriptor, resolver, guard)?;
        let values = resolve_argument(1, descriptor, resolver, guard)?;

        let red_key = &keys.red;
        let black_key = &keys.black;
        let black_value = &values.black;
        let container = descriptor.identity();

        let mut red = MapObject::new(container);
        red.insert(red_key.clone(), black_value.clone());

        let mut black = MapObject::new(container);
        if red_key != black_key {
            black.insert(black_key.clone(), black_value.clone());
        }

        let mut red_copy = MapObject::new(container);
        red_copy.insert(red_key.clone(), black_value.clone());

        Ok(ValueTriple::new(wrap(red), wrap(black), wrap(red_copy)))
    }
}

fn wrap(map: MapObject) -> Value {
    Value::Ref(Instance::new(Object::Map(map)))
}
