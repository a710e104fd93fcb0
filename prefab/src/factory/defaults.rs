//! Factories for the standard types every run starts from.

use super::Factory;
use crate::colors::{BLACK_TEXT, Primitive, RED_TEXT};
use crate::descriptor::OBJECT;
use crate::registry::FactoryRegistry;
use crate::value::Value;

const ORDERED: [&str; 5] = ["Vec", "VecDeque", "LinkedList", "Option", "Box"];
const UNORDERED: [&str; 2] = ["HashSet", "BTreeSet"];
const MAPS: [&str; 2] = ["HashMap", "BTreeMap"];

/// The default registry: primitives, strings, the root object type and the
/// standard collections.
pub fn standard_factories() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();

    for primitive in Primitive::ALL {
        registry.register(
            primitive.identity(),
            Factory::values(primitive.red(), primitive.black(), primitive.red()),
        );
    }

    registry.register(
        "String",
        Factory::values(
            Value::text(RED_TEXT),
            Value::text(BLACK_TEXT),
            Value::text(RED_TEXT),
        ),
    );
    registry.register(
        OBJECT,
        Factory::values(
            Value::marker("red"),
            Value::marker("black"),
            Value::marker("red"),
        ),
    );

    for identity in ORDERED {
        registry.register(identity, Factory::ordered_collection());
    }
    for identity in UNORDERED {
        registry.register(identity, Factory::unordered_collection());
    }
    for identity in MAPS {
        registry.register(identity, Factory::map());
    }

    registry
}
