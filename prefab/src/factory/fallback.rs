use tracing::debug;

use crate::catalog::ClassKind;
use crate::descriptor::TypeDescriptor;
use crate::error::{PrefabError, Result};
use crate::guard::GuardStack;
use crate::instantiate;
use crate::resolver::ValueResolver;
use crate::triple::ValueTriple;
use crate::value::{Instance, Value};

/// Builds values for types with no registered factory.
///
/// Three instances are allocated without running any constructor and every
/// field, inherited ones included, is written directly with the colors
/// resolved for the field's own type, so caller overrides of primitive kinds
/// reach record fields too. The red copy receives red's field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackFactory;

impl FallbackFactory {
    pub fn create_values(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ValueResolver,
        guard: &GuardStack,
    ) -> Result<ValueTriple> {
        let catalog = resolver.catalog();
        let layout = catalog.layout(descriptor.identity()).ok_or_else(|| {
            PrefabError::cannot_synthesize(
                descriptor.to_string(),
                "no factory or layout is registered for this type",
            )
        })?;

        if let ClassKind::Enum(constants) = layout.kind() {
            return enum_values(descriptor, constants);
        }

        let mut red = instantiate::allocate(catalog.as_ref(), descriptor)?;
        let mut black = red.clone();
        let mut red_copy = red.clone();
        let fields = catalog.fields(descriptor)?;
        debug!(
            target: "prefab::fallback",
            ty = %descriptor,
            fields = fields.len(),
            "Allocating without constructor"
        );

        // Slots are written by position: a subclass may redeclare an
        // inherited field name, and both slots need their own value.
        for (index, field) in fields.iter().enumerate() {
            let triple = resolver.resolve_with(&field.ty, guard)?;
            red.set_slot(index, triple.red.clone())?;
            black.set_slot(index, triple.black.clone())?;
            red_copy.set_slot(index, triple.red.clone())?;
        }

        Ok(ValueTriple::new(
            Value::Ref(red.seal()),
            Value::Ref(black.seal()),
            Value::Ref(red_copy.seal()),
        ))
    }
}

// The first constant is red and the second black. A one-constant enum has no
// second value, so both colors are the same constant.
fn enum_values(
    descriptor: &TypeDescriptor,
    constants: &[Instance],
) -> Result<ValueTriple> {
    let red = constants.first().ok_or_else(|| {
        PrefabError::cannot_synthesize(descriptor.to_string(), "enum has no constants")
    })?;
    let black = constants.get(1).unwrap_or(red);
    Ok(ValueTriple::new(
        Value::Ref(red.clone()),
        Value::Ref(black.clone()),
        Value::Ref(red.clone()),
    ))
}
