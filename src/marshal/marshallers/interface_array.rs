// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::array::{self, ElementOps};
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, Place, Value};
use crate::marshal::Marshallable;

fn element_to_native(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(native, Value::NativePointerOf(managed))
}

fn element_to_managed(subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(
        managed,
        Value::WrapInterface {
            interface: subject.public_type().qualified_name(),
            pointer: Box::new(native.read()),
        },
    )
}

const OPS: ElementOps = ElementOps {
    to_native: element_to_native,
    to_managed: element_to_managed,
    free: None,
    keep_alive: true,
};

/// Arrays of interface references, fixed, count-driven or passed as a parameter.
pub struct InterfaceArrayMarshaller;

impl Marshaller for InterfaceArrayMarshaller {
    fn prolog(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::prolog(subject, ctx)
    }

    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::to_native(subject, ctx, &OPS)
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::to_managed(subject, ctx, &OPS)
    }

    fn cleanup(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::cleanup(subject, ctx, &OPS)
    }

    fn argument(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Value {
        array::argument(subject, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{ArraySpecification, TargetType};
    use crate::marshal::statement::render;
    use crate::structure::TargetField;
    use std::collections::HashSet;

    fn items(array: ArraySpecification) -> TargetField {
        let mut field = TargetField::new("items", TargetType::Interface("IItem".to_string()));
        field.is_array = true;
        field.array = array;
        field
    }

    fn counted() -> TargetField {
        items(ArraySpecification::Dynamic {
            size_identifier: "count".to_string(),
            size_type: "u32".to_string(),
        })
    }

    #[test]
    fn test_dynamic_array_allocates_only_when_non_empty() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let text = render(&InterfaceArrayMarshaller.to_native(&counted(), &ctx));

        assert_eq!(
            text,
            "if (len(items) > 0) {\n    @ref.items = alloc<isize>(len(items));\n    for (i = 0; i < len(items); i++) {\n        @ref.items[i] = native_ptr(items[i]);\n    }\n    @ref.count = (u32)len(items);\n}\n"
        );
        assert!(!text.contains("else"));
    }

    #[test]
    fn test_dynamic_array_sized_by_count_and_freed() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = counted();

        let from = render(&InterfaceArrayMarshaller.to_managed(&field, &ctx));
        assert!(from.starts_with("if (@ref.count > 0) {\n    items = new IItem[@ref.count];\n"));
        assert!(from.contains("items[i] = wrap<IItem>(@ref.items[i]);"));

        let free = render(&InterfaceArrayMarshaller.cleanup(&field, &ctx));
        assert_eq!(free, "keep_alive(items);\nfree(@ref.items);\n");
    }

    #[test]
    fn test_fixed_array_checks_bounds_in_debug() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = items(ArraySpecification::Constant(4));

        let to = render(&InterfaceArrayMarshaller.to_native(&field, &ctx));
        assert!(to.starts_with("debug_assert(len(items) <= 4);\n"));
        assert!(!to.contains("alloc"));

        let from = render(&InterfaceArrayMarshaller.to_managed(&field, &ctx));
        assert!(from.starts_with("items = new IItem[4];\nfor (i = 0; i < 4; i++) {\n"));
        assert!(InterfaceArrayMarshaller.cleanup(&field, &ctx).iter().all(|s| !matches!(s, MarshalStatement::FreeNative(_))));
    }
}
