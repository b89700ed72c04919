// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::array::{self, ElementOps};
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, Place, StructMarshalMethod, Value};
use crate::marshal::Marshallable;

fn step(method: StructMarshalMethod, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::StructMarshal { method, managed, native }
}

fn element_to_native(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    step(StructMarshalMethod::To, managed, native)
}

fn element_to_managed(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    step(StructMarshalMethod::From, managed, native)
}

fn element_free(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    step(StructMarshalMethod::Free, managed, native)
}

const OPS: ElementOps = ElementOps {
    to_native: element_to_native,
    to_managed: element_to_managed,
    free: Some(element_free),
    keep_alive: false,
};

/// Arrays whose elements have their own native shadow.
pub struct NativeStructArrayMarshaller;

impl Marshaller for NativeStructArrayMarshaller {
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

    fn points(array: ArraySpecification) -> TargetField {
        let mut field = TargetField::new("points", TargetType::Struct("Point".to_string()));
        field.is_array = true;
        field.array = array;
        field
    }

    #[test]
    fn test_each_element_uses_its_own_marshal() {
        let shadowed: HashSet<String> = ["Point".to_string()].into_iter().collect();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = points(ArraySpecification::Constant(2));

        assert_eq!(
            render(&NativeStructArrayMarshaller.to_native(&field, &ctx)),
            "debug_assert(len(points) <= 2);\nfor (i = 0; i < len(points); i++) {\n    points[i].marshal_to(ref @ref.points[i]);\n}\n"
        );
        assert_eq!(
            render(&NativeStructArrayMarshaller.to_managed(&field, &ctx)),
            "points = new Point[2];\nfor (i = 0; i < 2; i++) {\n    points[i].marshal_from(ref @ref.points[i]);\n}\n"
        );
        assert_eq!(
            render(&NativeStructArrayMarshaller.cleanup(&field, &ctx)),
            "for (i = 0; i < 2; i++) {\n    points[i].marshal_free(ref @ref.points[i]);\n}\n"
        );
    }

    #[test]
    fn test_dynamic_elements_freed_before_buffer() {
        let shadowed: HashSet<String> = ["Point".to_string()].into_iter().collect();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = points(ArraySpecification::Dynamic {
            size_identifier: "point_count".to_string(),
            size_type: "u32".to_string(),
        });

        let to = render(&NativeStructArrayMarshaller.to_native(&field, &ctx));
        assert!(to.contains("@ref.points = alloc<Point::Native>(len(points));"));

        let free = render(&NativeStructArrayMarshaller.cleanup(&field, &ctx));
        let element = free.find("marshal_free").unwrap();
        let buffer = free.find("free(@ref.points);").unwrap();
        assert!(element < buffer);
        assert!(free.starts_with("for (i = 0; i < @ref.point_count; i++) {"));
    }
}
