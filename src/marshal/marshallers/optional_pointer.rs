// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{Condition, MarshalStatement, StructMarshalMethod, Value};
use crate::marshal::Marshallable;

/// Optional value behind a native pointer. No value means a null pointer,
/// never a zeroed allocation.
pub struct OptionalPointerMarshaller;

impl Marshaller for OptionalPointerMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let managed = ctx.managed(subject.name());
        let native = ctx.native(subject.name());
        let store = if ctx.has_native_shadow(subject.public_type()) {
            MarshalStatement::StructMarshal {
                method: StructMarshalMethod::To,
                managed: managed.clone(),
                native: native.deref(),
            }
        } else {
            MarshalStatement::assign(native.deref(), managed.read())
        };

        vec![MarshalStatement::If {
            condition: Condition::HasValue(managed),
            body: vec![
                MarshalStatement::assign(
                    native.clone(),
                    Value::AllocNative {
                        element: ctx.element_native_type(subject),
                        count: Box::new(Value::Literal(1)),
                    },
                ),
                store,
            ],
            otherwise: vec![MarshalStatement::assign(native, Value::Null)],
        }]
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let managed = ctx.managed(subject.name());
        let native = ctx.native(subject.name());
        let load = if ctx.has_native_shadow(subject.public_type()) {
            MarshalStatement::StructMarshal {
                method: StructMarshalMethod::From,
                managed: managed.clone(),
                native: native.deref(),
            }
        } else {
            MarshalStatement::assign(managed.clone(), native.deref().read())
        };

        vec![MarshalStatement::If {
            condition: Condition::NotNull(native),
            body: vec![load],
            otherwise: vec![MarshalStatement::assign(managed, Value::Null)],
        }]
    }

    fn cleanup(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let native = ctx.native(subject.name());
        let mut body = Vec::new();
        if ctx.has_native_shadow(subject.public_type()) {
            body.push(MarshalStatement::StructMarshal {
                method: StructMarshalMethod::Free,
                managed: ctx.managed(subject.name()),
                native: native.deref(),
            });
        }
        body.push(MarshalStatement::FreeNative(native.clone()));
        vec![MarshalStatement::If {
            condition: Condition::NotNull(native),
            body,
            otherwise: Vec::new(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{PrimitiveType, TargetType};
    use crate::marshal::statement::render;
    use crate::structure::TargetField;
    use std::collections::HashSet;

    fn optional(name: &str, ty: TargetType) -> TargetField {
        let mut field = TargetField::new(name, ty);
        field.pointer_depth = 1;
        field.is_optional_pointer = true;
        field
    }

    #[test]
    fn test_absent_value_is_null_pointer() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = optional("opt", TargetType::Fundamental(PrimitiveType::I32));

        let to = render(&OptionalPointerMarshaller.to_native(&field, &ctx));
        assert_eq!(
            to,
            "if (opt.has_value) {\n    @ref.opt = alloc<i32>(1);\n    *@ref.opt = opt;\n} else {\n    @ref.opt = null;\n}\n"
        );
        let (_, absent) = to.split_once("} else {").unwrap();
        assert!(!absent.contains("alloc"));

        let from = render(&OptionalPointerMarshaller.to_managed(&field, &ctx));
        assert_eq!(from, "if (@ref.opt != null) {\n    opt = *@ref.opt;\n} else {\n    opt = null;\n}\n");
    }

    #[test]
    fn test_shadowed_value_uses_struct_methods() {
        let shadowed: HashSet<String> = ["Desc".to_string()].into_iter().collect();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = optional("desc", TargetType::Struct("Desc".to_string()));

        let to = render(&OptionalPointerMarshaller.to_native(&field, &ctx));
        assert!(to.contains("@ref.desc = alloc<Desc::Native>(1);"));
        assert!(to.contains("desc.marshal_to(ref *@ref.desc);"));

        let free = render(&OptionalPointerMarshaller.cleanup(&field, &ctx));
        assert_eq!(
            free,
            "if (@ref.desc != null) {\n    desc.marshal_free(ref *@ref.desc);\n    free(@ref.desc);\n}\n"
        );
    }
}
