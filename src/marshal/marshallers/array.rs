// Mon Oct 12 2026 - Alex

//! Loop and allocation scaffolding shared by every array marshaller.

use crate::binding::ArraySpecification;
use crate::marshal::context::{local_name, MarshalContext};
use crate::marshal::statement::{Condition, MarshalStatement, Place, Value};
use crate::marshal::Marshallable;
use crate::model::ParamDirection;

pub(crate) const INDEX: &str = "i";

pub(crate) type ElementStep = fn(&dyn Marshallable, &MarshalContext, Place, Place) -> MarshalStatement;

/// Per-element behaviour plugged into the shared loops.
pub(crate) struct ElementOps {
    pub to_native: ElementStep,
    pub to_managed: ElementStep,
    pub free: Option<ElementStep>,
    pub keep_alive: bool,
}

pub(crate) enum ArrayForm {
    Fixed(u32),
    Dynamic { size_identifier: String, size_type: String },
    Parameter,
}

pub(crate) fn form(subject: &dyn Marshallable, ctx: &MarshalContext) -> ArrayForm {
    if ctx.is_callable() {
        return ArrayForm::Parameter;
    }
    match subject.array() {
        ArraySpecification::Dynamic {
            size_identifier,
            size_type,
        } => ArrayForm::Dynamic {
            size_identifier: size_identifier.clone(),
            size_type: size_type.clone(),
        },
        _ => ArrayForm::Fixed(subject.fixed_dimension()),
    }
}

fn for_each(count: Value, step: ElementStep, subject: &dyn Marshallable, ctx: &MarshalContext) -> MarshalStatement {
    let managed = ctx.managed(subject.name());
    let native = ctx.native(subject.name());
    MarshalStatement::ForEach {
        index: INDEX.to_string(),
        count,
        body: vec![step(subject, ctx, managed.element(INDEX), native.element(INDEX))],
    }
}

pub(crate) fn prolog(subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
    if !ctx.is_callable() {
        return Vec::new();
    }
    let element = ctx.element_native_type(subject);
    let count = Box::new(Value::LengthOf(ctx.managed(subject.name())));
    let buffer = if subject.direction() == ParamDirection::Out {
        Value::StackAlloc { element: element.clone(), count }
    } else {
        Value::AllocNative { element: element.clone(), count }
    };
    let has_elements = Condition::GreaterThanZero(Value::LengthOf(ctx.managed(subject.name())));
    vec![MarshalStatement::declare(
        &local_name(subject.name()),
        &format!("{}*", element),
        Some(Value::conditional(has_elements, buffer, Value::Null)),
    )]
}

pub(crate) fn to_native(subject: &dyn Marshallable, ctx: &MarshalContext, ops: &ElementOps) -> Vec<MarshalStatement> {
    let managed = ctx.managed(subject.name());
    let length = || Value::LengthOf(managed.clone());
    match form(subject, ctx) {
        ArrayForm::Fixed(capacity) => vec![
            MarshalStatement::DebugAssertLength {
                array: managed.clone(),
                capacity,
            },
            for_each(length(), ops.to_native, subject, ctx),
        ],
        ArrayForm::Dynamic {
            size_identifier,
            size_type,
        } => {
            let native = ctx.native(subject.name());
            vec![MarshalStatement::If {
                condition: Condition::GreaterThanZero(length()),
                body: vec![
                    MarshalStatement::assign(
                        native,
                        Value::AllocNative {
                            element: ctx.element_native_type(subject),
                            count: Box::new(length()),
                        },
                    ),
                    for_each(length(), ops.to_native, subject, ctx),
                    MarshalStatement::assign(Place::Native(size_identifier), Value::cast(&size_type, length())),
                ],
                otherwise: Vec::new(),
            }]
        }
        ArrayForm::Parameter => vec![for_each(length(), ops.to_native, subject, ctx)],
    }
}

pub(crate) fn to_managed(subject: &dyn Marshallable, ctx: &MarshalContext, ops: &ElementOps) -> Vec<MarshalStatement> {
    let managed = ctx.managed(subject.name());
    let element = subject.public_type().qualified_name();
    match form(subject, ctx) {
        ArrayForm::Fixed(capacity) => vec![
            MarshalStatement::assign(
                managed,
                Value::NewManagedArray {
                    element,
                    count: Box::new(Value::Literal(capacity as i64)),
                },
            ),
            for_each(Value::Literal(capacity as i64), ops.to_managed, subject, ctx),
        ],
        ArrayForm::Dynamic { size_identifier, .. } => {
            let size = || Place::Native(size_identifier.clone()).read();
            vec![MarshalStatement::If {
                condition: Condition::GreaterThanZero(size()),
                body: vec![
                    MarshalStatement::assign(
                        managed,
                        Value::NewManagedArray {
                            element,
                            count: Box::new(size()),
                        },
                    ),
                    for_each(size(), ops.to_managed, subject, ctx),
                ],
                otherwise: Vec::new(),
            }]
        }
        ArrayForm::Parameter => vec![for_each(Value::LengthOf(managed), ops.to_managed, subject, ctx)],
    }
}

pub(crate) fn cleanup(subject: &dyn Marshallable, ctx: &MarshalContext, ops: &ElementOps) -> Vec<MarshalStatement> {
    let managed = ctx.managed(subject.name());
    let native = ctx.native(subject.name());
    let mut statements = Vec::new();
    if ops.keep_alive {
        statements.push(MarshalStatement::KeepAlive(managed.clone()));
    }

    match form(subject, ctx) {
        ArrayForm::Fixed(capacity) => {
            if let Some(free) = ops.free {
                statements.push(for_each(Value::Literal(capacity as i64), free, subject, ctx));
            }
        }
        ArrayForm::Dynamic { size_identifier, .. } => {
            if let Some(free) = ops.free {
                statements.push(for_each(Place::Native(size_identifier).read(), free, subject, ctx));
            }
            statements.push(MarshalStatement::FreeNative(native));
        }
        ArrayForm::Parameter => {
            if let Some(free) = ops.free {
                statements.push(for_each(Value::LengthOf(managed), free, subject, ctx));
            }
            if subject.direction() != ParamDirection::Out {
                statements.push(MarshalStatement::FreeNative(native));
            }
        }
    }
    statements
}

pub(crate) fn argument(subject: &dyn Marshallable, ctx: &MarshalContext) -> Value {
    ctx.native(subject.name()).read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{PrimitiveType, TargetType};
    use crate::interface::TargetParameter;
    use crate::marshal::statement::render;
    use std::collections::HashSet;

    fn copy_in(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
        MarshalStatement::assign(native, managed.read())
    }

    fn copy_out(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
        MarshalStatement::assign(managed, native.read())
    }

    const COPY: ElementOps = ElementOps {
        to_native: copy_in,
        to_managed: copy_out,
        free: None,
        keep_alive: false,
    };

    fn values(direction: ParamDirection) -> TargetParameter {
        TargetParameter::new("values", TargetType::Fundamental(PrimitiveType::I32))
            .with_array()
            .with_direction(direction)
    }

    #[test]
    fn test_parameter_buffer_null_when_empty() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_callable(&shadowed);

        assert_eq!(
            render(&prolog(&values(ParamDirection::In), &ctx)),
            "i32* values_ = (len(values) > 0 ? alloc<i32>(len(values)) : null);\n"
        );
        assert_eq!(
            render(&prolog(&values(ParamDirection::Out), &ctx)),
            "i32* values_ = (len(values) > 0 ? stackalloc<i32>(len(values)) : null);\n"
        );
    }

    #[test]
    fn test_out_parameter_buffer_not_freed() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_callable(&shadowed);

        assert_eq!(render(&cleanup(&values(ParamDirection::In), &ctx, &COPY)), "free(values_);\n");
        assert!(cleanup(&values(ParamDirection::Out), &ctx, &COPY).is_empty());
    }

    #[test]
    fn test_parameter_loops_over_managed_length() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_callable(&shadowed);
        let parameter = values(ParamDirection::Ref);

        assert_eq!(
            render(&to_native(&parameter, &ctx, &COPY)),
            "for (i = 0; i < len(values); i++) {\n    values_[i] = values[i];\n}\n"
        );
        assert_eq!(argument(&parameter, &ctx), Value::Read(Place::Local("values_".to_string())));
        assert!(prolog(&parameter, &MarshalContext::for_struct(&shadowed)).is_empty());
    }
}
