// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::array::{self, ElementOps};
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, Place, Value};
use crate::marshal::Marshallable;

fn to_int(subject: &dyn Marshallable, value: Value) -> Value {
    Value::cast(&subject.marshal_type().qualified_name(), Value::BoolToInt(Box::new(value)))
}

/// Managed `bool` stored natively as an integer.
pub struct BoolToIntMarshaller;

impl Marshaller for BoolToIntMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::assign(
            ctx.native(subject.name()),
            to_int(subject, ctx.managed(subject.name()).read()),
        )]
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::assign(
            ctx.managed(subject.name()),
            Value::IntToBool(Box::new(ctx.native(subject.name()).read())),
        )]
    }
}

fn element_to_native(subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(native, to_int(subject, managed.read()))
}

fn element_to_managed(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(managed, Value::IntToBool(Box::new(native.read())))
}

const OPS: ElementOps = ElementOps {
    to_native: element_to_native,
    to_managed: element_to_managed,
    free: None,
    keep_alive: false,
};

/// Array of managed `bool` converted element-wise to a native integer array.
pub struct BoolToIntArrayMarshaller;

impl Marshaller for BoolToIntArrayMarshaller {
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
