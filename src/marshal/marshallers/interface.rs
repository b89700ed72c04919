// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, Value};
use crate::marshal::Marshallable;

/// Single interface reference: native pointer out, wrapper object back.
pub struct InterfaceMarshaller;

impl Marshaller for InterfaceMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::assign(
            ctx.native(subject.name()),
            Value::NativePointerOf(ctx.managed(subject.name())),
        )]
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::assign(
            ctx.managed(subject.name()),
            Value::WrapInterface {
                interface: subject.public_type().qualified_name(),
                pointer: Box::new(ctx.native(subject.name()).read()),
            },
        )]
    }

    fn cleanup(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::KeepAlive(ctx.managed(subject.name()))]
    }
}
