// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, StructMarshalMethod};
use crate::marshal::Marshallable;

/// A by-value aggregate that has its own native shadow.
pub struct NativeStructMarshaller;

impl NativeStructMarshaller {
    fn call(method: StructMarshalMethod, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        vec![MarshalStatement::StructMarshal {
            method,
            managed: ctx.managed(subject.name()),
            native: ctx.native(subject.name()),
        }]
    }
}

impl Marshaller for NativeStructMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Self::call(StructMarshalMethod::To, subject, ctx)
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Self::call(StructMarshalMethod::From, subject, ctx)
    }

    fn cleanup(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Self::call(StructMarshalMethod::Free, subject, ctx)
    }
}
