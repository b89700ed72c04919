// Mon Oct 12 2026 - Alex

use crate::marshal::context::{local_name, MarshalContext};
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, PinScope, Value};
use crate::marshal::Marshallable;
use crate::model::ParamDirection;

/// Identical managed and native representation: a plain copy, or a pin for by-ref parameters.
pub struct PassThroughMarshaller;

impl Marshaller for PassThroughMarshaller {
    fn prolog(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }

    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        if ctx.is_callable() {
            return Vec::new();
        }
        vec![MarshalStatement::assign(
            ctx.native(subject.name()),
            ctx.managed(subject.name()).read(),
        )]
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        if ctx.is_callable() {
            return Vec::new();
        }
        vec![MarshalStatement::assign(
            ctx.managed(subject.name()),
            ctx.native(subject.name()).read(),
        )]
    }

    fn pin(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Option<PinScope> {
        if !ctx.is_callable() || subject.direction() == ParamDirection::In {
            return None;
        }
        Some(PinScope {
            pointer: local_name(subject.name()),
            element: ctx.native_type_name(subject.marshal_type()),
            target: ctx.managed(subject.name()),
        })
    }

    fn argument(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Value {
        if subject.direction() == ParamDirection::In {
            ctx.managed(subject.name()).read()
        } else {
            ctx.native(subject.name()).read()
        }
    }
}
