// Mon Oct 12 2026 - Alex

use crate::marshal::context::{local_name, MarshalContext};
use crate::marshal::marshallers::array::{self, ElementOps};
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, PinScope, Place, Value};
use crate::marshal::Marshallable;

fn element_to_native(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(native, managed.read())
}

fn element_to_managed(_subject: &dyn Marshallable, _ctx: &MarshalContext, managed: Place, native: Place) -> MarshalStatement {
    MarshalStatement::assign(managed, native.read())
}

const OPS: ElementOps = ElementOps {
    to_native: element_to_native,
    to_managed: element_to_managed,
    free: None,
    keep_alive: false,
};

/// Blittable element arrays held by an aggregate, inline or count-driven.
pub struct ValueArrayMarshaller;

impl Marshaller for ValueArrayMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::to_native(subject, ctx, &OPS)
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::to_managed(subject, ctx, &OPS)
    }

    fn cleanup(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        array::cleanup(subject, ctx, &OPS)
    }
}

/// Blittable array parameter passed by pinning the managed buffer.
pub struct PinnedArrayMarshaller;

impl Marshaller for PinnedArrayMarshaller {
    fn prolog(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }

    fn to_native(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }

    fn to_managed(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }

    fn pin(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Option<PinScope> {
        Some(PinScope {
            pointer: local_name(subject.name()),
            element: ctx.element_native_type(subject),
            target: ctx.managed(subject.name()),
        })
    }

    fn argument(&self, subject: &dyn Marshallable, _ctx: &MarshalContext) -> Value {
        Place::Local(local_name(subject.name())).read()
    }
}
