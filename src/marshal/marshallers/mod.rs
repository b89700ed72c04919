// Mon Oct 12 2026 - Alex

pub mod array;
pub mod bitfield;
pub mod bool_to_int;
pub mod callback;
pub mod interface;
pub mod interface_array;
pub mod nested_struct;
pub mod optional_pointer;
pub mod pass_through;
pub mod struct_array;
pub mod value_array;

pub use bitfield::BitfieldMarshaller;
pub use bool_to_int::{BoolToIntArrayMarshaller, BoolToIntMarshaller};
pub use callback::CallbackMarshaller;
pub use interface::InterfaceMarshaller;
pub use interface_array::InterfaceArrayMarshaller;
pub use nested_struct::NativeStructMarshaller;
pub use optional_pointer::OptionalPointerMarshaller;
pub use pass_through::PassThroughMarshaller;
pub use struct_array::NativeStructArrayMarshaller;
pub use value_array::{PinnedArrayMarshaller, ValueArrayMarshaller};

use crate::marshal::context::{local_name, MarshalContext};
use crate::marshal::statement::{MarshalStatement, PinScope, Value};
use crate::marshal::Marshallable;
use crate::model::ParamDirection;

/// Code generation for one marshalling shape.
///
/// Every method returns statements for the given scope; the same marshaller
/// serves aggregate members and callable parameters.
pub trait Marshaller: Sync {
    /// Locals and buffers a callable declares before converting anything.
    fn prolog(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        if ctx.is_callable() {
            vec![declare_native_local(subject, ctx)]
        } else {
            Vec::new()
        }
    }

    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement>;

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement>;

    fn cleanup(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }

    fn pin(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Option<PinScope> {
        None
    }

    /// Value handed to the native call for this parameter.
    fn argument(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Value {
        let local = ctx.native(subject.name());
        if subject.direction() == ParamDirection::In {
            local.read()
        } else {
            Value::AddressOf(local)
        }
    }
}

pub(crate) fn declare_native_local(subject: &dyn Marshallable, ctx: &MarshalContext) -> MarshalStatement {
    MarshalStatement::declare(&local_name(subject.name()), &ctx.element_native_type(subject), None)
}
