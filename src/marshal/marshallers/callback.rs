// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{Condition, MarshalStatement, Place, Value};
use crate::marshal::Marshallable;

/// Function-pointer member paired with a reference member.
///
/// Only the managed-to-native direction is generated; reading a callback
/// back from native memory produces nothing.
pub struct CallbackMarshaller;

impl Marshaller for CallbackMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let Some(callback) = subject.callback() else {
            return Vec::new();
        };
        let managed = ctx.managed(subject.name());
        let is_set = || Condition::NotNull(managed.clone());

        vec![
            MarshalStatement::assign(
                ctx.native(subject.name()),
                Value::conditional(is_set(), Value::Trampoline(subject.name().to_string()), Value::Zero),
            ),
            MarshalStatement::assign(
                Place::Native(callback.reference_name.clone()),
                Value::conditional(is_set(), Value::FunctionPointerFor(managed.clone()), Value::Zero),
            ),
        ]
    }

    fn to_managed(&self, _subject: &dyn Marshallable, _ctx: &MarshalContext) -> Vec<MarshalStatement> {
        Vec::new()
    }
}
