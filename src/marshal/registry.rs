// Mon Oct 12 2026 - Alex

use crate::interface::TargetParameter;
use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::{
    BitfieldMarshaller, BoolToIntArrayMarshaller, BoolToIntMarshaller, CallbackMarshaller, InterfaceArrayMarshaller,
    InterfaceMarshaller, Marshaller, NativeStructArrayMarshaller, NativeStructMarshaller, OptionalPointerMarshaller,
    PassThroughMarshaller, PinnedArrayMarshaller, ValueArrayMarshaller,
};
use crate::marshal::{MarshalShape, Marshallable};
use crate::structure::TargetField;

type Predicate = fn(&dyn Marshallable, &MarshalContext) -> bool;

struct ShapeRule {
    shape: MarshalShape,
    applies: Predicate,
}

fn is_callback(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.callback().is_some()
}

fn is_bool_bitfield(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_bit_field() && s.is_bool_to_int()
}

fn is_bitfield(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_bit_field()
}

fn is_bool_to_int_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_bool_to_int() && s.is_array()
}

fn is_bool_to_int(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_bool_to_int()
}

fn is_fixed_interface_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_interface() && s.is_array() && !s.is_parameter() && !s.array().is_dynamic()
}

fn is_dynamic_interface_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_interface() && s.is_array() && !s.is_parameter() && s.array().is_dynamic()
}

fn is_interface_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_interface() && s.is_array()
}

fn is_native_struct_array(s: &dyn Marshallable, ctx: &MarshalContext) -> bool {
    s.is_array() && ctx.has_native_shadow(s.public_type())
}

fn is_optional_pointer(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_optional_pointer() && !s.is_parameter()
}

fn is_native_struct(s: &dyn Marshallable, ctx: &MarshalContext) -> bool {
    ctx.has_native_shadow(s.public_type())
}

fn is_interface(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_interface()
}

fn is_fixed_value_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_array() && !s.is_parameter() && !s.array().is_dynamic()
}

fn is_dynamic_value_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_array() && !s.is_parameter() && s.array().is_dynamic()
}

fn is_pinned_array(s: &dyn Marshallable, _: &MarshalContext) -> bool {
    s.is_array()
}

fn always(_: &dyn Marshallable, _: &MarshalContext) -> bool {
    true
}

/// Ordered shape rules; the first match wins.
static RULES: &[ShapeRule] = &[
    ShapeRule { shape: MarshalShape::Callback, applies: is_callback },
    ShapeRule { shape: MarshalShape::BoolBitfield, applies: is_bool_bitfield },
    ShapeRule { shape: MarshalShape::Bitfield, applies: is_bitfield },
    ShapeRule { shape: MarshalShape::BoolToIntArray, applies: is_bool_to_int_array },
    ShapeRule { shape: MarshalShape::BoolToInt, applies: is_bool_to_int },
    ShapeRule { shape: MarshalShape::FixedInterfaceArray, applies: is_fixed_interface_array },
    ShapeRule { shape: MarshalShape::DynamicInterfaceArray, applies: is_dynamic_interface_array },
    ShapeRule { shape: MarshalShape::InterfaceArray, applies: is_interface_array },
    ShapeRule { shape: MarshalShape::NativeStructArray, applies: is_native_struct_array },
    ShapeRule { shape: MarshalShape::OptionalPointer, applies: is_optional_pointer },
    ShapeRule { shape: MarshalShape::NativeStruct, applies: is_native_struct },
    ShapeRule { shape: MarshalShape::Interface, applies: is_interface },
    ShapeRule { shape: MarshalShape::FixedValueArray, applies: is_fixed_value_array },
    ShapeRule { shape: MarshalShape::DynamicValueArray, applies: is_dynamic_value_array },
    ShapeRule { shape: MarshalShape::PinnedArray, applies: is_pinned_array },
    ShapeRule { shape: MarshalShape::PassThrough, applies: always },
];

/// Chooses a marshalling strategy per element and hands out its code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarshallerRegistry;

impl MarshallerRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Shapes in the order they are tried.
    pub fn shapes(&self) -> impl Iterator<Item = MarshalShape> {
        RULES.iter().map(|rule| rule.shape)
    }

    pub fn classify(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> MarshalShape {
        RULES
            .iter()
            .find(|rule| (rule.applies)(subject, ctx))
            .map(|rule| rule.shape)
            .unwrap_or(MarshalShape::PassThrough)
    }

    pub fn marshaller_for(&self, shape: MarshalShape) -> &'static dyn Marshaller {
        match shape {
            MarshalShape::Callback => &CallbackMarshaller,
            MarshalShape::BoolBitfield | MarshalShape::Bitfield => &BitfieldMarshaller,
            MarshalShape::BoolToIntArray => &BoolToIntArrayMarshaller,
            MarshalShape::BoolToInt => &BoolToIntMarshaller,
            MarshalShape::FixedInterfaceArray | MarshalShape::DynamicInterfaceArray | MarshalShape::InterfaceArray => {
                &InterfaceArrayMarshaller
            }
            MarshalShape::NativeStructArray => &NativeStructArrayMarshaller,
            MarshalShape::OptionalPointer => &OptionalPointerMarshaller,
            MarshalShape::NativeStruct => &NativeStructMarshaller,
            MarshalShape::Interface => &InterfaceMarshaller,
            MarshalShape::FixedValueArray | MarshalShape::DynamicValueArray => &ValueArrayMarshaller,
            MarshalShape::PinnedArray => &PinnedArrayMarshaller,
            MarshalShape::PassThrough => &PassThroughMarshaller,
        }
    }

    /// Records the strategy of a valid field. Invalid fields keep none.
    pub fn assign_field(&self, field: &mut TargetField, ctx: &MarshalContext) -> Option<MarshalShape> {
        if !field.is_valid {
            return None;
        }
        let shape = self.classify(field, ctx);
        field.strategy = Some(shape);
        Some(shape)
    }

    pub fn assign_parameter(&self, parameter: &mut TargetParameter, ctx: &MarshalContext) -> Option<MarshalShape> {
        if !parameter.is_valid {
            return None;
        }
        let shape = self.classify(parameter, ctx);
        parameter.strategy = Some(shape);
        Some(shape)
    }
}
