// Mon Oct 12 2026 - Alex

use crate::binding::{ArraySpecification, CallbackDescriptor, Relation, TargetType};
use crate::interface::TargetParameter;
use crate::model::ParamDirection;
use crate::structure::{BitPlacement, TargetField};

/// Anything the marshaller registry can classify and generate code for.
pub trait Marshallable {
    fn name(&self) -> &str;
    fn public_type(&self) -> &TargetType;
    fn marshal_type(&self) -> &TargetType;
    fn array(&self) -> &ArraySpecification;
    fn is_array(&self) -> bool;
    fn is_bool_to_int(&self) -> bool;
    fn relations(&self) -> &[Relation];

    fn is_bit_field(&self) -> bool {
        false
    }

    fn bit_placement(&self) -> Option<BitPlacement> {
        None
    }

    fn is_optional_pointer(&self) -> bool {
        false
    }

    fn callback(&self) -> Option<&CallbackDescriptor> {
        None
    }

    fn direction(&self) -> ParamDirection {
        ParamDirection::In
    }

    fn is_parameter(&self) -> bool {
        false
    }

    fn is_interface(&self) -> bool {
        self.public_type().is_interface()
    }

    fn fixed_dimension(&self) -> u32 {
        self.array().dimension().unwrap_or(1)
    }
}

impl Marshallable for TargetField {
    fn name(&self) -> &str {
        &self.name
    }

    fn public_type(&self) -> &TargetType {
        &self.public_type
    }

    fn marshal_type(&self) -> &TargetType {
        &self.marshal_type
    }

    fn array(&self) -> &ArraySpecification {
        &self.array
    }

    fn is_array(&self) -> bool {
        self.is_array
    }

    fn is_bool_to_int(&self) -> bool {
        self.is_bool_to_int
    }

    fn relations(&self) -> &[Relation] {
        &self.relations
    }

    fn is_bit_field(&self) -> bool {
        self.bitfield.is_some()
    }

    fn bit_placement(&self) -> Option<BitPlacement> {
        self.storage.as_ref().map(|storage| BitPlacement {
            storage: storage.clone(),
            bit_offset: self.bit_offset,
            bit_mask: self.bit_mask,
        })
    }

    fn is_optional_pointer(&self) -> bool {
        self.is_optional_pointer
    }

    fn callback(&self) -> Option<&CallbackDescriptor> {
        self.callback.as_ref()
    }
}

impl Marshallable for TargetParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn public_type(&self) -> &TargetType {
        &self.public_type
    }

    fn marshal_type(&self) -> &TargetType {
        &self.marshal_type
    }

    fn array(&self) -> &ArraySpecification {
        &self.array
    }

    fn is_array(&self) -> bool {
        self.is_array
    }

    fn is_bool_to_int(&self) -> bool {
        self.is_bool_to_int
    }

    fn relations(&self) -> &[Relation] {
        &self.relations
    }

    fn direction(&self) -> ParamDirection {
        self.direction
    }

    fn is_parameter(&self) -> bool {
        true
    }
}
