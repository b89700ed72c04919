// Mon Oct 12 2026 - Alex

use crate::binding::{ArraySpecification, CallbackDescriptor, Relation, TargetType};
use crate::marshal::MarshalShape;
use crate::model::{BitfieldDecl, Visibility};
use crate::structure::{Alignment, Offset, Size};
use serde::Serialize;
use std::fmt;

/// A resolved aggregate member.
///
/// Created by the resolver with layout values zeroed; the layout engine fills
/// `offset`, `size`, `alignment` and the bit placement, and the marshaller
/// registry fills `strategy`.
#[derive(Debug, Clone, Serialize)]
pub struct TargetField {
    pub name: String,
    pub native_name: String,
    /// Bound type of the declared element, before pointer or array shaping.
    pub native_type: TargetType,
    pub public_type: TargetType,
    pub marshal_type: TargetType,
    pub pointer_depth: u8,
    pub is_array: bool,
    pub array: ArraySpecification,
    /// Storage rank hint; fields sharing a rank share storage.
    pub rank: Option<u32>,
    pub bitfield: Option<BitfieldDecl>,
    pub offset: Offset,
    pub size: Size,
    pub alignment: Alignment,
    pub bit_offset: u32,
    pub bit_mask: u64,
    /// Name of the shared storage unit a bitfield lives in.
    pub storage: Option<String>,
    pub is_bool_to_int: bool,
    pub is_optional_pointer: bool,
    pub callback: Option<CallbackDescriptor>,
    pub relations: Vec<Relation>,
    /// Value is computed from a relation instead of being set by callers.
    pub is_derived: bool,
    pub default_value: Option<String>,
    pub visibility: Visibility,
    pub is_valid: bool,
    pub strategy: Option<MarshalShape>,
}

impl TargetField {
    pub fn new(name: &str, native_type: TargetType) -> Self {
        Self {
            name: name.to_string(),
            native_name: name.to_string(),
            public_type: native_type.clone(),
            marshal_type: native_type.clone(),
            native_type,
            pointer_depth: 0,
            is_array: false,
            array: ArraySpecification::Undefined,
            rank: None,
            bitfield: None,
            offset: Offset::zero(),
            size: Size::zero(),
            alignment: Alignment::one(),
            bit_offset: 0,
            bit_mask: 0,
            storage: None,
            is_bool_to_int: false,
            is_optional_pointer: false,
            callback: None,
            relations: Vec::new(),
            is_derived: false,
            default_value: None,
            visibility: Visibility::Public,
            is_valid: true,
            strategy: None,
        }
    }

    /// Placeholder for a member whose type could not be bound.
    pub fn invalid(name: &str, native_type_name: &str) -> Self {
        let mut field = Self::new(name, TargetType::Unknown(native_type_name.to_string()));
        field.is_valid = false;
        field
    }

    pub fn is_bit_field(&self) -> bool {
        self.bitfield.is_some()
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// Occupies one pointer slot regardless of its element type.
    pub fn is_pointer_slot(&self) -> bool {
        self.array.is_dynamic() || self.callback.is_some() || (self.is_pointer() && !self.is_array)
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}: {}", self.name, self.offset, self.public_type)?;
        if self.is_array {
            write!(f, "{}", self.array)?;
        }
        if self.is_bit_field() {
            write!(f, " bits {}/0x{:x}", self.bit_offset, self.bit_mask)?;
        }
        Ok(())
    }
}
