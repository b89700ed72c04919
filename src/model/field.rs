// Mon Oct 12 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared bit run of a bitfield member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitfieldDecl {
    pub width: u32,
    /// Position inside the storage unit; absent means "after the previous run member".
    #[serde(default)]
    pub position: Option<u32>,
}

/// A field as delivered by the native declaration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceField {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub pointer_depth: u8,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub array_dimension: Option<u32>,
    #[serde(default)]
    pub bitfield: Option<BitfieldDecl>,
    /// Storage rank hint in declared field-index units. Absent means sequential.
    #[serde(default)]
    pub offset: Option<u32>,
    /// Initial value expression, `{a, b}` for nested aggregates.
    #[serde(default)]
    pub default_value: Option<String>,
}

impl SourceField {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            pointer_depth: 0,
            is_array: false,
            array_dimension: None,
            bitfield: None,
            offset: None,
            default_value: None,
        }
    }

    pub fn with_pointer(mut self, depth: u8) -> Self {
        self.pointer_depth = depth;
        self
    }

    pub fn with_array(mut self, dimension: u32) -> Self {
        self.is_array = true;
        self.array_dimension = Some(dimension);
        self
    }

    pub fn with_unknown_array(mut self) -> Self {
        self.is_array = true;
        self.array_dimension = None;
        self
    }

    pub fn with_bitfield(mut self, width: u32) -> Self {
        self.bitfield = Some(BitfieldDecl { width, position: None });
        self
    }

    pub fn with_bit_position(mut self, position: u32) -> Self {
        if let Some(ref mut bitfield) = self.bitfield {
            bitfield.position = Some(position);
        }
        self
    }

    pub fn with_offset(mut self, rank: u32) -> Self {
        self.offset = Some(rank);
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    pub fn is_bitfield(&self) -> bool {
        self.bitfield.is_some()
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.type_name, "*".repeat(self.pointer_depth as usize), self.name)?;
        if self.is_array {
            match self.array_dimension {
                Some(dimension) => write!(f, "[{}]", dimension)?,
                None => write!(f, "[]")?,
            }
        }
        if let Some(bitfield) = self.bitfield {
            write!(f, " : {}", bitfield.width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_display() {
        let field = SourceField::new("flags", "int").with_bitfield(3);
        assert_eq!(field.to_string(), "int flags : 3");

        let array = SourceField::new("data", "char").with_array(10);
        assert_eq!(array.to_string(), "char data[10]");

        let pointer = SourceField::new("next", "Node").with_pointer(1);
        assert_eq!(pointer.to_string(), "Node* next");
    }

    #[test]
    fn test_bit_position_requires_bitfield() {
        let plain = SourceField::new("a", "int").with_bit_position(4);
        assert!(plain.bitfield.is_none());

        let bits = SourceField::new("a", "int").with_bitfield(4).with_bit_position(4);
        assert_eq!(bits.bitfield, Some(BitfieldDecl { width: 4, position: Some(4) }));
    }
}
