// Mon Oct 12 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    WideChar,
    IntPtr,
    UIntPtr,
    Void,
}

impl PrimitiveType {
    pub fn size(self, pointer_size: usize) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool | Self::Char => 1,
            Self::U16 | Self::I16 | Self::WideChar => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::IntPtr | Self::UIntPtr => pointer_size,
            Self::Void => 0,
        }
    }

    pub fn alignment(self, pointer_size: usize) -> usize {
        self.size(pointer_size).max(1)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && !matches!(self, Self::Bool | Self::Void)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::WideChar => "wchar",
            Self::IntPtr => "isize",
            Self::UIntPtr => "usize",
            Self::Void => "void",
        }
    }
}

/// A type in the managed model.
///
/// `Unknown` carries the unresolved native name so later stages can still
/// report it; it lays out with zero size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    Fundamental(PrimitiveType),
    Enum { name: String, underlying: PrimitiveType },
    Struct(String),
    Interface(String),
    Callback(String),
    Unknown(String),
}

impl TargetType {
    pub fn qualified_name(&self) -> String {
        match self {
            Self::Fundamental(ty) => ty.name().to_string(),
            Self::Enum { name, .. }
            | Self::Struct(name)
            | Self::Interface(name)
            | Self::Callback(name)
            | Self::Unknown(name) => name.clone(),
        }
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::Fundamental(ty) => Some(*ty),
            Self::Enum { underlying, .. } => Some(*underlying),
            _ => None,
        }
    }

    /// Size when the type is not an aggregate; aggregates are sized by the layout table.
    pub fn scalar_size(&self, pointer_size: usize) -> Option<usize> {
        match self {
            Self::Fundamental(ty) => Some(ty.size(pointer_size)),
            Self::Enum { underlying, .. } => Some(underlying.size(pointer_size)),
            Self::Interface(_) | Self::Callback(_) => Some(pointer_size),
            Self::Unknown(_) => Some(0),
            Self::Struct(_) => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Fundamental(PrimitiveType::Bool))
    }

    pub fn is_integer(&self) -> bool {
        self.primitive().map(|p| p.is_integer()).unwrap_or(false)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface(_))
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Fundamental(PrimitiveType::Void))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "unknown({})", name),
            _ => write!(f, "{}", self.qualified_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_sized_primitives_follow_pointer_width() {
        assert_eq!(PrimitiveType::IntPtr.size(8), 8);
        assert_eq!(PrimitiveType::IntPtr.size(4), 4);
        assert_eq!(PrimitiveType::I32.size(4), 4);
    }

    #[test]
    fn test_enum_reports_underlying_primitive() {
        let ty = TargetType::Enum { name: "Format".to_string(), underlying: PrimitiveType::U32 };
        assert!(ty.is_integer());
        assert_eq!(ty.scalar_size(8), Some(4));
        assert_eq!(ty.qualified_name(), "Format");
    }

    #[test]
    fn test_struct_has_no_scalar_size() {
        assert_eq!(TargetType::Struct("Desc".to_string()).scalar_size(8), None);
        assert_eq!(TargetType::Unknown("X".to_string()).scalar_size(8), Some(0));
    }
}
