// Mon Oct 12 2026 - Alex

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArrayKind {
    Undefined,
    Constant,
    Dynamic,
}

/// Element-count source of an array element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub enum ArraySpecification {
    #[default]
    Undefined,
    Constant(u32),
    /// Count supplied at runtime by the named sibling element.
    Dynamic {
        size_identifier: String,
        size_type: String,
    },
}

impl ArraySpecification {
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Undefined => ArrayKind::Undefined,
            Self::Constant(_) => ArrayKind::Constant,
            Self::Dynamic { .. } => ArrayKind::Dynamic,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    pub fn dimension(&self) -> Option<u32> {
        match self {
            Self::Constant(dimension) => Some(*dimension),
            _ => None,
        }
    }

    pub fn size_identifier(&self) -> Option<&str> {
        match self {
            Self::Dynamic { size_identifier, .. } => Some(size_identifier),
            _ => None,
        }
    }

    pub fn size_type(&self) -> Option<&str> {
        match self {
            Self::Dynamic { size_type, .. } => Some(size_type),
            _ => None,
        }
    }
}

impl fmt::Display for ArraySpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "[?]"),
            Self::Constant(dimension) => write!(f, "[{}]", dimension),
            Self::Dynamic { size_identifier, .. } => write!(f, "[{}]", size_identifier),
        }
    }
}
