// Mon Oct 12 2026 - Alex

use crate::diagnostics::DiagnosticCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("inner interface pattern '{pattern}' is invalid: {message}")]
    InvalidInnerInterfaceRule { pattern: String, message: String },
    #[error("property '{property}' has a getter and setter with different types ({getter} vs {setter})")]
    AmbiguousProperty {
        property: String,
        getter: String,
        setter: String,
    },
}

impl InterfaceError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::InvalidInnerInterfaceRule { .. } => DiagnosticCode::InvalidInnerInterfaceRule,
            Self::AmbiguousProperty { .. } => DiagnosticCode::AmbiguousProperty,
        }
    }
}
