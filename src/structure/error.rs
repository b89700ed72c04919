// Mon Oct 12 2026 - Alex

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("field '{field}' sits at {offset} with {pointer_size}-byte pointers but at {alternate_offset} with {alternate_pointer_size}-byte pointers")]
    NonPortableAlignment {
        aggregate: String,
        field: String,
        offset: u64,
        alternate_offset: u64,
        pointer_size: usize,
        alternate_pointer_size: usize,
    },
    #[error("array field '{field}' has no known dimension; laid out as a single element")]
    UnknownArrayDimension { aggregate: String, field: String },
    #[error("base '{base}' of '{aggregate}' is not a known aggregate")]
    UnknownBase { aggregate: String, base: String },
    #[error("'{0}' contains itself by value")]
    CyclicAggregate(String),
}

impl LayoutError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::NonPortableAlignment { .. } => DiagnosticCode::NonPortableAlignment,
            Self::UnknownArrayDimension { .. } => DiagnosticCode::UnknownArrayDimension,
            Self::UnknownBase { .. } => DiagnosticCode::UnknownBase,
            Self::CyclicAggregate(_) => DiagnosticCode::CyclicAggregate,
        }
    }

    pub fn location(&self) -> String {
        match self {
            Self::NonPortableAlignment { aggregate, field, .. }
            | Self::UnknownArrayDimension { aggregate, field } => format!("{}::{}", aggregate, field),
            Self::UnknownBase { aggregate, .. } => aggregate.clone(),
            Self::CyclicAggregate(aggregate) => aggregate.clone(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.code(), &self.location(), self.to_string())
    }
}
