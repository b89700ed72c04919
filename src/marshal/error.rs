// Mon Oct 12 2026 - Alex

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("relation '{relation}' on '{element}' cannot be used here")]
    RelationNotAllowed { element: String, relation: String },

    #[error("'{element}' takes its length from '{target}', which is not an array parameter")]
    MissingLengthSource { element: String, target: String },

    #[error("default value '{value}' of '{element}' has {given} members, '{aggregate}' has {expected} public fields")]
    DefaultValueArity {
        element: String,
        value: String,
        aggregate: String,
        given: usize,
        expected: usize,
    },
}

impl MarshalError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::DefaultValueArity { .. } => DiagnosticCode::InvalidDefaultValue,
            _ => DiagnosticCode::InvalidRelationInScenario,
        }
    }

    pub fn to_diagnostic(&self, location: &str) -> Diagnostic {
        Diagnostic::new(self.code(), location, self.to_string())
    }
}
