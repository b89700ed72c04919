// Mon Oct 12 2026 - Alex

use crate::diagnostics::DiagnosticCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no binding for native type '{0}'")]
    UnknownType(String),
    #[error("length relation on '{field}' targets '{target}', which is not a field of '{aggregate}'")]
    InvalidLengthRelation {
        aggregate: String,
        field: String,
        target: String,
    },
    #[error("'{target}' already has its length provided by '{existing}'")]
    DuplicateRelation { target: String, existing: String },
    #[error(transparent)]
    Relation(#[from] RelationParseError),
    #[error(transparent)]
    Callback(#[from] CallbackParseError),
}

impl ResolveError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::UnknownType(_) => DiagnosticCode::UnknownType,
            Self::InvalidLengthRelation { .. } => DiagnosticCode::InvalidLengthRelation,
            Self::DuplicateRelation { .. } => DiagnosticCode::DuplicateRelation,
            Self::Relation(_) => DiagnosticCode::InvalidRelation,
            Self::Callback(_) => DiagnosticCode::InvalidCallback,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationParseError {
    #[error("relation '{0}' is not of the form name(argument)")]
    Malformed(String),
    #[error("unknown relation kind '{0}'")]
    UnknownKind(String),
    #[error("relation '{kind}' expects {expected} argument(s)")]
    ArgumentCount { kind: String, expected: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackParseError {
    #[error("callback statement must have exactly two parts, found {0}")]
    PartCount(usize),
    #[error("callback part '{0}' is not an invocation")]
    NotInvocation(String),
    #[error("unknown callback function '{0}'")]
    UnknownFunction(String),
    #[error("callback function '{0}' takes exactly one argument")]
    ArgumentCount(String),
    #[error("callback function '{0}' given more than once")]
    Duplicate(String),
}
