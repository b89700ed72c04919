// Mon Oct 12 2026 - Alex

use serde::Serialize;
use std::fmt;

/// Stable identifiers for every failure path of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    UnknownType,
    InvalidLengthRelation,
    InvalidRelation,
    InvalidRelationInScenario,
    DuplicateRelation,
    InvalidCallback,
    InvalidDefaultValue,
    NonPortableAlignment,
    UnknownArrayDimension,
    UnknownBase,
    CyclicAggregate,
    AmbiguousProperty,
    InvalidInnerInterfaceRule,
}

impl DiagnosticCode {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownType => "IM0101",
            Self::InvalidLengthRelation => "IM0102",
            Self::InvalidRelation => "IM0103",
            Self::InvalidRelationInScenario => "IM0104",
            Self::DuplicateRelation => "IM0105",
            Self::InvalidCallback => "IM0106",
            Self::InvalidDefaultValue => "IM0107",
            Self::NonPortableAlignment => "IM0201",
            Self::UnknownArrayDimension => "IM0202",
            Self::UnknownBase => "IM0203",
            Self::CyclicAggregate => "IM0204",
            Self::AmbiguousProperty => "IM0301",
            Self::InvalidInnerInterfaceRule => "IM0302",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Self::UnknownArrayDimension | Self::AmbiguousProperty => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// A single structured record: stable code, severity, message and the
/// element it originated from (`Aggregate::field`, `Interface::Method`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub location: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, location: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            location: location.to_string(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]: {}", self.code, self.severity, self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = [
            DiagnosticCode::UnknownType,
            DiagnosticCode::InvalidLengthRelation,
            DiagnosticCode::InvalidRelation,
            DiagnosticCode::InvalidRelationInScenario,
            DiagnosticCode::DuplicateRelation,
            DiagnosticCode::InvalidCallback,
            DiagnosticCode::InvalidDefaultValue,
            DiagnosticCode::NonPortableAlignment,
            DiagnosticCode::UnknownArrayDimension,
            DiagnosticCode::UnknownBase,
            DiagnosticCode::CyclicAggregate,
            DiagnosticCode::AmbiguousProperty,
            DiagnosticCode::InvalidInnerInterfaceRule,
        ];
        let mut seen = std::collections::HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code);
        }
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(DiagnosticCode::UnknownType, "Test::field", "no binding for `foo`");
        assert_eq!(diagnostic.to_string(), "IM0101 error [Test::field]: no binding for `foo`");
        assert!(diagnostic.is_error());
    }

    #[test]
    fn test_unknown_dimension_is_warning() {
        let diagnostic = Diagnostic::new(DiagnosticCode::UnknownArrayDimension, "Test::data", "unknown");
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert!(!diagnostic.is_error());
    }
}
