// Mon Oct 12 2026 - Alex

pub mod code;
pub mod report;
pub mod sink;

pub use code::{Diagnostic, DiagnosticCode, Severity};
pub use report::{DiagnosticReport, ReportSummary};
pub use sink::{DiagnosticLogger, DiagnosticSink, LogForwarder};
