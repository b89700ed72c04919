// Tue Oct 13 2026 - Alex

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub fatal_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl ReportSummary {
    fn add(&mut self, diagnostic: &Diagnostic) {
        self.total += 1;
        match diagnostic.severity {
            Severity::Fatal => self.fatal_count += 1,
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => self.info_count += 1,
        }
    }
}

/// Immutable snapshot of a run's diagnostics, handed to the emitter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReportSummary,
}

impl DiagnosticReport {
    pub fn from_sink(sink: DiagnosticSink) -> Self {
        let mut report = Self::default();
        for diagnostic in sink.into_records() {
            report.summary.add(&diagnostic);
            report.diagnostics.push(diagnostic);
        }
        report
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.summary.error_count == 0 && self.summary.fatal_count == 0
    }

    pub fn format_report(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Diagnostic Report ===\n");
        output.push_str(&format!("  Fatal: {}\n", self.summary.fatal_count));
        output.push_str(&format!("  Errors: {}\n", self.summary.error_count));
        output.push_str(&format!("  Warnings: {}\n", self.summary.warning_count));
        output.push_str(&format!("  Info: {}\n", self.summary.info_count));

        if !self.diagnostics.is_empty() {
            output.push_str("\nDiagnostics:\n");
            for diagnostic in &self.diagnostics {
                output.push_str(&format!("  {}\n", diagnostic));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    #[test]
    fn test_report_from_sink() {
        let mut sink = DiagnosticSink::new();
        sink.error(DiagnosticCode::NonPortableAlignment, "Test", "offsets differ");
        sink.warning(DiagnosticCode::UnknownArrayDimension, "Test::data", "unknown");

        let report = DiagnosticReport::from_sink(sink);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert!(!report.is_clean());
        assert!(report.format_report().contains("IM0201 error [Test]"));
    }
}
