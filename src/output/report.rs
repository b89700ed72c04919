// Mon Oct 12 2026 - Alex

use crate::diagnostics::{Diagnostic, DiagnosticReport, Severity};
use crate::orchestration::RunOutcome;
use colored::Colorize;
use itertools::Itertools;

/// Human-readable run summary for the terminal.
pub struct ReportRenderer {
    color_enabled: bool,
    include_details: bool,
    max_items: Option<usize>,
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self {
            color_enabled: true,
            include_details: true,
            max_items: None,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.color_enabled = false;
        self
    }

    pub fn with_details(mut self, include: bool) -> Self {
        self.include_details = include;
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn render(&self, outcome: &RunOutcome) -> String {
        let mut report = String::new();
        report.push_str(&self.header("SUMMARY"));
        report.push_str(&format!("Aggregates:    {:>6}\n", outcome.model.aggregates.len()));
        report.push_str(&format!("Interfaces:    {:>6}\n", outcome.model.interfaces.len()));
        report.push_str(&format!("Functions:     {:>6}\n", outcome.model.functions.len()));
        report.push_str(&format!(
            "Shadowed:      {:>6}\n",
            outcome.model.aggregates.iter().filter(|a| a.needs_native_shadow).count()
        ));
        report.push('\n');
        report.push_str(&self.render_diagnostics(&outcome.report));
        report
    }

    pub fn render_diagnostics(&self, report: &DiagnosticReport) -> String {
        let mut text = self.header("DIAGNOSTICS");
        let summary = &report.summary;
        text.push_str(&format!(
            "{} fatal, {} errors, {} warnings\n",
            self.paint(&summary.fatal_count.to_string(), Severity::Fatal),
            self.paint(&summary.error_count.to_string(), Severity::Error),
            self.paint(&summary.warning_count.to_string(), Severity::Warning),
        ));

        if !self.include_details || report.diagnostics.is_empty() {
            return text;
        }

        let grouped = report
            .diagnostics
            .iter()
            .sorted_by_key(|d| std::cmp::Reverse(d.severity))
            .chunk_by(|d| d.severity);
        for (severity, group) in &grouped {
            let items: Vec<&Diagnostic> = match self.max_items {
                Some(max) => group.take(max).collect(),
                None => group.collect(),
            };
            for diagnostic in items {
                text.push_str(&format!(
                    "  {} {} [{}] {}\n",
                    self.paint(&severity.to_string(), severity),
                    diagnostic.code,
                    diagnostic.location,
                    diagnostic.message
                ));
            }
        }
        text
    }

    fn header(&self, title: &str) -> String {
        let rule = "-".repeat(title.len());
        if self.color_enabled {
            format!("{}\n{}\n", title.cyan().bold(), rule.cyan())
        } else {
            format!("{}\n{}\n", title, rule)
        }
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match severity {
            Severity::Fatal => text.red().bold().to_string(),
            Severity::Error => text.red().to_string(),
            Severity::Warning => text.yellow().to_string(),
            Severity::Info => text.green().to_string(),
        }
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, DiagnosticSink};

    fn report() -> DiagnosticReport {
        let mut sink = DiagnosticSink::new();
        sink.warning(DiagnosticCode::UnknownArrayDimension, "Blob::data", "no dimension");
        sink.error(DiagnosticCode::UnknownType, "Blob::kind", "no binding for KIND");
        sink.error(DiagnosticCode::UnknownBase, "Derived", "no base");
        DiagnosticReport::from_sink(sink)
    }

    #[test]
    fn test_errors_listed_before_warnings() {
        let text = ReportRenderer::new().without_colors().render_diagnostics(&report());
        assert!(text.contains("0 fatal, 2 errors, 1 warnings"));
        let error = text.find("IM0101").unwrap();
        let warning = text.find("IM0202").unwrap();
        assert!(error < warning);
    }

    #[test]
    fn test_item_cap_applies_per_severity() {
        let text = ReportRenderer::new()
            .without_colors()
            .with_max_items(1)
            .render_diagnostics(&report());
        assert_eq!(text.matches("  error ").count(), 1);
        assert_eq!(text.matches("  warning ").count(), 1);
    }

    #[test]
    fn test_summary_only() {
        let text = ReportRenderer::new()
            .without_colors()
            .with_details(false)
            .render_diagnostics(&report());
        assert!(!text.contains("IM0101"));
    }
}
