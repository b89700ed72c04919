// Mon Oct 12 2026 - Alex

use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};

const DIAGNOSTICS_TARGET: &str = "interop_mapper::diagnostics";

/// Receives every record pushed into a [`DiagnosticSink`].
pub trait DiagnosticLogger {
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Forwards records to the `log` facade at the level matching their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogForwarder;

impl DiagnosticLogger for LogForwarder {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Fatal | Severity::Error => log::error!(target: DIAGNOSTICS_TARGET, "{}", diagnostic),
            Severity::Warning => log::warn!(target: DIAGNOSTICS_TARGET, "{}", diagnostic),
            Severity::Info => log::info!(target: DIAGNOSTICS_TARGET, "{}", diagnostic),
        }
    }
}

/// Run-scoped accumulator. Errors never stop sibling processing; they land
/// here and the run reports the totals at the end.
pub struct DiagnosticSink {
    records: Vec<Diagnostic>,
    logger: Box<dyn DiagnosticLogger>,
    max_records: usize,
    total: usize,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            logger: Box::new(LogForwarder),
            max_records: 1000,
            total: 0,
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn DiagnosticLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.total += 1;
        match diagnostic.severity {
            Severity::Fatal | Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => {}
        }

        self.logger.emit(&diagnostic);

        if self.records.len() < self.max_records {
            self.records.push(diagnostic);
        }
    }

    pub fn error(&mut self, code: DiagnosticCode, location: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(code, location, message).with_severity(Severity::Error));
    }

    pub fn warning(&mut self, code: DiagnosticCode, location: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(code, location, message).with_severity(Severity::Warning));
    }

    pub fn fatal(&mut self, code: DiagnosticCode, location: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(code, location, message).with_severity(Severity::Fatal));
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.total
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn count_of(&self, code: DiagnosticCode) -> usize {
        self.records.iter().filter(|d| d.code == code).count()
    }

    pub fn summary(&self) -> String {
        match self.total {
            0 => "No diagnostics reported".to_string(),
            1 => "1 diagnostic reported".to_string(),
            n if n > self.max_records => format!("{} diagnostics reported (truncated at {})", n, self.max_records),
            n => format!("{} diagnostics reported", n),
        }
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording(Rc<RefCell<Vec<String>>>);

    impl DiagnosticLogger for Recording {
        fn emit(&mut self, diagnostic: &Diagnostic) {
            self.0.borrow_mut().push(diagnostic.code.code().to_string());
        }
    }

    #[test]
    fn test_sink_counts_by_severity() {
        let mut sink = DiagnosticSink::new();
        sink.error(DiagnosticCode::UnknownType, "A::x", "missing");
        sink.warning(DiagnosticCode::UnknownArrayDimension, "A::y", "unknown");

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 1);
        assert!(sink.has_errors());
        assert_eq!(sink.count_of(DiagnosticCode::UnknownType), 1);
    }

    #[test]
    fn test_sink_forwards_to_injected_logger() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sink = DiagnosticSink::new().with_logger(Box::new(Recording(seen.clone())));
        sink.error(DiagnosticCode::InvalidRelation, "A::x", "bad");

        assert_eq!(seen.borrow().as_slice(), ["IM0103"]);
    }

    #[test]
    fn test_sink_truncates_records_but_keeps_count() {
        let mut sink = DiagnosticSink::new().with_max_records(1);
        sink.error(DiagnosticCode::UnknownType, "A::x", "one");
        sink.error(DiagnosticCode::UnknownType, "A::y", "two");

        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.count(), 2);
        assert_eq!(sink.summary(), "2 diagnostics reported (truncated at 1)");
    }
}
