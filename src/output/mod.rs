// Mon Oct 12 2026 - Alex

pub mod json;
pub mod report;

pub use json::{to_json_file, to_json_string, JsonError, JsonExporter};
pub use report::ReportRenderer;
