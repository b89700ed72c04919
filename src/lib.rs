// Mon Oct 12 2026 - Alex

pub mod binding;
pub mod config;
pub mod diagnostics;
pub mod interface;
pub mod marshal;
pub mod model;
pub mod orchestration;
pub mod output;
pub mod structure;
pub mod utils;

pub use binding::{BindingTable, TargetType, TypeResolver};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticReport, DiagnosticSink, Severity};
pub use interface::{InterfaceMapper, TargetInterface};
pub use marshal::{MarshalShape, MarshallerRegistry};
pub use model::{DeclarationTree, Directives};
pub use orchestration::{GenerationRun, RunError, RunInput, RunOutcome, TargetModel};
pub use output::{JsonExporter, ReportRenderer};
pub use structure::{AggregateTable, LayoutEngine, TargetAggregate};
