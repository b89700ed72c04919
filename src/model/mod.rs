// Mon Oct 12 2026 - Alex

pub mod aggregate;
pub mod directives;
pub mod field;
pub mod function;
pub mod interface;
pub mod tree;

pub use aggregate::SourceAggregate;
pub use directives::{
    AggregateRule, Directives, FieldRule, InterfaceRule, MethodRule, ParameterRule, Visibility,
};
pub use field::{BitfieldDecl, SourceField};
pub use function::{SourceFunction, SourceParameter, SourceReturn, ParamDirection};
pub use interface::{SourceInterface, SourceMethod};
pub use tree::{DeclarationTree, SourceEnum};
