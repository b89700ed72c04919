// Mon Oct 12 2026 - Alex

pub mod array_spec;
pub mod callback;
pub mod error;
pub mod relation;
pub mod resolver;
pub mod table;
pub mod type_info;

pub use array_spec::{ArrayKind, ArraySpecification};
pub use callback::{parse_callback, CallbackDescriptor};
pub use error::{CallbackParseError, RelationParseError, ResolveError};
pub use relation::{parse_relations, Relation};
pub use resolver::TypeResolver;
pub use table::BindingTable;
pub use type_info::{PrimitiveType, TargetType};
