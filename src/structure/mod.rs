// Mon Oct 12 2026 - Alex

pub mod alignment;
pub mod bitfield;
pub mod engine;
pub mod error;
pub mod field;
pub mod layout;
pub mod offset;
pub mod size;
pub mod table;
pub mod validator;

pub use alignment::Alignment;
pub use bitfield::{BitPlacement, BitfieldAllocator};
pub use engine::{ComputedLayout, FieldPlacement, LayoutEngine, LayoutResult};
pub use error::LayoutError;
pub use field::TargetField;
pub use layout::{LayoutMetrics, TargetAggregate};
pub use offset::Offset;
pub use size::Size;
pub use table::{AggregateId, AggregateTable};
pub use validator::PortabilityValidator;
