// Mon Oct 12 2026 - Alex

pub mod callable;
pub mod context;
pub mod default_init;
pub mod error;
pub mod marshallers;
pub mod native_struct;
pub mod registry;
pub mod shape;
pub mod statement;
pub mod subject;

pub use callable::{CallablePlan, CallablePlanner};
pub use context::{local_name, native_struct_name, MarshalContext, MarshalScope};
pub use default_init::{DefaultConstructorPlan, DefaultConstructorPlanner, DefaultInit};
pub use error::MarshalError;
pub use marshallers::Marshaller;
pub use native_struct::{NativeMember, NativeStructPlan, NativeStructPlanner};
pub use registry::MarshallerRegistry;
pub use shape::MarshalShape;
pub use statement::{
    render, CallTarget, Condition, MarshalStatement, PinScope, Place, StructMarshalMethod, Value,
};
pub use subject::Marshallable;
