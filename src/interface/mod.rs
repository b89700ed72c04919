// Mon Oct 12 2026 - Alex

pub mod dual;
pub mod error;
pub mod guid;
pub mod inner;
pub mod mapper;
pub mod method;
pub mod overloads;
pub mod property;
pub mod target;
pub mod vtable;

pub use dual::native_shadow;
pub use error::InterfaceError;
pub use guid::{iid_key, GuidResolver};
pub use inner::{InnerInterfaceRouter, InnerInterfaceRule};
pub use mapper::InterfaceMapper;
pub use method::{CallableSignature, MethodKind, TargetFunction, TargetMethod, TargetParameter};
pub use overloads::{interface_array_wrapper, special_overloads};
pub use property::{PropertySynthesizer, TargetProperty};
pub use target::{InnerAccess, InterfaceId, TargetInterface};
pub use vtable::{PlatformDetection, SlotTotals, VTableBuilder, VTableEntry, VTableLayout, VtableOffset};
