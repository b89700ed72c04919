// Mon Oct 12 2026 - Alex

pub mod coordinator;
pub mod error;
pub mod input;

pub use coordinator::{GenerationRun, RunOutcome, TargetModel};
pub use error::RunError;
pub use input::RunInput;
