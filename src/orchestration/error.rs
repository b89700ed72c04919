// Mon Oct 12 2026 - Alex

use crate::interface::InterfaceError;
use thiserror::Error;

/// Failures that abort a whole generation run. Everything else is a diagnostic.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("interface mapping could not start: {0}")]
    Interface(#[from] InterfaceError),
    #[error("failed to read input: {0}")]
    Input(String),
}
