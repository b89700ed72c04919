// Mon Oct 12 2026 - Alex

pub mod logging;

pub use logging::{init_from_env, init_logger, ColoredLogger, LoggingUtils, ScopedTimer};
