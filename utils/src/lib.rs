//! Shared utilities for the jury arbitration engine.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat, LoggingError};
pub use time::{format_duration, format_until};
