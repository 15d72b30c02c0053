//! # octi-observability
//!
//! Structured logging for the OpenCTI connector tools.
//!
//! Logs go to stderr so that operation results on stdout stay machine
//! readable.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig, LoggingError};
