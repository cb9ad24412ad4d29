//! Logging infrastructure for apispec-tools.
//!
//! Sets up `tracing-subscriber` with JSON or pretty output and defines the
//! standard event names and `log_*!` helper macros used across the crates.
//!
//! # Usage
//!
//! ```ignore
//! use apispec_telemetry::{LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Pretty);
//!
//! apispec_telemetry::init_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, LogWriter, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed, or the filter is invalid.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
