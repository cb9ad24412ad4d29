//! Structured logging with JSON or pretty output.

use crate::{LogFormat, LogWriter, TelemetryConfig, TelemetryError};
use tracing_subscriber::{
    fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
    Layer,
};

/// Initialize the global subscriber.
///
/// `RUST_LOG` overrides the configured level. Fails if a subscriber is
/// already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter, make_writer(config.writer)),
        LogFormat::Pretty => init_pretty_logging(filter, make_writer(config.writer)),
    }
}

fn make_writer(writer: LogWriter) -> BoxMakeWriter {
    match writer {
        LogWriter::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogWriter::Stderr => BoxMakeWriter::new(std::io::stderr),
    }
}

fn init_json_logging(filter: EnvFilter, writer: BoxMakeWriter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter, writer: BoxMakeWriter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// Server is starting up.
    pub const STARTUP: &str = "startup";

    /// Server is listening on an address.
    pub const LISTENING: &str = "listening";

    /// A spec snapshot was built.
    pub const SPEC_BUILT: &str = "spec_built";

    /// A served response is not documented in the spec.
    pub const VALIDATION_FAILURE: &str = "validation_failure";

    /// A documentation file was written.
    pub const DOCS_WRITTEN: &str = "docs_written";

    /// An overwrite was declined.
    pub const OVERWRITE_ABORTED: &str = "overwrite_aborted";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_listening {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::LISTENING,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_spec_built {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::SPEC_BUILT,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_failure {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::VALIDATION_FAILURE,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_docs_written {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::DOCS_WRITTEN,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_overwrite_aborted {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::OVERWRITE_ABORTED,
            $($field)*
        )
    };
}
