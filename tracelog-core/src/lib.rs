//! Leveled log payloads correlated with OpenTelemetry spans.
//!
//! This crate provides:
//! - Builders that assemble a message, an error and per-level attributes
//!   into an immutable [`LogValues`]
//! - The [`ObservabilityLogger`] trait implemented by logging backends
//! - [`ObservabilityContext`], which records each log call on the active
//!   span and forwards it to the injected logger

pub mod builder;
pub mod context;
pub mod error;
pub mod logger;
pub mod options;
pub mod testing;
pub mod values;

pub use builder::LogBuilder;
pub use context::{
    ObservabilityContext, ObservabilityHandler, ObservabilityLogging, SpanShutdown, TraceValues,
};
pub use error::{ObservabilityError, ObservabilityResult};
pub use logger::ObservabilityLogger;
pub use options::{Level, LogValueOption, LogValuesOptions};
pub use values::{LogValues, LogValuesBuilder, SharedError};
