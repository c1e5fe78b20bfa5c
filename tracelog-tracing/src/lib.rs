//! tracing backend for tracelog.
//!
//! This crate provides:
//! - [`Field`], the structured attribute type used with the backend
//! - [`TracingLogger`], an `ObservabilityLogger` emitting `tracing` events
//! - [`new_handler`], a handler already wired to [`TracingLogger`]
//! - An observer layer capturing events for assertions
//! - Subscriber and tracer provider initialization

pub mod field;
pub mod handler;
pub mod init;
pub mod logger;
pub mod observer;

pub use field::{Field, FieldValue, render_fields, trace_group};
pub use handler::{new_handler, new_handler_with_tracer};
pub use init::{ExportTarget, LogFormat, TracerConfig, TracerError, TracingGuard, init_tracing};
pub use logger::TracingLogger;
