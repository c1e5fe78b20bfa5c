//! Handlers wired to the tracing backend.

use std::borrow::Cow;
use std::sync::Arc;

use opentelemetry::Context;
use tracelog_core::{ObservabilityContext, ObservabilityLogger};

use crate::field::Field;
use crate::logger::TracingLogger;

/// Create a handler logging through [`TracingLogger`], with spans from the
/// globally installed tracer provider.
pub fn new_handler(
    cx: Context,
    service_name: impl Into<Cow<'static, str>>,
) -> ObservabilityContext<Field> {
    ObservabilityContext::new(cx, service_name, tracing_logger())
}

/// Like [`new_handler`], but spans are started with `tracer`.
pub fn new_handler_with_tracer<S>(
    cx: Context,
    service_name: impl Into<Cow<'static, str>>,
    tracer: S,
) -> ObservabilityContext<Field, S> {
    ObservabilityContext::with_tracer(cx, service_name, tracer, tracing_logger())
}

fn tracing_logger() -> Arc<dyn ObservabilityLogger<Field>> {
    Arc::new(TracingLogger::new())
}
