//! Span correlation for log calls.
//!
//! This module provides:
//! - `ObservabilityContext`, which owns a span and fans each log call out
//!   to the span (event or recorded error) and to an injected logger
//! - `ObservabilityLogging` / `ObservabilityHandler`, the traits it exposes
//! - Standard attribute names attached to span events
//!
//! A context is meant for one logical operation (one request, one job) and
//! is used sequentially. It is `Send`, so it can travel across await
//! points, but sharing one between threads needs external locking.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::SystemTime;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{SpanBuilder, SpanRef, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use serde::{Deserialize, Serialize};

use crate::builder::LogBuilder;
use crate::error::{ObservabilityError, ObservabilityResult};
use crate::logger::ObservabilityLogger;
use crate::values::LogValues;

/// Attribute and event names used on spans.
pub mod attributes {
    pub const TRACE_ID: &str = "traceId";
    pub const SPAN_ID: &str = "spanId";
    /// Name handed to the tracing format setup function.
    pub const TRACING: &str = "tracing";
    pub const EXCEPTION_EVENT: &str = "exception";
    pub const EXCEPTION_MESSAGE: &str = "exception.message";
}

/// Identifiers of the active span, as lowercase hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceValues {
    pub trace_id: String,
    pub span_id: String,
}

/// Ends the span returned alongside it by `start_span`.
#[must_use = "the span stays open until `end` is called"]
#[derive(Debug)]
pub struct SpanShutdown {
    cx: Context,
}

impl SpanShutdown {
    pub fn end(self) {
        self.cx.span().end();
    }

    pub fn end_with_timestamp(self, timestamp: SystemTime) {
        self.cx.span().end_with_timestamp(timestamp);
    }
}

/// Log operations correlated with a span.
///
/// Every call fails with [`ObservabilityError::SpanNotStarted`] until a
/// span has been started; in that case nothing is recorded or logged.
pub trait ObservabilityLogging<T> {
    /// Create a factory for log values of type `T`.
    ///
    /// Once a span is started and the tracing format is set, builders from
    /// the returned factory start with the tracing format at every level.
    fn create_log_builder(&self) -> LogBuilder<T>;

    /// Add a span event named after the message, then log at info.
    fn log_info(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()>;

    /// Record the carried error on the span, then log at error.
    fn log_error(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()>;

    /// Add a span event named after the message, then log at debug.
    fn log_debug(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()>;

    /// Like [`log_info`](Self::log_info), passing the held context to the logger.
    fn log_info_context(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()>;

    /// Like [`log_error`](Self::log_error), passing the held context to the logger.
    fn log_error_context(
        &self,
        lv: &LogValues<T>,
        attrs: &[KeyValue],
    ) -> ObservabilityResult<()>;

    /// Like [`log_debug`](Self::log_debug), passing the held context to the logger.
    fn log_debug_context(
        &self,
        lv: &LogValues<T>,
        attrs: &[KeyValue],
    ) -> ObservabilityResult<()>;
}

/// Span lifecycle plus correlated logging.
pub trait ObservabilityHandler<T>: ObservabilityLogging<T> {
    /// Start a span named `name` as a child of the held context.
    ///
    /// Returns the updated context and a handle that ends the span. A
    /// previously started span is not ended.
    fn start_span(&mut self, name: impl Into<Cow<'static, str>>) -> (Context, SpanShutdown) {
        self.start_span_with(SpanBuilder::from_name(name))
    }

    /// Start a span from a fully configured builder.
    fn start_span_with(&mut self, builder: SpanBuilder) -> (Context, SpanShutdown);

    /// Identifiers of the current span.
    fn trace_values(&self) -> ObservabilityResult<TraceValues>;

    /// Store the value injected into every builder from
    /// [`create_log_builder`](ObservabilityLogging::create_log_builder).
    ///
    /// `setup` receives the field name `"tracing"` and the current trace
    /// values. Succeeds at most once per context.
    fn set_tracing_format<F>(&mut self, setup: F) -> ObservabilityResult<()>
    where
        F: FnOnce(&str, &TraceValues) -> T;
}

/// Owns a span, an injected logger and the one-time tracing format.
pub struct ObservabilityContext<T, S = BoxedTracer> {
    service_name: Cow<'static, str>,
    cx: Context,
    tracer: S,
    logger: Arc<dyn ObservabilityLogger<T>>,
    /// Some once a span has been started
    trace_values: Option<TraceValues>,
    tracing_format: Option<T>,
    /// traceId/spanId of the current span, prepended to every span event
    trace_attributes: Vec<KeyValue>,
}

impl<T> ObservabilityContext<T> {
    /// Create a context using the globally installed tracer provider.
    pub fn new(
        cx: Context,
        service_name: impl Into<Cow<'static, str>>,
        logger: Arc<dyn ObservabilityLogger<T>>,
    ) -> Self {
        let service_name = service_name.into();
        let tracer = global::tracer(service_name.clone());
        Self::with_tracer(cx, service_name, tracer, logger)
    }
}

impl<T, S> ObservabilityContext<T, S> {
    /// Create a context that starts its spans with `tracer`.
    pub fn with_tracer(
        cx: Context,
        service_name: impl Into<Cow<'static, str>>,
        tracer: S,
        logger: Arc<dyn ObservabilityLogger<T>>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            cx,
            tracer,
            logger,
            trace_values: None,
            tracing_format: None,
            trace_attributes: Vec::new(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The held context; carries the current span once one is started.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn is_started(&self) -> bool {
        self.trace_values.is_some()
    }

    pub fn tracing_format(&self) -> Option<&T> {
        self.tracing_format.as_ref()
    }

    fn active_span(&self) -> ObservabilityResult<SpanRef<'_>> {
        if self.trace_values.is_none() {
            return Err(ObservabilityError::SpanNotStarted);
        }
        Ok(self.cx.span())
    }

    fn event_attributes(&self, attrs: &[KeyValue]) -> Vec<KeyValue> {
        self.trace_attributes.iter().chain(attrs).cloned().collect()
    }

    fn add_event(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        let span = self.active_span()?;
        span.add_event(lv.msg().to_string(), self.event_attributes(attrs));
        Ok(())
    }

    fn record_error(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        let span = self.active_span()?;
        // No error, nothing to record on the span.
        let Some(err) = lv.err() else {
            return Ok(());
        };

        let message = err.to_string();
        let mut event_attrs = vec![KeyValue::new(
            attributes::EXCEPTION_MESSAGE,
            message.clone(),
        )];
        event_attrs.extend(self.event_attributes(attrs));

        span.add_event(attributes::EXCEPTION_EVENT, event_attrs);
        span.set_status(Status::error(message));
        Ok(())
    }
}

impl<T, S> ObservabilityLogging<T> for ObservabilityContext<T, S>
where
    T: Clone,
{
    fn create_log_builder(&self) -> LogBuilder<T> {
        match (&self.trace_values, &self.tracing_format) {
            (Some(_), Some(format)) => LogBuilder::with_seed(format.clone()),
            _ => LogBuilder::new(),
        }
    }

    fn log_info(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        self.add_event(lv, attrs)?;
        self.logger.log_info(lv);
        Ok(())
    }

    fn log_error(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        self.record_error(lv, attrs)?;
        self.logger.log_error(lv);
        Ok(())
    }

    fn log_debug(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        self.add_event(lv, attrs)?;
        self.logger.log_debug(lv);
        Ok(())
    }

    fn log_info_context(&self, lv: &LogValues<T>, attrs: &[KeyValue]) -> ObservabilityResult<()> {
        self.add_event(lv, attrs)?;
        self.logger.log_info_context(&self.cx, lv);
        Ok(())
    }

    fn log_error_context(
        &self,
        lv: &LogValues<T>,
        attrs: &[KeyValue],
    ) -> ObservabilityResult<()> {
        self.record_error(lv, attrs)?;
        self.logger.log_error_context(&self.cx, lv);
        Ok(())
    }

    fn log_debug_context(
        &self,
        lv: &LogValues<T>,
        attrs: &[KeyValue],
    ) -> ObservabilityResult<()> {
        self.add_event(lv, attrs)?;
        self.logger.log_debug_context(&self.cx, lv);
        Ok(())
    }
}

impl<T, S> ObservabilityHandler<T> for ObservabilityContext<T, S>
where
    T: Clone,
    S: Tracer,
    S::Span: Send + Sync + 'static,
{
    fn start_span_with(&mut self, builder: SpanBuilder) -> (Context, SpanShutdown) {
        let span = self.tracer.build_with_context(builder, &self.cx);
        self.cx = self.cx.with_span(span);

        let span_context = self.cx.span().span_context().clone();
        let values = TraceValues {
            trace_id: span_context.trace_id().to_string(),
            span_id: span_context.span_id().to_string(),
        };

        self.trace_attributes = vec![
            KeyValue::new(attributes::TRACE_ID, values.trace_id.clone()),
            KeyValue::new(attributes::SPAN_ID, values.span_id.clone()),
        ];

        tracing::debug!(
            service = %self.service_name,
            trace_id = %values.trace_id,
            span_id = %values.span_id,
            "span started"
        );
        self.trace_values = Some(values);

        let shutdown = SpanShutdown {
            cx: self.cx.clone(),
        };
        (self.cx.clone(), shutdown)
    }

    fn trace_values(&self) -> ObservabilityResult<TraceValues> {
        self.trace_values
            .clone()
            .ok_or(ObservabilityError::SpanNotStarted)
    }

    fn set_tracing_format<F>(&mut self, setup: F) -> ObservabilityResult<()>
    where
        F: FnOnce(&str, &TraceValues) -> T,
    {
        if self.tracing_format.is_some() {
            return Err(ObservabilityError::TracingFormatAlreadySet);
        }

        let trace_values = self.trace_values.clone().unwrap_or_else(|| {
            tracing::warn!(
                service = %self.service_name,
                "tracing format set before a span was started, trace ids will be empty"
            );
            TraceValues::default()
        });

        self.tracing_format = Some(setup(attributes::TRACING, &trace_values));
        Ok(())
    }
}
