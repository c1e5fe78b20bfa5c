//! ObservabilityLogger backed by the `tracing` crate.
//!
//! Every call becomes one `tracing` event at the matching level. The
//! message is the event message; the level's value list is rendered into a
//! JSON object recorded under `fields`. The `*_context` variants also
//! record `trace_id` and `span_id` when the context carries a valid span.

use opentelemetry::Context;
use opentelemetry::trace::TraceContextExt;
use tracelog_core::{Level, LogValues, ObservabilityLogger};

use crate::field::{Field, render_fields};

/// Emits [`LogValues`] of [`Field`]s as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, level: Level, cx: Option<&Context>, lv: &LogValues<Field>) {
        let fields = render_fields(lv.values_for(level));
        let ids = cx.and_then(span_ids);
        let trace_id = ids.as_ref().map(|(trace_id, _)| trace_id.as_str());
        let span_id = ids.as_ref().map(|(_, span_id)| span_id.as_str());

        match level {
            Level::Debug => tracing::debug!(fields = %fields, trace_id, span_id, "{}", lv.msg()),
            Level::Info => tracing::info!(fields = %fields, trace_id, span_id, "{}", lv.msg()),
            Level::Error => tracing::error!(fields = %fields, trace_id, span_id, "{}", lv.msg()),
        }
    }
}

/// Trace and span id of the span in `cx`, if it is valid.
fn span_ids(cx: &Context) -> Option<(String, String)> {
    let span = cx.span();
    let span_context = span.span_context();
    span_context.is_valid().then(|| {
        (
            span_context.trace_id().to_string(),
            span_context.span_id().to_string(),
        )
    })
}

impl ObservabilityLogger<Field> for TracingLogger {
    fn log_info(&self, lv: &LogValues<Field>) {
        self.emit(Level::Info, None, lv);
    }

    fn log_debug(&self, lv: &LogValues<Field>) {
        self.emit(Level::Debug, None, lv);
    }

    fn log_error(&self, lv: &LogValues<Field>) {
        self.emit(Level::Error, None, lv);
    }

    fn log_info_context(&self, cx: &Context, lv: &LogValues<Field>) {
        self.emit(Level::Info, Some(cx), lv);
    }

    fn log_debug_context(&self, cx: &Context, lv: &LogValues<Field>) {
        self.emit(Level::Debug, Some(cx), lv);
    }

    fn log_error_context(&self, cx: &Context, lv: &LogValues<Field>) {
        self.emit(Level::Error, Some(cx), lv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{self, ObservedLogs};
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };
    use serde_json::json;
    use tracelog_core::LogValuesBuilder;
    use tracing_subscriber::layer::SubscriberExt;

    fn arrange() -> LogValues<Field> {
        let field = Field::string("foo", "bar");
        LogValuesBuilder::new()
            .with_info_value(field.clone())
            .with_debug_value(field.clone())
            .with_error_value(field)
            .with_msg("test message")
            .build()
    }

    fn capture(f: impl FnOnce(&TracingLogger)) -> ObservedLogs {
        let (layer, logs) = observer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || f(&TracingLogger::new()));
        logs
    }

    fn remote_context() -> Context {
        let span_context = SpanContext::new(
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
            SpanId::from_hex("b7ad6b7169203331").unwrap(),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );
        Context::new().with_remote_span_context(span_context)
    }

    fn assert_single(logs: &ObservedLogs, level: tracing::Level) {
        let events = logs.all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, level);
        assert_eq!(events[0].message, "test message");
        assert_eq!(events[0].json_fields(), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn log_info_emits_info_event() {
        let lv = arrange();
        let logs = capture(|logger| logger.log_info(&lv));
        assert_single(&logs, tracing::Level::INFO);
        assert_eq!(logs.all()[0].field("trace_id"), None);
    }

    #[test]
    fn log_debug_emits_debug_event() {
        let lv = arrange();
        let logs = capture(|logger| logger.log_debug(&lv));
        assert_single(&logs, tracing::Level::DEBUG);
    }

    #[test]
    fn log_error_emits_error_event() {
        let lv = arrange();
        let logs = capture(|logger| logger.log_error(&lv));
        assert_single(&logs, tracing::Level::ERROR);
    }

    #[test]
    fn log_info_context_records_span_ids() {
        let lv = arrange();
        let cx = remote_context();
        let logs = capture(|logger| logger.log_info_context(&cx, &lv));

        assert_single(&logs, tracing::Level::INFO);
        let event = &logs.all()[0];
        assert_eq!(
            event.field("trace_id"),
            Some("0af7651916cd43dd8448eb211c80319c")
        );
        assert_eq!(event.field("span_id"), Some("b7ad6b7169203331"));
    }

    #[test]
    fn log_debug_context_emits_debug_event() {
        let lv = arrange();
        let cx = remote_context();
        let logs = capture(|logger| logger.log_debug_context(&cx, &lv));
        assert_single(&logs, tracing::Level::DEBUG);
    }

    #[test]
    fn log_error_context_without_span_omits_ids() {
        let lv = arrange();
        let cx = Context::new();
        let logs = capture(|logger| logger.log_error_context(&cx, &lv));

        assert_single(&logs, tracing::Level::ERROR);
        assert_eq!(logs.all()[0].field("span_id"), None);
    }

    #[test]
    fn only_matching_level_values_are_emitted() {
        let lv = LogValuesBuilder::new()
            .with_msg("mixed")
            .with_info_value(Field::string("visible", "yes"))
            .with_debug_value(Field::string("hidden", "no"))
            .build();
        let logs = capture(|logger| logger.log_info(&lv));

        assert_eq!(logs.all()[0].json_fields(), Some(json!({"visible": "yes"})));
    }
}
