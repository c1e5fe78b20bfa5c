//! Event capture for tests.
//!
//! Provides a tracing subscriber layer that keeps every event it sees so
//! tests can assert on level, message and fields of emitted logs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// An event captured by [`ObserverLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedEvent {
    pub level: Level,
    pub target: String,
    /// Formatted message
    pub message: String,
    /// Every other field, rendered as text
    pub fields: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl ObservedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The `fields` attribute written by [`TracingLogger`](crate::TracingLogger), parsed.
    pub fn json_fields(&self) -> Option<serde_json::Value> {
        self.field("fields")
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Shared handle to the events captured by an [`ObserverLayer`].
#[derive(Debug, Clone, Default)]
pub struct ObservedLogs {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl ObservedLogs {
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All captured events, oldest first.
    pub fn all(&self) -> Vec<ObservedEvent> {
        self.lock().clone()
    }

    /// Drain the captured events.
    pub fn take_all(&self) -> Vec<ObservedEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Captured events at exactly `level`.
    pub fn filter_level(&self, level: Level) -> Vec<ObservedEvent> {
        self.lock()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ObservedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A tracing layer that records events into an [`ObservedLogs`].
pub struct ObserverLayer {
    logs: ObservedLogs,
    max_level: Level,
}

/// Create a layer capturing every event, and the handle to read them.
pub fn new() -> (ObserverLayer, ObservedLogs) {
    with_max_level(Level::TRACE)
}

/// Create a layer capturing events at `max_level` or more severe.
pub fn with_max_level(max_level: Level) -> (ObserverLayer, ObservedLogs) {
    let logs = ObservedLogs::default();
    let layer = ObserverLayer {
        logs: logs.clone(),
        max_level,
    };
    (layer, logs)
}

impl<S> Layer<S> for ObserverLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering: TRACE is the greatest.
        if *metadata.level() > self.max_level {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        let message = fields.remove("message").unwrap_or_default();

        self.logs.push(ObservedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message,
            fields,
            timestamp: Utc::now(),
        });
    }
}

/// Visitor for collecting event fields into a HashMap.
struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn captures_level_message_and_fields() {
        let (layer, logs) = new();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(user = "alice", attempts = 3u64, "signed in");
        });

        let events = logs.all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].message, "signed in");
        assert_eq!(events[0].field("user"), Some("alice"));
        assert_eq!(events[0].field("attempts"), Some("3"));
    }

    #[test]
    fn max_level_filters_verbose_events() {
        let (layer, logs) = with_max_level(Level::INFO);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("dropped");
            tracing::error!("kept");
        });

        assert_eq!(logs.len(), 1);
        assert_eq!(logs.filter_level(Level::ERROR)[0].message, "kept");
    }

    #[test]
    fn take_all_drains() {
        let (layer, logs) = new();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || tracing::warn!("once"));

        assert_eq!(logs.take_all().len(), 1);
        assert!(logs.is_empty());
    }

    #[test]
    fn display_fields_are_unquoted() {
        let (layer, logs) = new();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(fields = %r#"{"a":1}"#, "json");
        });

        let event = &logs.all()[0];
        assert_eq!(event.json_fields(), Some(serde_json::json!({"a": 1})));
    }
}
