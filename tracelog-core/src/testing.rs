//! Recording logger for tests
//!
//! RecordingLogger remembers every call it receives so tests can assert
//! on what an [`ObservabilityContext`](crate::ObservabilityContext)
//! forwarded, without a real logging backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use opentelemetry::Context;
use opentelemetry::trace::TraceContextExt;

use crate::logger::ObservabilityLogger;
use crate::options::Level;
use crate::values::LogValues;

/// One call received by a [`RecordingLogger`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLog<T> {
    pub level: Level,
    pub msg: String,
    pub values: Vec<T>,
    pub err: Option<String>,
    /// Span id of the context passed to a `*_context` call
    pub context_span_id: Option<String>,
}

/// In-memory [`ObservabilityLogger`] implementation
#[derive(Debug)]
pub struct RecordingLogger<T> {
    records: Mutex<Vec<RecordedLog<T>>>,
}

impl<T> RecordingLogger<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedLog<T>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> RecordingLogger<T> {
    /// Snapshot of all recorded calls, oldest first
    pub fn records(&self) -> Vec<RecordedLog<T>> {
        self.lock().clone()
    }

    fn record(&self, level: Level, cx: Option<&Context>, lv: &LogValues<T>) {
        let context_span_id = cx.map(|cx| cx.span().span_context().span_id().to_string());
        self.lock().push(RecordedLog {
            level,
            msg: lv.msg().to_string(),
            values: lv.values_for(level).to_vec(),
            err: lv.err().map(ToString::to_string),
            context_span_id,
        });
    }
}

impl<T> Default for RecordingLogger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> ObservabilityLogger<T> for RecordingLogger<T> {
    fn log_info(&self, lv: &LogValues<T>) {
        self.record(Level::Info, None, lv);
    }

    fn log_debug(&self, lv: &LogValues<T>) {
        self.record(Level::Debug, None, lv);
    }

    fn log_error(&self, lv: &LogValues<T>) {
        self.record(Level::Error, None, lv);
    }

    fn log_info_context(&self, cx: &Context, lv: &LogValues<T>) {
        self.record(Level::Info, Some(cx), lv);
    }

    fn log_debug_context(&self, cx: &Context, lv: &LogValues<T>) {
        self.record(Level::Debug, Some(cx), lv);
    }

    fn log_error_context(&self, cx: &Context, lv: &LogValues<T>) {
        self.record(Level::Error, Some(cx), lv);
    }
}
