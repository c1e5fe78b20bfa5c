//! ObservabilityLogger trait
//!
//! The sink abstraction lets the same [`LogValues`] reach any structured
//! logging backend. The `*_context` variants receive the OpenTelemetry
//! context held by the caller; backends that have no use for it can keep
//! the default bodies, which delegate to the plain variants.

use opentelemetry::Context;

use crate::values::LogValues;

/// Backend-specific log sink for attribute type `T`.
///
/// Each method emits `lv.msg()` with the value list matching its severity.
pub trait ObservabilityLogger<T>: Send + Sync {
    fn log_info(&self, lv: &LogValues<T>);

    fn log_debug(&self, lv: &LogValues<T>);

    fn log_error(&self, lv: &LogValues<T>);

    fn log_info_context(&self, _cx: &Context, lv: &LogValues<T>) {
        self.log_info(lv);
    }

    fn log_debug_context(&self, _cx: &Context, lv: &LogValues<T>) {
        self.log_debug(lv);
    }

    fn log_error_context(&self, _cx: &Context, lv: &LogValues<T>) {
        self.log_error(lv);
    }
}
