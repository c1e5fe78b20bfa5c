//! Error types for tracelog-core

use thiserror::Error;

/// Call-order violations on an [`ObservabilityContext`](crate::ObservabilityContext)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("span has not been started yet")]
    SpanNotStarted,

    #[error("tracing format already set")]
    TracingFormatAlreadySet,
}

/// Result alias for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
