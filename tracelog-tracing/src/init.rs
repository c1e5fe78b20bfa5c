//! Tracing setup and configuration.
//!
//! This module provides:
//! - OpenTelemetry tracer provider initialization
//! - Integration with tracing-subscriber (filter, fmt layer, OpenTelemetry layer)
//! - Configuration for sampling, log format and span export

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{Config, Sampler, TracerProvider};
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable output (default for development).
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Where finished spans go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    /// Print spans to stdout.
    #[default]
    Console,
    /// Keep spans in-process only; ids are still generated.
    Disabled,
}

/// Configuration for the tracer and the log subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Service name for spans.
    pub service_name: String,
    /// Service version for spans.
    pub service_version: String,
    /// Sample rate (0.0 to 1.0).
    pub sample_rate: f64,
    /// Filter directive, e.g. `info,tracelog_core=debug`. `RUST_LOG` wins when set.
    pub log_filter: String,
    pub log_format: LogFormat,
    pub exporter: ExportTarget,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            service_name: "tracelog".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            sample_rate: 1.0,
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
            exporter: ExportTarget::default(),
        }
    }
}

impl TracerConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, TracerError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TracerError> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(TracerError::Config(format!(
                "sample_rate must be between 0.0 and 1.0, got {}",
                self.sample_rate
            )));
        }
        if self.service_name.is_empty() {
            return Err(TracerError::Config("service_name must not be empty".into()));
        }
        Ok(())
    }
}

/// Error type for tracer initialization.
#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    /// Failed to set global subscriber.
    #[error("failed to set global subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Config(String),
}

/// Guard that shuts down tracing when dropped.
///
/// This guard holds the OpenTelemetry tracer provider and ensures
/// proper shutdown when the guard is dropped.
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl TracingGuard {
    /// Shutdown the tracer and flush pending spans.
    pub fn shutdown(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            tracing::warn!("failed to shutdown tracer provider: {e}");
        }
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Build the log filter: `RUST_LOG` if set, otherwise the config directive.
pub fn build_filter(config: &TracerConfig) -> Result<EnvFilter, TracerError> {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV)
        .unwrap_or_else(|_| config.log_filter.clone());
    Ok(EnvFilter::try_new(directive)?)
}

/// Build the tracer provider described by `config`.
pub fn build_provider(config: &TracerConfig) -> TracerProvider {
    let resource = Resource::new([
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
    ]);
    let sampler = Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(config.sample_rate)));

    let builder = TracerProvider::builder().with_config(
        Config::default()
            .with_sampler(sampler)
            .with_resource(resource),
    );

    match config.exporter {
        ExportTarget::Console => builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build(),
        ExportTarget::Disabled => builder.build(),
    }
}

/// Initialize the global tracing subscriber and tracer provider.
///
/// Installs the provider globally, so `ObservabilityContext::new` picks it
/// up. Returns a guard that must be kept alive for the duration of the
/// program; dropping it flushes pending spans.
///
/// # Errors
///
/// Returns an error if the config or filter is invalid, or if the global
/// subscriber has already been set.
pub fn init_tracing(config: &TracerConfig) -> Result<TracingGuard, TracerError> {
    config.validate()?;
    let filter = build_filter(config)?;

    let provider = build_provider(config);
    let tracer = provider.tracer(config.service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let fmt_layer = match config.log_format {
        LogFormat::Pretty => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    global::set_tracer_provider(provider.clone());
    tracing::debug!(
        service = %config.service_name,
        format = ?config.log_format,
        exporter = ?config.exporter,
        "tracing initialized"
    );

    Ok(TracingGuard {
        provider: Some(provider),
    })
}
