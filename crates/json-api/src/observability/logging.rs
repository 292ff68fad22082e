//! Logging subscriber initialisation.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

/// Dependencies that are noisy below `warn`.
const QUIET_TARGETS: &str = "h2=warn,hyper=warn,tonic=warn,sqlx=warn,lettre=warn,opentelemetry=warn";

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_unset| EnvFilter::new(format!("{log_level},{QUIET_TARGETS}")))
}

/// Install the global subscriber: formatted output, level filter and optional OTLP export.
pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let fmt_layer = match config.logging.log_format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
    };

    let otel_layer = tracer_provider.map(|provider| {
        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer(config.observability.otel_service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(&config.logging.log_level))
        .with(otel_layer)
        .try_init()?;

    Ok(())
}
