//! Logging and trace export.
use miette::{IntoDiagnostic, WrapErr};
use opentelemetry::InstrumentationScope;
use opentelemetry::trace::TracerProvider;
use opentelemetry_resource_detectors::{
    HostResourceDetector, K8sResourceDetector, OsResourceDetector,
};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::resource::{EnvResourceDetector, ResourceDetector};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TracingConfig;

/// The filter used when `RUST_LOG` isn't set.
const DEFAULT_FILTER: &str = "holdbot=debug,bag_of_holding=debug";

/// Returns a list of resource detectors to use to enrich OTel attributes.
fn otel_resource_detectors() -> Vec<Box<dyn ResourceDetector>> {
    vec![
        Box::new(EnvResourceDetector::default()),
        Box::new(OsResourceDetector),
        Box::new(HostResourceDetector::default()),
        Box::new(K8sResourceDetector),
    ]
}

/// Installs the global tracing subscriber.
///
/// Log lines go to stdout as JSON, or as human-readable text if `json` is disabled. Spans are
/// additionally exported over OTLP/HTTP if `enabled` is set, in which case the exporter is
/// configured through the standard `OTEL_EXPORTER_OTLP_*` environment variables.
///
/// # Errors
///
/// Returns an error if the exporter could not be built or a global subscriber is already set.
pub fn try_init(config: &TracingConfig) -> miette::Result<()> {
    let telemetry_layer = if config.enabled {
        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .build()
            .into_diagnostic()
            .wrap_err("building otlp http exporter failed")?;
        let res_detectors = otel_resource_detectors();
        let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(otlp_exporter)
            .with_resource(
                Resource::builder_empty()
                    .with_service_name(env!("CARGO_PKG_NAME"))
                    .with_detectors(&res_detectors)
                    .build(),
            )
            .build();
        let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
            .build();
        let tracer = provider.tracer_with_scope(scope);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let (json_layer, text_layer) = if config.json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(telemetry_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    info!(otlp = config.enabled, json = config.json, "tracing initialized");

    Ok(())
}
