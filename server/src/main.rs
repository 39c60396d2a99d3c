mod api;
mod config;
mod db;
mod models;
mod schema;
mod store;

use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::http::Request;
use axum::Router;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use rextract_core::{create_engine, MemoryStore, OcrConfig, OcrEngine, RecipeStore};
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

/// Room for multipart boundaries and headers on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub engine: Arc<dyn OcrEngine>,
    pub ocr: Arc<OcrConfig>,
}

#[cfg(test)]
impl AppState {
    /// In-memory store with a fake engine that finds no text.
    pub fn for_tests() -> Self {
        Self::with_engine(Arc::new(rextract_core::FakeEngine::default()))
    }

    pub fn with_engine(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            engine,
            ocr: Arc::new(OcrConfig::default()),
        }
    }
}

/// Console logging filtered by RUST_LOG (default "info"). Traces and logs are
/// also exported over OTLP when OTEL_EXPORTER_OTLP_ENDPOINT names a reachable
/// collector.
fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer();

    let endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let exporters = match endpoint.as_deref() {
        Some(endpoint) if otlp_endpoint_reachable(endpoint) => {
            let service_name = env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "rextract-server".to_string());
            match otlp_providers(endpoint, &service_name) {
                Ok(providers) => Some((providers, service_name)),
                Err(e) => {
                    eprintln!("Failed to create OTLP exporter for {}: {}", endpoint, e);
                    None
                }
            }
        }
        _ => None,
    };

    let (otel_trace_layer, otel_log_layer) = match &exporters {
        Some(((trace_provider, log_provider), _)) => {
            let tracer = trace_provider.tracer("rextract-server");
            opentelemetry::global::set_tracer_provider(trace_provider.clone());
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(OpenTelemetryTracingBridge::new(log_provider)),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_trace_layer)
        .with(otel_log_layer)
        .init();

    match (endpoint, exporters) {
        (Some(endpoint), Some((_, service_name))) => tracing::info!(
            "OpenTelemetry enabled, exporting traces and logs to {} as {}",
            endpoint,
            service_name
        ),
        (Some(endpoint), None) => tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        ),
        (None, _) => {
            tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only")
        }
    }
}

/// Quick TCP check that a collector is listening, so a dead endpoint does not
/// leave the batch exporters retrying forever.
fn otlp_endpoint_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

fn otlp_providers(
    endpoint: &str,
    service_name: &str,
) -> Result<(SdkTracerProvider, SdkLoggerProvider), Box<dyn std::error::Error + Send + Sync>> {
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((trace_provider, log_provider))
}

fn open_store(config: &config::ServerConfig) -> Result<Arc<dyn RecipeStore>, db::DbSetupError> {
    match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_pool_size)?;
            tracing::info!("Using Postgres recipe store");
            Ok(Arc::new(store::PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, recipes are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn app(state: AppState) -> Router {
    let body_limit = state.ocr.max_upload_bytes + MULTIPART_OVERHEAD;
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::status::router())
        .nest("/api/recipes", api::recipes::router())
        .merge(api::recipes::legacy_router())
        .nest("/api/recipe-ingredients", api::recipe_ingredients::router())
        .nest("/api/ingredients", api::ingredients::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json().unwrap();
        println!("{}", spec);
        return;
    }

    init_telemetry();

    let config = config::ServerConfig::from_env().expect("Invalid configuration");

    let store = open_store(&config).expect("Failed to open recipe store");
    let engine: Arc<dyn OcrEngine> = Arc::from(create_engine(&config.ocr));
    tracing::info!(
        engine = engine.engine_name(),
        timeout = ?config.ocr.timeout,
        max_upload_bytes = config.ocr.max_upload_bytes,
        "OCR engine ready"
    );

    let state = AppState {
        store,
        engine,
        ocr: Arc::new(config.ocr.clone()),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    let addr = listener.local_addr().unwrap();

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app(state)).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds_without_conflicts() {
        let _ = app(AppState::for_tests());
    }

    #[test]
    fn test_unresolvable_otlp_endpoint_is_unreachable() {
        assert!(!otlp_endpoint_reachable("http://collector.invalid:4317"));
        assert!(!otlp_endpoint_reachable("not a host"));
    }

    #[test]
    fn test_listening_otlp_endpoint_is_reachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(otlp_endpoint_reachable(&format!("http://{}/", addr)));
    }

    #[test]
    fn test_body_limit_leaves_room_for_form_overhead() {
        let state = AppState::for_tests();
        assert!(state.ocr.max_upload_bytes + MULTIPART_OVERHEAD > rextract_core::MAX_FILE_SIZE);
    }
}
