use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use http_body_util::Full;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_query_handler, dynamic_query_advanced_handler, dynamic_query_handler, extract_handler,
    health_handler, root_handler, templates_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<F, C>(state: AppState<F, C>) -> Router
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Slightly above the configured file ceiling so multipart framing never
    // trips the limit before the size validation can produce a clear error.
    let body_limit = state.settings.extraction.max_file_size_mb * 1024 * 1024 + 1024 * 1024;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<F, C>))
        .route("/api/extract", post(extract_handler::<F, C>))
        .route("/predict", post(extract_handler::<F, C>))
        .route("/api/dynamic-query", post(dynamic_query_handler::<F, C>))
        .route(
            "/api/dynamic-query-advanced",
            post(dynamic_query_advanced_handler::<F, C>),
        )
        .route("/api/analyze-query", post(analyze_query_handler::<F, C>))
        .route("/api/templates", get(templates_handler::<F, C>))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

/// Converts an unanticipated panic into an opaque 500. Detail stays in the
/// logs, keyed by the request id.
fn handle_panic(
    err: Box<dyn std::any::Any + Send + 'static>,
) -> axum::http::Response<Full<Bytes>> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(detail, "Unhandled panic in request handler");

    axum::http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"error":"Internal server error"}"#,
        )))
        .unwrap()
}
