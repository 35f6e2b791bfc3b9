use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub services: BTreeMap<String, String>,
}

/// Health probe: degraded (but still 200) when the model endpoint is
/// unreachable, since text extraction works without it.
pub async fn health_handler<F, C>(State(state): State<AppState<F, C>>) -> impl IntoResponse
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let openrouter_status = match state.completion_client.health_check().await {
        Ok(()) => "healthy",
        Err(error) => {
            tracing::warn!(error = %error, "OpenRouter health check failed");
            "unhealthy"
        }
    };

    let overall_status = if openrouter_status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    let mut services = BTreeMap::new();
    services.insert("openrouter".to_string(), openrouter_status.to_string());

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.settings.environment().to_string(),
            services,
        }),
    )
}
