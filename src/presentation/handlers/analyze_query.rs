use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::application::services::ValidationError;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::multipart_form::validation_error_response;

#[derive(Deserialize)]
pub struct AnalyzeQueryRequest {
    pub query: String,
}

/// Document-free dry run: previews the structure the model would likely
/// produce for a query.
#[tracing::instrument(skip(state, request))]
pub async fn analyze_query_handler<F, C>(
    State(state): State<AppState<F, C>>,
    Form(request): Form<AnalyzeQueryRequest>,
) -> Response
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let query = request.query.trim();
    if query.is_empty() {
        return validation_error_response(ValidationError::EmptyQuery);
    }

    tracing::info!(query = %sanitize_prompt(query), "Query intent analysis");

    let analysis = state.dynamic_query_service.analyze_query_intent(query).await;

    (StatusCode::OK, Json(serde_json::Value::Object(analysis))).into_response()
}
