use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::presentation::state::AppState;

/// Lists the built-in extraction templates: name to extraction goal.
pub async fn templates_handler<F, C>(State(state): State<AppState<F, C>>) -> impl IntoResponse
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let templates: BTreeMap<&str, &str> = state
        .extraction_service
        .available_templates()
        .into_iter()
        .collect();

    (StatusCode::OK, Json(templates))
}
