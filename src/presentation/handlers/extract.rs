use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::application::services::ValidationError;
use crate::domain::{Document, ErrorResult};
use crate::infrastructure::text_processing::detect_content_type;
use crate::presentation::state::AppState;

use super::multipart_form::{
    multipart_error_response, read_multipart_form, validation_error_response,
};

/// Main extraction endpoint: multipart `file` plus optional `template` and
/// `custom_prompt` fields. Extraction and model failures come back as a
/// structured error payload, not a protocol failure.
#[tracing::instrument(skip(state, multipart))]
pub async fn extract_handler<F, C>(
    State(state): State<AppState<F, C>>,
    mut multipart: Multipart,
) -> Response
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let mut form = match read_multipart_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => return multipart_error_response(error),
    };

    let Some(file) = form.file.take() else {
        tracing::warn!("Extraction request with no file");
        return validation_error_response(ValidationError::MissingFile);
    };

    tracing::debug!(
        filename = %file.filename,
        mime_hint = file.mime_hint.as_deref().unwrap_or("none"),
        bytes = file.data.len(),
        template = form.text("template").unwrap_or("none"),
        has_custom_prompt = form.text("custom_prompt").is_some(),
        "Document extraction request"
    );

    if let Err(error) = state
        .extraction_service
        .validate_upload(&file.filename, file.data.len() as u64)
    {
        return validation_error_response(error);
    }

    let content_type = match detect_content_type(&file.data, Some(&file.filename)) {
        Ok(content_type) => content_type,
        Err(error) => {
            tracing::warn!(error = %error, "Unsupported upload");
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResult {
                    error: error.to_string(),
                }),
            )
                .into_response();
        }
    };

    let document = Document::new(file.filename, content_type, file.data.len() as u64);
    let outcome = state
        .extraction_service
        .process_document(
            &file.data,
            &document,
            form.text("template"),
            form.text("custom_prompt"),
        )
        .await;

    (StatusCode::OK, Json(outcome)).into_response()
}
