use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::application::services::{CitationStyle, ValidationError};
use crate::domain::{Document, ErrorResult, ExtractionOutcome};
use crate::infrastructure::observability::sanitize_prompt;
use crate::infrastructure::text_processing::detect_content_type;
use crate::presentation::state::AppState;

use super::multipart_form::{
    multipart_error_response, read_multipart_form, validation_error_response, MultipartForm,
    UploadedFile,
};

/// Dynamic query extraction: the model designs the result schema from the
/// natural-language query.
#[tracing::instrument(skip(state, multipart))]
pub async fn dynamic_query_handler<F, C>(
    State(state): State<AppState<F, C>>,
    mut multipart: Multipart,
) -> Response
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let form = match read_multipart_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => return multipart_error_response(error),
    };

    let (file, query) = match validate_query_form(&form) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    if let Err(error) = state
        .extraction_service
        .validate_upload(&file.filename, file.data.len() as u64)
    {
        return validation_error_response(error);
    }

    tracing::info!(
        filename = %file.filename,
        query = %sanitize_prompt(query),
        "Dynamic query request"
    );

    let document_text = match extract_document_text(&state, file).await {
        Ok(text) => text,
        Err(response) => return response,
    };

    let outcome = state
        .dynamic_query_service
        .process_dynamic_query(&document_text, query, true, true)
        .await;

    (StatusCode::OK, Json(outcome)).into_response()
}

/// Adds summarization/citation toggles and a citation-style selector on top
/// of the standard dynamic query endpoint.
#[tracing::instrument(skip(state, multipart))]
pub async fn dynamic_query_advanced_handler<F, C>(
    State(state): State<AppState<F, C>>,
    mut multipart: Multipart,
) -> Response
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let form = match read_multipart_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => return multipart_error_response(error),
    };

    let (file, query) = match validate_query_form(&form) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let enable_summarization = parse_bool(form.text("enable_summarization"), true);
    let enable_citations = parse_bool(form.text("enable_citations"), true);
    let force_summarization = parse_bool(form.text("force_summarization"), false);

    let citation_style = match form
        .text("citation_style")
        .unwrap_or("page_numbers")
        .parse::<CitationStyle>()
    {
        Ok(style) => style,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResult { error }),
            )
                .into_response();
        }
    };

    if let Err(error) = state
        .extraction_service
        .validate_upload(&file.filename, file.data.len() as u64)
    {
        return validation_error_response(error);
    }

    tracing::info!(
        filename = %file.filename,
        query = %sanitize_prompt(query),
        summarization = enable_summarization,
        citations = enable_citations,
        force_summary = force_summarization,
        "Advanced dynamic query request"
    );

    let document_text = match extract_document_text(&state, file).await {
        Ok(text) => text,
        Err(response) => return response,
    };

    let outcome = if force_summarization || citation_style != CitationStyle::PageNumbers {
        state
            .dynamic_query_service
            .process_with_custom_options(&document_text, query, force_summarization, citation_style)
            .await
    } else {
        state
            .dynamic_query_service
            .process_dynamic_query(&document_text, query, enable_summarization, enable_citations)
            .await
    };

    (StatusCode::OK, Json(outcome)).into_response()
}

fn validate_query_form(form: &MultipartForm) -> Result<(&UploadedFile, &str), Response> {
    let Some(file) = form.file.as_ref() else {
        tracing::warn!("Dynamic query request with no file");
        return Err(validation_error_response(ValidationError::MissingFile));
    };

    let Some(query) = form.text("query") else {
        return Err(validation_error_response(ValidationError::EmptyQuery));
    };

    Ok((file, query.trim()))
}

/// Runs the text-extraction half of the pipeline. Failures come back as a
/// 200 with a structured error payload: the HTTP call itself succeeded.
async fn extract_document_text<F, C>(
    state: &AppState<F, C>,
    file: &UploadedFile,
) -> Result<String, Response>
where
    F: FileLoader + 'static,
    C: CompletionClient + 'static,
{
    let content_type = match detect_content_type(&file.data, Some(&file.filename)) {
        Ok(content_type) => content_type,
        Err(error) => {
            tracing::warn!(error = %error, "Unsupported upload");
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResult {
                    error: error.to_string(),
                }),
            )
                .into_response());
        }
    };

    let document = Document::new(
        file.filename.clone(),
        content_type,
        file.data.len() as u64,
    );

    match state
        .extraction_service
        .extract_text(&file.data, &document)
        .await
    {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err((
            StatusCode::OK,
            Json(ExtractionOutcome::error(
                "Could not extract text from document",
            )),
        )
            .into_response()),
        Err(error) => {
            tracing::error!(error = %error, "Text extraction failed");
            Err((
                StatusCode::OK,
                Json(ExtractionOutcome::error(format!(
                    "Could not extract text from document: {error}"
                ))),
            )
                .into_response())
        }
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(text) => {
            let text = text.trim();
            text.eq_ignore_ascii_case("true") || text == "1"
        }
        None => default,
    }
}
