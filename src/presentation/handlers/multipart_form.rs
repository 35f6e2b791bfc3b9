use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::services::ValidationError;
use crate::domain::ErrorResult;

pub struct UploadedFile {
    pub filename: String,
    /// Content type declared by the uploader; detection goes by content and
    /// filename, this is kept for logging only.
    pub mime_hint: Option<String>,
    pub data: Bytes,
}

/// A fully-read multipart form: at most one uploaded file plus any text
/// fields. Files are read into memory; the router's body limit bounds them.
#[derive(Default)]
pub struct MultipartForm {
    pub file: Option<UploadedFile>,
    pub text_fields: BTreeMap<String, String>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

pub async fn read_multipart_form(
    multipart: &mut Multipart,
) -> Result<MultipartForm, MultipartError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().map(str::to_string);
            let mime_hint = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            if let Some(filename) = filename {
                form.file = Some(UploadedFile {
                    filename,
                    mime_hint,
                    data,
                });
            }
        } else {
            form.text_fields.insert(name, field.text().await?);
        }
    }

    Ok(form)
}

pub fn multipart_error_response(error: MultipartError) -> Response {
    tracing::error!(error = %error, "Failed to read multipart body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResult {
            error: format!("Failed to read multipart body: {error}"),
        }),
    )
        .into_response()
}

pub fn validation_error_response(error: ValidationError) -> Response {
    let status = match error {
        ValidationError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ValidationError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ValidationError::MissingFile | ValidationError::EmptyQuery => StatusCode::BAD_REQUEST,
    };

    tracing::warn!(error = %error, "Upload validation failed");
    (
        status,
        Json(ErrorResult {
            error: error.to_string(),
        }),
    )
        .into_response()
}
