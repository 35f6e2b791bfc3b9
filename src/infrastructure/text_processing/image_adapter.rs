use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Image "extraction" placeholder: no OCR is performed. Returns descriptive
/// metadata text (format, dimensions, color mode) as a successful result,
/// not an extraction failure.
#[derive(Default)]
pub struct ImageAdapter;

impl ImageAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileLoader for ImageAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if !matches!(document.content_type, ContentType::Png | ContentType::Jpeg) {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let format = image::guess_format(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to identify image: {e}"))
        })?;
        let decoded = image::load_from_memory_with_format(data, format).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to decode image: {e}"))
        })?;

        let format_name = format!("{format:?}").to_uppercase();
        let mode = format!("{:?}", decoded.color());

        tracing::debug!(
            format = %format_name,
            width = decoded.width(),
            height = decoded.height(),
            "Image metadata extracted"
        );

        Ok(format!(
            "Image Processing Placeholder\n\
             Format: {format_name}\n\
             Size: {width}x{height} pixels\n\
             Mode: {mode}\n\n\
             Note: OCR text extraction is not implemented in this version. \
             Only image metadata is reported; text within the image is not captured.",
            width = decoded.width(),
            height = decoded.height(),
        ))
    }
}
