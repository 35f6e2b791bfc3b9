use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// PDF text extraction: lopdf page-by-page as the primary decoder, with a
/// pdf-extract whole-document pass as fallback when lopdf yields nothing.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Per-page text keyed by the original 1-based page ordinal. Pages that
    /// contain only whitespace are skipped but keep their ordinal.
    fn extract_pages(data: &[u8]) -> Result<Vec<(u32, String)>, FileLoaderError> {
        let document = lopdf::Document::load_mem(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}"))
        })?;

        let mut pages = Vec::new();
        for (page_number, _object_id) in document.get_pages() {
            let text = document.extract_text(&[page_number]).unwrap_or_default();
            if !text.trim().is_empty() {
                pages.push((page_number, text));
            }
        }

        Ok(pages)
    }

    fn extract_with_fallback(data: &[u8], filename: &str) -> Result<String, FileLoaderError> {
        match Self::extract_pages(data) {
            Ok(pages) if !pages.is_empty() => {
                tracing::debug!(page_count = pages.len(), "PDF text extraction complete");
                let blocks: Vec<String> = pages
                    .into_iter()
                    .map(|(number, text)| format!("--- Page {number} ---\n{text}"))
                    .collect();
                Ok(blocks.join("\n\n"))
            }
            primary => {
                match &primary {
                    Err(error) => {
                        tracing::warn!(error = %error, "Primary PDF decoder failed, trying fallback")
                    }
                    Ok(_) => tracing::warn!("Primary PDF decoder found no text, trying fallback"),
                }

                let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
                    FileLoaderError::ExtractionFailed(format!(
                        "failed to extract text from PDF: {e}"
                    ))
                })?;

                if text.trim().is_empty() {
                    return Err(FileLoaderError::NoTextFound(filename.to_string()));
                }

                Ok(format!("--- Page 1 ---\n{text}"))
            }
        }
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let buffer = data.to_vec();
        let filename = document.filename.clone();

        tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::extract_with_fallback(&buffer, &filename)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))?
    }
}
