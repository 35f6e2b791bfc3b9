use async_trait::async_trait;
use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Plain-text decoding with an ordered encoding chain: UTF-8, UTF-16
/// (BOM-detected), Latin-1, CP1252. The first non-empty decode wins.
pub struct PlainTextAdapter;

fn decode_text(data: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(data) {
        if !text.trim().is_empty() {
            return Some(text.to_string());
        }
    }

    if data.starts_with(&[0xFF, 0xFE]) {
        let (decoded, _, had_errors) = UTF_16LE.decode(data);
        if !had_errors && !decoded.trim().is_empty() {
            return Some(decoded.into_owned());
        }
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        let (decoded, _, had_errors) = UTF_16BE.decode(data);
        if !had_errors && !decoded.trim().is_empty() {
            return Some(decoded.into_owned());
        }
    }

    let latin1 = encoding_rs::mem::decode_latin1(data);
    if !latin1.trim().is_empty() {
        return Some(latin1.into_owned());
    }

    let (decoded, _, had_errors) = WINDOWS_1252.decode(data);
    if !had_errors && !decoded.trim().is_empty() {
        return Some(decoded.into_owned());
    }

    None
}

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        decode_text(data).ok_or_else(|| {
            FileLoaderError::ExtractionFailed(
                "could not decode text file with any supported encoding".to_string(),
            )
        })
    }
}
