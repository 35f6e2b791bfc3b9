use crate::application::ports::FileLoaderError;
use crate::domain::ContentType;

/// Detects the content type of an uploaded buffer. Detection order, first
/// match wins: content sniffing by magic bytes, filename extension, raw
/// signature checks, plain-text default.
///
/// A sniffed type outside the supported set is an immediate
/// `UnsupportedContentType`; later stages never override a confident sniff.
pub fn detect_content_type(
    data: &[u8],
    filename: Option<&str>,
) -> Result<ContentType, FileLoaderError> {
    if let Some(kind) = infer::get(data) {
        let mime = kind.mime_type();
        tracing::debug!(mime, "Content-sniffed file type");
        return ContentType::from_mime(mime)
            .ok_or_else(|| FileLoaderError::UnsupportedContentType(mime.to_string()));
    }

    if let Some(name) = filename {
        if let Some(content_type) = ContentType::from_extension(name) {
            tracing::debug!(mime = content_type.as_mime(), "Extension-based file type");
            return Ok(content_type);
        }
    }

    if let Some(content_type) = detect_by_signature(data) {
        tracing::debug!(mime = content_type.as_mime(), "Signature-based file type");
        return Ok(content_type);
    }

    tracing::warn!("Could not determine file type, defaulting to plain text");
    Ok(ContentType::Text)
}

fn detect_by_signature(data: &[u8]) -> Option<ContentType> {
    if data.len() < 4 {
        return None;
    }

    if data.starts_with(b"%PDF") {
        return Some(ContentType::Pdf);
    }
    if data.starts_with(b"PK\x03\x04") && contains_word_entry(data) {
        return Some(ContentType::Docx);
    }
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some(ContentType::Png);
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ContentType::Jpeg);
    }

    if std::str::from_utf8(data).is_ok() {
        return Some(ContentType::Text);
    }

    None
}

fn contains_word_entry(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    head.windows(5).any(|window| window == b"word/")
}
