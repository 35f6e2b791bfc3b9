use docstract::application::ports::{FileLoader, FileLoaderError};
use docstract::domain::{ContentType, Document};
use docstract::infrastructure::text_processing::PdfAdapter;

use crate::helpers::build_pdf;

fn pdf_document(size: u64) -> Document {
    Document::new("doc.pdf".to_string(), ContentType::Pdf, size)
}

#[tokio::test]
async fn given_single_page_pdf_when_extracting_then_page_header_and_text_are_present() {
    let data = build_pdf("Hello World");
    let adapter = PdfAdapter::new();

    let text = adapter
        .extract_text(&data, &pdf_document(data.len() as u64))
        .await
        .unwrap();

    assert!(text.starts_with("--- Page 1 ---"));
    assert!(text.contains("Hello World"));
}

#[tokio::test]
async fn given_bytes_that_are_not_a_pdf_when_extracting_then_returns_extraction_failed() {
    let adapter = PdfAdapter::new();
    let data = b"this is not a pdf at all";

    let result = adapter
        .extract_text(data, &pdf_document(data.len() as u64))
        .await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_wrong_content_type_when_extracting_then_returns_unsupported() {
    let adapter = PdfAdapter::new();
    let document = Document::new("doc.txt".to_string(), ContentType::Text, 4);

    let result = adapter.extract_text(b"text", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
