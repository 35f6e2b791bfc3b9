use docstract::application::ports::{FileLoader, FileLoaderError};
use docstract::domain::{ContentType, Document};
use docstract::infrastructure::text_processing::DocxAdapter;

use crate::helpers::build_docx;

fn docx_document(size: u64) -> Document {
    Document::new("report.docx".to_string(), ContentType::Docx, size)
}

#[tokio::test]
async fn given_paragraphs_when_extracting_then_joined_in_document_order() {
    let data = build_docx(
        "<w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>\
         <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>",
    );
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len() as u64))
        .await
        .unwrap();

    assert_eq!(text, "First paragraph\n\nSecond paragraph");
}

#[tokio::test]
async fn given_table_when_extracting_then_cells_joined_with_pipes_and_rows_with_newlines() {
    let data = build_docx(
        "<w:p><w:r><w:t>Intro</w:t></w:r></w:p>\
         <w:tbl>\
           <w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc>\
                 <w:tc><w:p><w:r><w:t>Price</w:t></w:r></w:p></w:tc></w:tr>\
           <w:tr><w:tc><w:p><w:r><w:t>Widget</w:t></w:r></w:p></w:tc>\
                 <w:tc><w:p><w:r><w:t>9.99</w:t></w:r></w:p></w:tc></w:tr>\
         </w:tbl>",
    );
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len() as u64))
        .await
        .unwrap();

    assert_eq!(text, "Intro\n\nName | Price\nWidget | 9.99");
}

#[tokio::test]
async fn given_table_before_paragraph_when_extracting_then_tables_still_come_last() {
    let data = build_docx(
        "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
         <w:p><w:r><w:t>Closing paragraph</w:t></w:r></w:p>",
    );
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len() as u64))
        .await
        .unwrap();

    assert_eq!(text, "Closing paragraph\n\nCell");
}

#[tokio::test]
async fn given_split_text_runs_when_extracting_then_runs_are_concatenated() {
    let data = build_docx(
        "<w:p><w:r><w:t>Hel</w:t></w:r><w:r><w:t>lo</w:t></w:r></w:p>",
    );
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len() as u64))
        .await
        .unwrap();

    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn given_empty_body_when_extracting_then_returns_no_text_found() {
    let data = build_docx("<w:p><w:r><w:t>   </w:t></w:r></w:p>");
    let adapter = DocxAdapter::new();

    let result = adapter
        .extract_text(&data, &docx_document(data.len() as u64))
        .await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(_))));
}

#[tokio::test]
async fn given_bytes_that_are_not_a_zip_when_extracting_then_returns_extraction_failed() {
    let adapter = DocxAdapter::new();
    let data = b"definitely not a zip archive";

    let result = adapter
        .extract_text(data, &docx_document(data.len() as u64))
        .await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_wrong_content_type_when_extracting_then_returns_unsupported() {
    let adapter = DocxAdapter::new();
    let document = Document::new("file.txt".to_string(), ContentType::Text, 4);

    let result = adapter.extract_text(b"text", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
