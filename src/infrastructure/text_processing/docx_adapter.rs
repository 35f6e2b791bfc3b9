use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// DOCX text extraction via manual ZIP + XML parsing of
/// `word/document.xml`: body paragraphs in document order, then tables with
/// cells joined by `" | "` and rows joined by newline.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_document_xml(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to open DOCX archive: {e}"))
        })?;

        let mut entry = archive.by_name("word/document.xml").map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("missing word/document.xml: {e}"))
        })?;

        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read word/document.xml: {e}"))
        })?;

        Ok(xml)
    }

    /// Streams the document XML collecting body paragraphs and tables.
    /// Paragraphs inside table cells belong to the cell text, not the body.
    fn collect_blocks(xml: &str) -> Result<Vec<String>, FileLoaderError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();

        let mut paragraphs: Vec<String> = Vec::new();
        let mut tables: Vec<String> = Vec::new();

        let mut current_paragraph = String::new();
        let mut current_cell = String::new();
        let mut current_row: Vec<String> = Vec::new();
        let mut current_table_rows: Vec<String> = Vec::new();
        let mut table_depth = 0usize;
        let mut in_text_run = false;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(element)) => match element.name().as_ref() {
                    b"w:tbl" => table_depth += 1,
                    b"w:tr" if table_depth > 0 => current_row.clear(),
                    b"w:tc" if table_depth > 0 => current_cell.clear(),
                    b"w:p" if table_depth == 0 => current_paragraph.clear(),
                    b"w:t" => in_text_run = true,
                    _ => {}
                },
                Ok(Event::Text(text)) if in_text_run => {
                    let unescaped = text.unescape().map_err(|e| {
                        FileLoaderError::ExtractionFailed(format!("invalid DOCX text run: {e}"))
                    })?;
                    if table_depth > 0 {
                        current_cell.push_str(&unescaped);
                    } else {
                        current_paragraph.push_str(&unescaped);
                    }
                }
                Ok(Event::End(element)) => match element.name().as_ref() {
                    b"w:t" => in_text_run = false,
                    b"w:p" if table_depth == 0 => {
                        let paragraph = current_paragraph.trim();
                        if !paragraph.is_empty() {
                            paragraphs.push(paragraph.to_string());
                        }
                    }
                    b"w:tc" if table_depth > 0 => {
                        let cell = current_cell.trim();
                        if !cell.is_empty() {
                            current_row.push(cell.to_string());
                        }
                    }
                    b"w:tr" if table_depth > 0 => {
                        if !current_row.is_empty() {
                            current_table_rows.push(current_row.join(" | "));
                            current_row.clear();
                        }
                    }
                    b"w:tbl" => {
                        table_depth = table_depth.saturating_sub(1);
                        if table_depth == 0 && !current_table_rows.is_empty() {
                            tables.push(current_table_rows.join("\n"));
                            current_table_rows.clear();
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(FileLoaderError::ExtractionFailed(format!(
                        "failed to parse DOCX XML: {e}"
                    )));
                }
                _ => {}
            }
        }

        let mut blocks = paragraphs;
        blocks.extend(tables);
        Ok(blocks)
    }
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let xml = Self::read_document_xml(data)?;
        let blocks = Self::collect_blocks(&xml)?;

        if blocks.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        tracing::debug!(block_count = blocks.len(), "DOCX text extraction complete");
        Ok(blocks.join("\n\n"))
    }
}
