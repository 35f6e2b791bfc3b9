use docstract::application::ports::FileLoaderError;
use docstract::domain::ContentType;
use docstract::infrastructure::text_processing::detect_content_type;

use crate::helpers::{build_docx, build_pdf};

#[test]
fn given_pdf_bytes_with_txt_filename_then_content_sniffing_wins() {
    let data = build_pdf("hello");

    let detected = detect_content_type(&data, Some("renamed.txt")).unwrap();

    assert_eq!(detected, ContentType::Pdf);
}

#[test]
fn given_png_signature_then_detected_as_png() {
    // Full 8-byte PNG signature followed by an IHDR chunk header.
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0, 0, 0, 13]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&[0; 17]);

    let detected = detect_content_type(&data, None).unwrap();

    assert_eq!(detected, ContentType::Png);
}

#[test]
fn given_jpeg_signature_then_detected_as_jpeg() {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(b"\x00\x10JFIF\x00");
    data.extend_from_slice(&[0; 16]);

    let detected = detect_content_type(&data, Some("photo.unknown")).unwrap();

    assert_eq!(detected, ContentType::Jpeg);
}

#[test]
fn given_docx_archive_then_detected_as_docx() {
    let data = build_docx("<w:p><w:r><w:t>hello</w:t></w:r></w:p>");

    let detected = detect_content_type(&data, None).unwrap();

    assert_eq!(detected, ContentType::Docx);
}

#[test]
fn given_plain_utf8_prose_then_defaults_to_text() {
    let detected = detect_content_type(b"just some ordinary prose", None).unwrap();

    assert_eq!(detected, ContentType::Text);
}

#[test]
fn given_unknown_extension_with_utf8_content_then_signature_check_yields_text() {
    let detected = detect_content_type(b"log line one\nlog line two", Some("server.log")).unwrap();

    assert_eq!(detected, ContentType::Text);
}

#[test]
fn given_txt_extension_with_short_binary_content_then_extension_wins() {
    let detected = detect_content_type(&[0xDE, 0xAD], Some("data.txt")).unwrap();

    assert_eq!(detected, ContentType::Text);
}

#[test]
fn given_recognizable_unsupported_format_then_unsupported_error() {
    // A GIF header is confidently sniffed but has no decoder.
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&[0; 32]);

    let result = detect_content_type(&data, Some("animation.txt"));

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
