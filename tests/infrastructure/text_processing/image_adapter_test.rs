use docstract::application::ports::{FileLoader, FileLoaderError};
use docstract::domain::{ContentType, Document};
use docstract::infrastructure::text_processing::ImageAdapter;

fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode PNG");
    buffer.into_inner()
}

#[tokio::test]
async fn given_png_when_extracting_then_metadata_placeholder_is_returned() {
    let data = encode_png(2, 3);
    let document = Document::new("pic.png".to_string(), ContentType::Png, data.len() as u64);
    let adapter = ImageAdapter::new();

    let text = adapter.extract_text(&data, &document).await.unwrap();

    assert!(text.contains("Image Processing Placeholder"));
    assert!(text.contains("Format: PNG"));
    assert!(text.contains("Size: 2x3 pixels"));
    assert!(text.contains("OCR text extraction is not implemented"));
}

#[tokio::test]
async fn given_corrupt_image_bytes_when_extracting_then_returns_extraction_failed() {
    let adapter = ImageAdapter::new();
    let document = Document::new("pic.png".to_string(), ContentType::Png, 5);

    let result = adapter.extract_text(&[1, 2, 3, 4, 5], &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_non_image_content_type_when_extracting_then_returns_unsupported() {
    let adapter = ImageAdapter::new();
    let document = Document::new("doc.pdf".to_string(), ContentType::Pdf, 4);

    let result = adapter.extract_text(b"data", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
