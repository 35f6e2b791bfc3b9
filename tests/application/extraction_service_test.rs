use std::sync::Arc;

use docstract::application::ports::CompletionError;
use docstract::application::services::{ExtractionConfig, ExtractionService, ValidationError};
use docstract::domain::{ContentType, Document, ExtractionOutcome};
use serde_json::json;

use crate::helpers::{length_outcome, stop_outcome, MockCompletionClient, MockFileLoader};

fn service(
    client: Arc<MockCompletionClient>,
) -> ExtractionService<MockFileLoader, MockCompletionClient> {
    ExtractionService::new(Arc::new(MockFileLoader), client, ExtractionConfig::default())
}

fn text_document(filename: &str, size: u64) -> Document {
    Document::new(filename.to_string(), ContentType::Text, size)
}

#[tokio::test]
async fn given_known_template_when_processing_then_returns_flattened_template_result() {
    let client = Arc::new(MockCompletionClient::returning(
        r#"{"emails": ["a@b.com"], "subjects": ["Hello"], "senders": [], "dates": []}"#,
    ));
    let service = service(Arc::clone(&client));

    let data = b"From: a@b.com\nSubject: Hello";
    let document = text_document("mail.txt", data.len() as u64);

    let outcome = service
        .process_document(data, &document, Some("emails"), None)
        .await;

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(serialized["emails"], json!(["a@b.com"]));
    assert!(serialized.get("ai_extraction_result").is_none());
    assert_eq!(client.request_count(), 1);

    let request = client.request(0);
    assert_eq!(request.temperature, 0.0);
    assert!(request.json_mode);
    assert!(request.system_prompt.contains("EXTRACTION GOAL"));
    assert!(request.user_prompt.contains("From: a@b.com"));
}

#[tokio::test]
async fn given_custom_prompt_when_processing_then_returns_ai_envelope_echoing_goal() {
    let client = Arc::new(MockCompletionClient::returning(
        r#"{"key_information": ["quarterly revenue"]}"#,
    ));
    let service = service(Arc::clone(&client));

    let data = b"Revenue was up this quarter.";
    let document = text_document("report.txt", data.len() as u64);

    let outcome = service
        .process_document(data, &document, None, Some("Find revenue highlights"))
        .await;

    let serialized = serde_json::to_value(&outcome).unwrap();
    let envelope = &serialized["ai_extraction_result"];
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["query"], "Find revenue highlights");
    assert_eq!(envelope["data"]["key_information"], json!(["quarterly revenue"]));
}

#[tokio::test]
async fn given_unknown_template_when_processing_then_treated_as_ai_extraction() {
    let client = Arc::new(MockCompletionClient::returning(r#"{"names": []}"#));
    let service = service(Arc::clone(&client));

    let data = b"some document text";
    let document = text_document("doc.txt", data.len() as u64);

    let outcome = service
        .process_document(data, &document, Some("no-such-template"), None)
        .await;

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert!(serialized.get("ai_extraction_result").is_some());
}

#[tokio::test]
async fn given_unavailable_client_when_processing_then_returns_error_result() {
    let client = Arc::new(MockCompletionClient::unavailable());
    let service = service(Arc::clone(&client));

    let data = b"text";
    let document = text_document("doc.txt", data.len() as u64);

    let outcome = service.process_document(data, &document, None, None).await;

    match outcome {
        ExtractionOutcome::Error(error) => {
            assert!(error.error.contains("AI extraction failed"));
        }
        other => panic!("expected error result, got {other:?}"),
    }
}

#[tokio::test]
async fn given_truncated_completion_when_reasoning_holds_json_then_no_retry_is_made() {
    let client = Arc::new(MockCompletionClient::scripted(vec![Ok(length_outcome(
        "",
        Some(r#"{"emails": ["found@reasoning.com"], "subjects": [], "senders": [], "dates": []}"#),
    ))]));
    let service = service(Arc::clone(&client));

    let data = b"mail text";
    let document = text_document("mail.txt", data.len() as u64);

    let outcome = service
        .process_document(data, &document, Some("emails"), None)
        .await;

    assert_eq!(client.request_count(), 1);
    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(serialized["emails"], json!(["found@reasoning.com"]));
}

#[tokio::test]
async fn given_truncated_completion_without_reasoning_then_retries_once_with_larger_budget() {
    let client = Arc::new(MockCompletionClient::scripted(vec![
        Ok(length_outcome(r#"{"emails": ["part"#, None)),
        Ok(stop_outcome(
            r#"{"emails": ["full@retry.com"], "subjects": [], "senders": [], "dates": []}"#,
        )),
    ]));
    let service = service(Arc::clone(&client));

    let data = b"mail text";
    let document = text_document("mail.txt", data.len() as u64);

    let outcome = service
        .process_document(data, &document, Some("emails"), None)
        .await;

    assert_eq!(client.request_count(), 2);
    assert_eq!(client.request(0).max_tokens, 2_000);
    assert_eq!(client.request(1).max_tokens, 4_000);

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(serialized["emails"], json!(["full@retry.com"]));
}

#[tokio::test]
async fn given_retry_still_empty_then_returns_truncation_error() {
    let client = Arc::new(MockCompletionClient::scripted(vec![
        Ok(length_outcome("", None)),
        Ok(length_outcome("", None)),
    ]));
    let service = service(Arc::clone(&client));

    let data = b"text";
    let document = text_document("doc.txt", data.len() as u64);

    let outcome = service.process_document(data, &document, None, None).await;

    match outcome {
        ExtractionOutcome::Error(error) => {
            assert!(error.error.contains("truncated"));
        }
        other => panic!("expected error result, got {other:?}"),
    }
}

#[tokio::test]
async fn given_model_error_when_processing_then_returns_error_result_not_panic() {
    let client = Arc::new(MockCompletionClient::scripted(vec![Err(
        CompletionError::RateLimited,
    )]));
    let service = service(Arc::clone(&client));

    let data = b"text";
    let document = text_document("doc.txt", data.len() as u64);

    let outcome = service.process_document(data, &document, None, None).await;

    assert!(matches!(outcome, ExtractionOutcome::Error(_)));
}

#[test]
fn given_oversized_file_when_validating_then_rejected_before_any_work() {
    let client = Arc::new(MockCompletionClient::returning("{}"));
    let service = service(Arc::clone(&client));

    let result = service.validate_upload("big.pdf", 60 * 1024 * 1024);

    assert!(matches!(
        result,
        Err(ValidationError::FileTooLarge { .. })
    ));
    assert_eq!(client.request_count(), 0);
}

#[test]
fn given_unsupported_extension_when_validating_then_rejected() {
    let client = Arc::new(MockCompletionClient::returning("{}"));
    let service = service(client);

    let result = service.validate_upload("malware.exe", 10);

    assert!(matches!(
        result,
        Err(ValidationError::UnsupportedFileType(_))
    ));
}

#[test]
fn given_supported_file_when_validating_then_accepted() {
    let client = Arc::new(MockCompletionClient::returning("{}"));
    let service = service(client);

    assert!(service.validate_upload("report.pdf", 1024).is_ok());
    assert!(service.validate_upload("notes.TXT", 1024).is_ok());
}

#[tokio::test]
async fn given_processed_documents_when_reading_stats_then_counters_advance() {
    let client = Arc::new(MockCompletionClient::returning(r#"{"names": []}"#));
    let service = service(client);

    let data = b"text";
    let document = text_document("doc.txt", data.len() as u64);
    service.process_document(data, &document, None, None).await;

    let stats = service.stats();
    assert_eq!(stats.documents_processed, 1);
    assert_eq!(stats.successful_extractions, 1);
    assert_eq!(stats.failed_extractions, 0);
}
