use std::sync::Arc;

use docstract::application::services::{
    should_use_summarization, CitationStyle, DynamicQueryConfig, DynamicQueryService,
};
use docstract::domain::ExtractionOutcome;
use serde_json::json;

use crate::helpers::MockCompletionClient;

fn service(client: Arc<MockCompletionClient>) -> DynamicQueryService<MockCompletionClient> {
    DynamicQueryService::new(client, DynamicQueryConfig::default())
}

#[tokio::test]
async fn given_query_when_processing_then_returns_dynamic_ai_envelope() {
    let client = Arc::new(MockCompletionClient::returning(
        r#"{"products": [{"name": "Widget", "sku": "W-1"}]}"#,
    ));
    let service = service(Arc::clone(&client));

    let outcome = service
        .process_dynamic_query("Widget W-1 is in stock", "Extract all product names and SKUs", true, true)
        .await;

    let serialized = serde_json::to_value(&outcome).unwrap();
    let envelope = &serialized["ai_extraction_result"];
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["schema_type"], "dynamic");
    assert_eq!(envelope["query"], "Extract all product names and SKUs");
    assert_eq!(
        envelope["data"]["products"],
        json!([{"name": "Widget", "sku": "W-1"}])
    );
    assert_eq!(envelope["citations_enabled"], json!(true));
    assert!(envelope["optimization_stats"]["processed_doc_length"].is_number());

    let request = client.request(0);
    assert!(request.system_prompt.contains("CITATION MODE ACTIVE"));
    assert!(request.user_prompt.contains("[PAGE 1]"));
}

#[tokio::test]
async fn given_citations_disabled_when_processing_then_no_page_markers_are_sent() {
    let client = Arc::new(MockCompletionClient::returning(r#"{"items": []}"#));
    let service = service(Arc::clone(&client));

    let outcome = service
        .process_dynamic_query("plain document text", "find items", true, false)
        .await;

    let request = client.request(0);
    assert!(!request.system_prompt.contains("CITATION MODE ACTIVE"));
    assert!(!request.user_prompt.contains("[PAGE 1]"));

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        serialized["ai_extraction_result"]["citations_enabled"],
        json!(false)
    );
}

#[tokio::test]
async fn given_unavailable_client_when_processing_then_returns_error_result() {
    let client = Arc::new(MockCompletionClient::unavailable());
    let service = service(client);

    let outcome = service
        .process_dynamic_query("text", "query", true, true)
        .await;

    match outcome {
        ExtractionOutcome::Error(error) => {
            assert!(error.error.contains("missing API key"));
        }
        other => panic!("expected error result, got {other:?}"),
    }
}

#[tokio::test]
async fn given_unparseable_response_when_processing_then_error_result_carries_parser_message() {
    let client = Arc::new(MockCompletionClient::returning(
        "no structured data here at all",
    ));
    let service = service(client);

    let outcome = service
        .process_dynamic_query("document", "query", true, true)
        .await;

    match outcome {
        ExtractionOutcome::Error(error) => {
            assert!(error.error.contains("Could not parse"));
        }
        other => panic!("expected error result, got {other:?}"),
    }
}

#[tokio::test]
async fn given_none_citation_style_when_using_custom_options_then_citations_are_off() {
    let client = Arc::new(MockCompletionClient::returning(r#"{"points": []}"#));
    let service = service(Arc::clone(&client));

    service
        .process_with_custom_options("text body", "main points", false, CitationStyle::None)
        .await;

    let request = client.request(0);
    assert!(!request.system_prompt.contains("CITATION MODE ACTIVE"));
}

#[tokio::test]
async fn given_forced_summarization_when_using_custom_options_then_summary_mode_is_on() {
    let client = Arc::new(MockCompletionClient::returning(r#"{"points": []}"#));
    let service = service(Arc::clone(&client));

    let outcome = service
        .process_with_custom_options("tiny text", "main points", true, CitationStyle::PageNumbers)
        .await;

    let request = client.request(0);
    assert!(request.system_prompt.contains("SUMMARIZATION MODE ACTIVE"));

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        serialized["ai_extraction_result"]["summarization_used"],
        json!(true)
    );
}

#[tokio::test]
async fn given_intent_analysis_when_client_responds_then_parsed_mapping_is_returned() {
    let client = Arc::new(MockCompletionClient::returning(
        r#"{"main_entities": ["teams"], "structure_type": "array_of_objects"}"#,
    ));
    let service = service(Arc::clone(&client));

    let analysis = service.analyze_query_intent("Extract teams and scores").await;

    assert_eq!(analysis.get("main_entities"), Some(&json!(["teams"])));
    let request = client.request(0);
    assert_eq!(request.temperature, 0.0);
    assert!(request.user_prompt.contains("Extract teams and scores"));
}

#[tokio::test]
async fn given_intent_analysis_without_api_key_then_error_mapping_is_returned() {
    let client = Arc::new(MockCompletionClient::unavailable());
    let service = service(client);

    let analysis = service.analyze_query_intent("anything").await;

    assert!(analysis.contains_key("error"));
}

#[test]
fn given_short_document_then_summarization_is_off() {
    let config = DynamicQueryConfig::default();
    assert!(!should_use_summarization("short text", "give me a summary", &config));
}

#[test]
fn given_full_text_indicator_then_summarization_is_off_even_for_long_documents() {
    let config = DynamicQueryConfig::default();
    let long_doc = "x".repeat(10_000);
    assert!(!should_use_summarization(&long_doc, "Extract all invoices", &config));
}

#[test]
fn given_summary_indicator_and_medium_document_then_summarization_is_on() {
    let config = DynamicQueryConfig::default();
    let medium_doc = "x".repeat(4_000);
    assert!(should_use_summarization(
        &medium_doc,
        "Give me an overview of the findings",
        &config
    ));
}

#[test]
fn given_medium_document_and_neutral_query_then_summarization_is_off() {
    let config = DynamicQueryConfig::default();
    let medium_doc = "x".repeat(4_000);
    assert!(!should_use_summarization(&medium_doc, "find the invoice totals", &config));
}

#[test]
fn given_long_document_and_neutral_query_then_summarization_defaults_on() {
    let config = DynamicQueryConfig::default();
    let long_doc = "x".repeat(6_000);
    assert!(should_use_summarization(&long_doc, "find the invoice totals", &config));
}
