use docstract::domain::{
    AiPayload, AiResult, ErrorResult, ExtractionOutcome, TemplateResult,
};
use serde_json::json;

#[test]
fn given_template_outcome_when_serializing_then_fields_are_flattened() {
    let mut fields = serde_json::Map::new();
    fields.insert("emails".to_string(), json!(["a@b.com"]));
    fields.insert("subjects".to_string(), json!([]));

    let outcome = ExtractionOutcome::Template(TemplateResult { fields });
    let serialized = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        serialized,
        json!({"emails": ["a@b.com"], "subjects": []})
    );
}

#[test]
fn given_error_outcome_when_serializing_then_only_error_field_is_present() {
    let outcome = ExtractionOutcome::error("something went wrong");
    let serialized = serde_json::to_value(&outcome).unwrap();

    assert_eq!(serialized, json!({"error": "something went wrong"}));
}

#[test]
fn given_ai_outcome_when_serializing_then_envelope_is_nested_and_optionals_are_omitted() {
    let outcome = ExtractionOutcome::Ai(AiResult {
        ai_extraction_result: AiPayload {
            status: "success".to_string(),
            message: "Extraction completed successfully".to_string(),
            query: "Extract contact information".to_string(),
            schema_type: None,
            data: json!({"contacts": ["John Doe"]}),
            processing_time: None,
            summarization_used: None,
            citations_enabled: None,
            optimization_stats: None,
        },
    });
    let serialized = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        serialized,
        json!({
            "ai_extraction_result": {
                "status": "success",
                "message": "Extraction completed successfully",
                "query": "Extract contact information",
                "data": {"contacts": ["John Doe"]}
            }
        })
    );
}

#[test]
fn given_the_three_variants_when_serializing_then_required_fields_never_overlap() {
    let template = serde_json::to_value(ExtractionOutcome::Template(TemplateResult::default()))
        .unwrap();
    let error =
        serde_json::to_value(ExtractionOutcome::Error(ErrorResult {
            error: "boom".to_string(),
        }))
        .unwrap();

    assert!(template.get("error").is_none());
    assert!(template.get("ai_extraction_result").is_none());
    assert!(error.get("ai_extraction_result").is_none());
}
