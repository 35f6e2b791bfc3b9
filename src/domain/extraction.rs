use serde::Serialize;
use serde_json::Value;

/// Outcome of a document extraction request.
///
/// Serialized untagged: the three variants carry disjoint required fields
/// (`error` for errors, `ai_extraction_result` for AI-shaped results, the
/// flattened field map for template results), so the consumer can always
/// tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Ai(AiResult),
    Error(ErrorResult),
    Template(TemplateResult),
}

impl ExtractionOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResult {
            error: message.into(),
        })
    }
}

/// Template extraction result: field name to the list of extracted values.
/// Every value is an array of strings, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateResult {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResult {
    pub ai_extraction_result: AiPayload,
}

/// Envelope around AI-driven extraction data, echoing the query and carrying
/// optional processing metadata for the dynamic-query path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiPayload {
    pub status: String,
    pub message: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarization_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_stats: Option<OptimizationStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationStats {
    pub original_doc_length: usize,
    pub processed_doc_length: usize,
    pub token_savings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResult {
    pub error: String,
}
