use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::application::ports::{ChatRequest, CompletionClient};
use crate::domain::{AiPayload, AiResult, ExtractionOutcome, OptimizationStats, PageMap};

use super::document_sectioner::{section_with_citations, SectionerConfig};
use super::prompts;
use super::response_parser::parse_model_response;

/// Queries that require the full text, never summaries.
const FULL_TEXT_INDICATORS: &[&str] = &[
    "extract all",
    "list all",
    "get all",
    "find all",
    "complete list",
    "full text",
    "entire",
    "whole",
];

/// Queries that benefit from summarized output.
const SUMMARY_INDICATORS: &[&str] = &[
    "summary",
    "overview",
    "brief",
    "main points",
    "key points",
    "important",
    "significant",
    "major",
    "primary",
];

/// Tunable knobs for dynamic-query processing. The summarization thresholds
/// preserve the policy shape (length plus query phrasing) but are
/// configuration, not contracts.
#[derive(Debug, Clone)]
pub struct DynamicQueryConfig {
    /// Character budget for document text embedded in the user prompt.
    pub max_document_chars: usize,
    /// Ceiling for the page-marked document produced by the sectioner.
    pub max_processed_chars: usize,
    pub chunking_threshold_chars: usize,
    pub chunk_target_chars: usize,
    /// Documents shorter than this never use summarization.
    pub short_document_chars: usize,
    /// Documents longer than this default to summarization.
    pub long_document_chars: usize,
    pub completion_max_tokens: u32,
    pub intent_max_tokens: u32,
}

impl Default for DynamicQueryConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 8_000,
            max_processed_chars: 24_000,
            chunking_threshold_chars: 2_000,
            chunk_target_chars: 1_000,
            short_document_chars: 3_000,
            long_document_chars: 5_000,
            completion_max_tokens: 3_000,
            intent_max_tokens: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    PageNumbers,
    Sections,
    None,
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "page_numbers" => Ok(Self::PageNumbers),
            "sections" => Ok(Self::Sections),
            "none" => Ok(Self::None),
            other => Err(format!(
                "Citation style must be 'page_numbers', 'sections', or 'none', got '{other}'"
            )),
        }
    }
}

/// Schema-free extraction: the model designs variable names, types, and
/// nesting from the natural-language query intent.
pub struct DynamicQueryService<C>
where
    C: CompletionClient,
{
    completion_client: Arc<C>,
    config: DynamicQueryConfig,
}

impl<C> DynamicQueryService<C>
where
    C: CompletionClient,
{
    pub fn new(completion_client: Arc<C>, config: DynamicQueryConfig) -> Self {
        Self {
            completion_client,
            config,
        }
    }

    #[tracing::instrument(skip(self, document_text, natural_query))]
    pub async fn process_dynamic_query(
        &self,
        document_text: &str,
        natural_query: &str,
        enable_summarization: bool,
        enable_citations: bool,
    ) -> ExtractionOutcome {
        let summarize = if enable_summarization { None } else { Some(false) };
        self.process_inner(document_text, natural_query, summarize, enable_citations)
            .await
    }

    /// Variant with explicit summarization and citation-style control.
    pub async fn process_with_custom_options(
        &self,
        document_text: &str,
        natural_query: &str,
        force_summarization: bool,
        citation_style: CitationStyle,
    ) -> ExtractionOutcome {
        let summarize = if force_summarization { Some(true) } else { None };
        let enable_citations = citation_style != CitationStyle::None;
        self.process_inner(document_text, natural_query, summarize, enable_citations)
            .await
    }

    /// `summarize`: `Some(flag)` forces the branch, `None` applies the
    /// length-and-phrasing heuristic.
    async fn process_inner(
        &self,
        document_text: &str,
        natural_query: &str,
        summarize: Option<bool>,
        enable_citations: bool,
    ) -> ExtractionOutcome {
        if !self.completion_client.is_available() {
            return ExtractionOutcome::error(
                "Dynamic query service not available - missing API key",
            );
        }

        let started = Instant::now();

        tracing::info!(
            query_chars = natural_query.chars().count(),
            doc_chars = document_text.chars().count(),
            citations = enable_citations,
            "Processing dynamic query"
        );

        let (processed_doc, page_map) = if enable_citations {
            let sectioned = section_with_citations(document_text, &self.sectioner_config());
            (sectioned.text, sectioned.page_map)
        } else {
            (document_text.to_string(), PageMap::new())
        };

        let use_summarization = summarize.unwrap_or_else(|| {
            should_use_summarization(&processed_doc, natural_query, &self.config)
        });

        tracing::debug!(
            pages = page_map.len(),
            summarization = use_summarization,
            "Document preprocessed for dynamic query"
        );

        let request = ChatRequest {
            system_prompt: prompts::build_dynamic_system_prompt(use_summarization, enable_citations),
            user_prompt: prompts::build_dynamic_user_prompt(
                &processed_doc,
                natural_query,
                use_summarization,
                enable_citations,
                self.config.max_document_chars,
            ),
            max_tokens: self.config.completion_max_tokens,
            temperature: 0.1,
            json_mode: true,
        };

        let completion = match self.completion_client.complete(request).await {
            Ok(completion) => completion,
            Err(error) => {
                tracing::error!(error = %error, "Dynamic query processing failed");
                return ExtractionOutcome::error(format!("Dynamic query failed: {error}"));
            }
        };

        if completion.content.trim().is_empty() {
            return ExtractionOutcome::error("Empty response from AI model");
        }

        let parsed = parse_model_response(&completion.content);
        if let Some(Value::String(message)) = parsed.get("error") {
            return ExtractionOutcome::error(message.clone());
        }

        let original_chars = document_text.chars().count();
        let processed_chars = processed_doc.chars().count();
        let processing_time = started.elapsed().as_secs_f64();

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            fields = parsed.len(),
            "Dynamic query completed"
        );

        ExtractionOutcome::Ai(AiResult {
            ai_extraction_result: AiPayload {
                status: "success".to_string(),
                message: "Dynamic query processed successfully".to_string(),
                query: natural_query.to_string(),
                schema_type: Some("dynamic".to_string()),
                data: Value::Object(parsed),
                processing_time: Some((processing_time * 100.0).round() / 100.0),
                summarization_used: Some(use_summarization),
                citations_enabled: Some(enable_citations),
                optimization_stats: Some(OptimizationStats {
                    original_doc_length: original_chars,
                    processed_doc_length: processed_chars,
                    token_savings: original_chars.saturating_sub(processed_chars),
                }),
            },
        })
    }

    /// Document-free preview of the structure a query would likely produce.
    pub async fn analyze_query_intent(&self, natural_query: &str) -> Map<String, Value> {
        if !self.completion_client.is_available() {
            return error_map("Service not available");
        }

        let request = ChatRequest {
            system_prompt: prompts::INTENT_ANALYSIS_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::build_intent_analysis_prompt(natural_query),
            max_tokens: self.config.intent_max_tokens,
            temperature: 0.0,
            json_mode: true,
        };

        match self.completion_client.complete(request).await {
            Ok(completion) if !completion.content.trim().is_empty() => {
                parse_model_response(&completion.content)
            }
            Ok(_) => error_map("Empty response from intent analysis"),
            Err(error) => {
                tracing::error!(error = %error, "Query intent analysis failed");
                error_map(&format!("Intent analysis failed: {error}"))
            }
        }
    }

    fn sectioner_config(&self) -> SectionerConfig {
        SectionerConfig {
            chunking_threshold_chars: self.config.chunking_threshold_chars,
            chunk_target_chars: self.config.chunk_target_chars,
            max_processed_chars: self.config.max_processed_chars,
        }
    }
}

/// Length-and-phrasing heuristic for summarization mode: short documents and
/// exhaustive queries keep the full text; summary-style queries and long
/// documents get summaries.
pub fn should_use_summarization(
    document_text: &str,
    query: &str,
    config: &DynamicQueryConfig,
) -> bool {
    let doc_chars = document_text.chars().count();
    if doc_chars < config.short_document_chars {
        return false;
    }

    let query_lower = query.to_lowercase();
    if FULL_TEXT_INDICATORS
        .iter()
        .any(|indicator| query_lower.contains(indicator))
    {
        return false;
    }

    if SUMMARY_INDICATORS
        .iter()
        .any(|indicator| query_lower.contains(indicator))
    {
        return true;
    }

    doc_chars > config.long_document_chars
}

fn error_map(message: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "error".to_string(),
        Value::String(message.to_string()),
    );
    map
}
