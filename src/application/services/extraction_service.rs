use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::application::ports::{
    ChatRequest, CompletionClient, CompletionError, FileLoader, FileLoaderError, FinishReason,
};
use crate::domain::{
    AiPayload, AiResult, ContentType, Document, ExtractionOutcome, TemplateResult,
};

use super::processing_stats::{ProcessingStats, ProcessingStatsSnapshot};
use super::prompts;
use super::response_parser::parse_model_response;

const TRUNCATED_COMPLETION_ERROR: &str = "Model response was truncated and no valid JSON could be \
     extracted. Try a shorter document or simpler extraction prompt.";

/// Tunable knobs for the single-stage extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub max_file_size_mb: usize,
    /// Character budget for document text embedded in the user prompt.
    pub max_document_chars: usize,
    pub completion_max_tokens: u32,
    /// Raised output-token budget for the single retry after a truncated
    /// completion.
    pub retry_max_tokens: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            max_document_chars: 8_000,
            completion_max_tokens: 2_000,
            retry_max_tokens: 4_000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("file size ({size} bytes) exceeds maximum allowed size ({max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
    #[error("unsupported file type: {0}. Supported types: .pdf, .docx, .txt, .png, .jpg, .jpeg")]
    UnsupportedFileType(String),
    #[error("no file provided")]
    MissingFile,
    #[error("query cannot be empty")]
    EmptyQuery,
}

/// Coordinates text extraction and single-stage AI extraction: builds the
/// prompt pair for a template or custom goal, calls the model, and recovers
/// a structured result from its response.
pub struct ExtractionService<F, C>
where
    F: FileLoader,
    C: CompletionClient,
{
    file_loader: Arc<F>,
    completion_client: Arc<C>,
    config: ExtractionConfig,
    stats: ProcessingStats,
}

impl<F, C> ExtractionService<F, C>
where
    F: FileLoader,
    C: CompletionClient,
{
    pub fn new(file_loader: Arc<F>, completion_client: Arc<C>, config: ExtractionConfig) -> Self {
        Self {
            file_loader,
            completion_client,
            config,
            stats: ProcessingStats::new(),
        }
    }

    /// Size and file-type limits, checked before any decode or model work.
    pub fn validate_upload(&self, filename: &str, size_bytes: u64) -> Result<(), ValidationError> {
        let max = (self.config.max_file_size_mb as u64) * 1024 * 1024;
        if size_bytes > max {
            return Err(ValidationError::FileTooLarge {
                size: size_bytes,
                max,
            });
        }

        if ContentType::from_extension(filename).is_none() {
            return Err(ValidationError::UnsupportedFileType(filename.to_string()));
        }

        Ok(())
    }

    pub async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        self.file_loader.extract_text(data, document).await
    }

    /// Full pipeline for one uploaded document. Extraction and model
    /// failures surface as `ErrorResult` payloads, never as hard errors.
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    pub async fn process_document(
        &self,
        data: &[u8],
        document: &Document,
        template: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> ExtractionOutcome {
        let started = Instant::now();

        let document_text = match self.file_loader.extract_text(data, document).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(error = %error, "Text extraction failed");
                self.record(started, false);
                return ExtractionOutcome::error(format!("Text extraction failed: {error}"));
            }
        };

        match self
            .run_single_stage(&document_text, template, custom_prompt)
            .await
        {
            Ok(outcome) => {
                let success = !matches!(outcome, ExtractionOutcome::Error(_));
                self.record(started, success);
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Document processing completed"
                );
                outcome
            }
            Err(error) => {
                tracing::error!(error = %error, "AI extraction failed");
                self.record(started, false);
                ExtractionOutcome::error(format!("AI extraction failed: {error}"))
            }
        }
    }

    async fn run_single_stage(
        &self,
        document_text: &str,
        template: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> Result<ExtractionOutcome, CompletionError> {
        let recognized_template = template.filter(|name| prompts::is_known_template(name));

        let extraction_goal = match (recognized_template, custom_prompt) {
            (Some(name), _) => prompts::template_goal(name)
                .unwrap_or(prompts::DEFAULT_EXTRACTION_GOAL)
                .to_string(),
            (None, Some(prompt)) if !prompt.trim().is_empty() => prompt.to_string(),
            _ => prompts::DEFAULT_EXTRACTION_GOAL.to_string(),
        };

        let request = ChatRequest {
            system_prompt: prompts::build_extraction_system_prompt(
                &extraction_goal,
                recognized_template,
            ),
            user_prompt: prompts::build_extraction_user_prompt(
                document_text,
                &extraction_goal,
                recognized_template,
                self.config.max_document_chars,
            ),
            max_tokens: self.config.completion_max_tokens,
            temperature: 0.0,
            json_mode: true,
        };

        tracing::info!(
            template = recognized_template.unwrap_or("none"),
            doc_chars = document_text.chars().count(),
            "Starting single-stage extraction"
        );

        let mut completion = self.completion_client.complete(request.clone()).await?;
        let mut recovered_from_reasoning: Option<Map<String, Value>> = None;

        if completion.finish_reason == FinishReason::Length {
            tracing::warn!(
                content_chars = completion.content.chars().count(),
                "Completion truncated by output-token limit"
            );

            if let Some(reasoning) = completion.reasoning.as_deref() {
                let parsed = parse_model_response(reasoning);
                if !parsed.contains_key("error") && !parsed.contains_key("raw_response") {
                    tracing::info!("Recovered structured data from reasoning field");
                    recovered_from_reasoning = Some(parsed);
                }
            }

            if recovered_from_reasoning.is_none() {
                tracing::info!(
                    max_tokens = self.config.retry_max_tokens,
                    "Retrying with higher token limit"
                );
                completion = self
                    .completion_client
                    .complete(ChatRequest {
                        max_tokens: self.config.retry_max_tokens,
                        ..request
                    })
                    .await?;

                if completion.content.trim().is_empty() {
                    return Ok(ExtractionOutcome::error(TRUNCATED_COMPLETION_ERROR));
                }
            }
        }

        if recovered_from_reasoning.is_none() && completion.content.trim().is_empty() {
            return Err(CompletionError::InvalidResponse(
                "empty response from extraction model".to_string(),
            ));
        }

        let extracted = recovered_from_reasoning
            .unwrap_or_else(|| parse_model_response(&completion.content));

        if recognized_template.is_some() {
            Ok(ExtractionOutcome::Template(TemplateResult {
                fields: coerce_to_string_arrays(extracted),
            }))
        } else {
            Ok(ExtractionOutcome::Ai(AiResult {
                ai_extraction_result: AiPayload {
                    status: "success".to_string(),
                    message: "Extraction completed successfully".to_string(),
                    query: extraction_goal,
                    schema_type: None,
                    data: Value::Object(extracted),
                    processing_time: None,
                    summarization_used: None,
                    citations_enabled: None,
                    optimization_stats: None,
                },
            }))
        }
    }

    pub fn available_templates(&self) -> Vec<(&'static str, &'static str)> {
        prompts::TEMPLATE_CATALOG.to_vec()
    }

    pub fn stats(&self) -> ProcessingStatsSnapshot {
        self.stats.snapshot()
    }

    fn record(&self, started: Instant, success: bool) {
        self.stats
            .record(started.elapsed().as_millis() as u64, success);
    }
}

/// Template field lists are always arrays of strings, even when the model
/// returned scalars or nulls.
fn coerce_to_string_arrays(extracted: Map<String, Value>) -> Map<String, Value> {
    extracted
        .into_iter()
        .map(|(field, value)| {
            let items = match value {
                Value::Array(items) => items.into_iter().map(coerce_to_string).collect(),
                Value::Null => Vec::new(),
                other => vec![coerce_to_string(other)],
            };
            (field, Value::Array(items))
        })
        .collect()
}

fn coerce_to_string(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(text),
        other => Value::String(other.to_string()),
    }
}
