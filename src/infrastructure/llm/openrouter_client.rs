use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ChatOutcome, ChatRequest, CompletionClient, CompletionError, FinishReason,
};

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Absent key means AI endpoints are disabled; text extraction stays up.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.0-flash-exp".to_string(),
            timeout_secs: 300,
        }
    }
}

/// OpenRouter attribution headers sent with every request.
const REFERER_HEADER: (&str, &str) = ("HTTP-Referer", "https://github.com/docstract/docstract");
const TITLE_HEADER: (&str, &str) = ("X-Title", "docstract");

pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
    stats: SessionStats,
}

/// Eventually-consistent session counters; lost updates under concurrency
/// are acceptable.
#[derive(Debug, Default)]
struct SessionStats {
    requests_made: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_tokens_used: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStatsSnapshot {
    pub requests_made: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_tokens_used: u64,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    /// Auxiliary reasoning text exposed by some hosted models.
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u64>,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("OpenRouter API key not configured - AI features will be disabled");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            config,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStatsSnapshot {
        SessionStatsSnapshot {
            requests_made: self.stats.requests_made.load(Ordering::Relaxed),
            successful_requests: self.stats.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.stats.failed_requests.load(Ordering::Relaxed),
            total_tokens_used: self.stats.total_tokens_used.load(Ordering::Relaxed),
        }
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(CompletionError::Unavailable)
    }

    fn record(&self, success: bool, tokens: Option<u64>) {
        self.stats.requests_made.fetch_add(1, Ordering::Relaxed);
        if success {
            self.stats.successful_requests.fetch_add(1, Ordering::Relaxed);
            if let Some(total) = tokens {
                self.stats.total_tokens_used.fetch_add(total, Ordering::Relaxed);
            }
        } else {
            self.stats.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn send_completion(
        &self,
        request: ChatRequest,
    ) -> Result<ChatOutcome, CompletionError> {
        let api_key = self.api_key()?;

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header(REFERER_HEADER.0, REFERER_HEADER.1)
            .header(TITLE_HEADER.0, TITLE_HEADER.1)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiRequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let total_tokens = completion.usage.and_then(|usage| usage.total_tokens);
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("empty choices".to_string()))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            _ => FinishReason::Other,
        };

        Ok(ChatOutcome {
            content: choice.message.content.unwrap_or_default(),
            finish_reason,
            reasoning: choice.message.reasoning,
            total_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    #[tracing::instrument(skip(self, request), fields(max_tokens = request.max_tokens))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatOutcome, CompletionError> {
        match self.send_completion(request).await {
            Ok(outcome) => {
                self.record(true, outcome.total_tokens);
                Ok(outcome)
            }
            Err(error) => {
                if !matches!(error, CompletionError::Unavailable) {
                    self.record(false, None);
                }
                Err(error)
            }
        }
    }

    async fn health_check(&self) -> Result<(), CompletionError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .send()
            .await
            .map_err(|e| CompletionError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CompletionError::ApiRequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }
}
