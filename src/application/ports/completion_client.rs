use async_trait::async_trait;

/// Chat-completion request sent to the hosted model endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub json_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    /// Completion was cut off by the output-token limit.
    Length,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub content: String,
    pub finish_reason: FinishReason,
    /// Auxiliary reasoning text some models expose alongside the completion.
    pub reasoning: Option<String>,
    pub total_tokens: Option<u64>,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatOutcome, CompletionError>;

    async fn health_check(&self) -> Result<(), CompletionError>;

    /// Whether the client can reach the model endpoint at all (an API key is
    /// configured). Text extraction stays usable when this is false.
    fn is_available(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion client not available - missing API key")]
    Unavailable,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
