use std::str::FromStr;

use serde::Deserialize;

use crate::application::services::{DynamicQueryConfig, ExtractionConfig};
use crate::infrastructure::llm::OpenRouterConfig;

use super::Environment;

/// Application configuration, constructed once at process start and passed
/// by reference to the components that need it.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub openrouter: OpenRouterSettings,
    pub extraction: ExtractionSettings,
    pub dynamic_query: DynamicQuerySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub max_file_size_mb: usize,
    pub max_document_chars: usize,
    pub completion_max_tokens: u32,
    pub retry_max_tokens: u32,
}

/// Summarization thresholds preserve the policy shape (length plus query
/// phrasing); the numbers themselves are tunable, not contracts.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicQuerySettings {
    pub max_document_chars: usize,
    pub max_processed_chars: usize,
    pub chunking_threshold_chars: usize,
    pub chunk_target_chars: usize,
    pub short_document_chars: usize,
    pub long_document_chars: usize,
    pub completion_max_tokens: u32,
    pub intent_max_tokens: u32,
}

impl Settings {
    /// Builds settings from environment variables with defaults suitable
    /// for local development.
    pub fn from_env() -> Self {
        let extraction_defaults = ExtractionConfig::default();
        let dynamic_defaults = DynamicQueryConfig::default();
        let openrouter_defaults = OpenRouterConfig::default();

        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0".to_string()),
                port: env_or("SERVER_PORT", 8000),
            },
            openrouter: OpenRouterSettings {
                api_key: std::env::var("OPENROUTER_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                base_url: env_or("OPENROUTER_BASE_URL", openrouter_defaults.base_url),
                model: env_or("OPENROUTER_MODEL", openrouter_defaults.model),
                timeout_secs: env_or("OPENROUTER_TIMEOUT", openrouter_defaults.timeout_secs),
            },
            extraction: ExtractionSettings {
                max_file_size_mb: env_or("MAX_FILE_SIZE_MB", extraction_defaults.max_file_size_mb),
                max_document_chars: env_or(
                    "MAX_DOCUMENT_CHARS",
                    extraction_defaults.max_document_chars,
                ),
                completion_max_tokens: env_or(
                    "EXTRACTION_MAX_TOKENS",
                    extraction_defaults.completion_max_tokens,
                ),
                retry_max_tokens: env_or(
                    "EXTRACTION_RETRY_MAX_TOKENS",
                    extraction_defaults.retry_max_tokens,
                ),
            },
            dynamic_query: DynamicQuerySettings {
                max_document_chars: env_or(
                    "DYNAMIC_MAX_DOCUMENT_CHARS",
                    dynamic_defaults.max_document_chars,
                ),
                max_processed_chars: env_or(
                    "DYNAMIC_MAX_PROCESSED_CHARS",
                    dynamic_defaults.max_processed_chars,
                ),
                chunking_threshold_chars: env_or(
                    "DYNAMIC_CHUNKING_THRESHOLD_CHARS",
                    dynamic_defaults.chunking_threshold_chars,
                ),
                chunk_target_chars: env_or(
                    "DYNAMIC_CHUNK_TARGET_CHARS",
                    dynamic_defaults.chunk_target_chars,
                ),
                short_document_chars: env_or(
                    "SUMMARIZATION_SHORT_DOC_CHARS",
                    dynamic_defaults.short_document_chars,
                ),
                long_document_chars: env_or(
                    "SUMMARIZATION_LONG_DOC_CHARS",
                    dynamic_defaults.long_document_chars,
                ),
                completion_max_tokens: env_or(
                    "DYNAMIC_MAX_TOKENS",
                    dynamic_defaults.completion_max_tokens,
                ),
                intent_max_tokens: env_or(
                    "INTENT_MAX_TOKENS",
                    dynamic_defaults.intent_max_tokens,
                ),
            },
        }
    }

    pub fn environment(&self) -> Environment {
        std::env::var("APP_ENV")
            .ok()
            .and_then(|value| Environment::try_from(value).ok())
            .unwrap_or(Environment::Development)
    }

    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            max_file_size_mb: self.extraction.max_file_size_mb,
            max_document_chars: self.extraction.max_document_chars,
            completion_max_tokens: self.extraction.completion_max_tokens,
            retry_max_tokens: self.extraction.retry_max_tokens,
        }
    }

    pub fn dynamic_query_config(&self) -> DynamicQueryConfig {
        DynamicQueryConfig {
            max_document_chars: self.dynamic_query.max_document_chars,
            max_processed_chars: self.dynamic_query.max_processed_chars,
            chunking_threshold_chars: self.dynamic_query.chunking_threshold_chars,
            chunk_target_chars: self.dynamic_query.chunk_target_chars,
            short_document_chars: self.dynamic_query.short_document_chars,
            long_document_chars: self.dynamic_query.long_document_chars,
            completion_max_tokens: self.dynamic_query.completion_max_tokens,
            intent_max_tokens: self.dynamic_query.intent_max_tokens,
        }
    }

    pub fn openrouter_config(&self) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key: self.openrouter.api_key.clone(),
            base_url: self.openrouter.base_url.clone(),
            model: self.openrouter.model.clone(),
            timeout_secs: self.openrouter.timeout_secs,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let extraction = ExtractionConfig::default();
        let dynamic = DynamicQueryConfig::default();
        let openrouter = OpenRouterConfig::default();

        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            openrouter: OpenRouterSettings {
                api_key: None,
                base_url: openrouter.base_url,
                model: openrouter.model,
                timeout_secs: openrouter.timeout_secs,
            },
            extraction: ExtractionSettings {
                max_file_size_mb: extraction.max_file_size_mb,
                max_document_chars: extraction.max_document_chars,
                completion_max_tokens: extraction.completion_max_tokens,
                retry_max_tokens: extraction.retry_max_tokens,
            },
            dynamic_query: DynamicQuerySettings {
                max_document_chars: dynamic.max_document_chars,
                max_processed_chars: dynamic.max_processed_chars,
                chunking_threshold_chars: dynamic.chunking_threshold_chars,
                chunk_target_chars: dynamic.chunk_target_chars,
                short_document_chars: dynamic.short_document_chars,
                long_document_chars: dynamic.long_document_chars,
                completion_max_tokens: dynamic.completion_max_tokens,
                intent_max_tokens: dynamic.intent_max_tokens,
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
