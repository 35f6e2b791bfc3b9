mod document_sectioner;
mod dynamic_query_service;
mod extraction_service;
mod processing_stats;
mod prompts;
mod response_parser;

pub use document_sectioner::{section_with_citations, SectionedDocument, SectionerConfig};
pub use dynamic_query_service::{
    should_use_summarization, CitationStyle, DynamicQueryConfig, DynamicQueryService,
};
pub use extraction_service::{ExtractionConfig, ExtractionService, ValidationError};
pub use processing_stats::{ProcessingStats, ProcessingStatsSnapshot};
pub use prompts::{DEFAULT_EXTRACTION_GOAL, TEMPLATE_CATALOG};
pub use response_parser::parse_model_response;
