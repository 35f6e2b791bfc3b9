use std::sync::Arc;

use crate::application::ports::{CompletionClient, FileLoader};
use crate::application::services::{DynamicQueryService, ExtractionService};
use crate::presentation::config::Settings;

pub struct AppState<F, C>
where
    F: FileLoader,
    C: CompletionClient,
{
    pub extraction_service: Arc<ExtractionService<F, C>>,
    pub dynamic_query_service: Arc<DynamicQueryService<C>>,
    pub completion_client: Arc<C>,
    pub settings: Settings,
}

impl<F, C> Clone for AppState<F, C>
where
    F: FileLoader,
    C: CompletionClient,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
            dynamic_query_service: Arc::clone(&self.dynamic_query_service),
            completion_client: Arc::clone(&self.completion_client),
            settings: self.settings.clone(),
        }
    }
}
