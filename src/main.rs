use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use docstract::application::services::{DynamicQueryService, ExtractionService};
use docstract::infrastructure::llm::OpenRouterClient;
use docstract::infrastructure::observability::{init_tracing, TracingConfig};
use docstract::infrastructure::text_processing::CompositeFileLoader;
use docstract::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    let file_loader = Arc::new(CompositeFileLoader::with_default_adapters());
    let completion_client = Arc::new(OpenRouterClient::new(settings.openrouter_config()));

    let extraction_service = Arc::new(ExtractionService::new(
        Arc::clone(&file_loader),
        Arc::clone(&completion_client),
        settings.extraction_config(),
    ));

    let dynamic_query_service = Arc::new(DynamicQueryService::new(
        Arc::clone(&completion_client),
        settings.dynamic_query_config(),
    ));

    let addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState {
        extraction_service,
        dynamic_query_service,
        completion_client,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
