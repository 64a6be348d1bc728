use fund_rag_chatbot::{api::start_server, bootstrap, config::Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    bootstrap::init_tracing();

    let config = Config::from_env()?;

    info!("Fund RAG Chatbot - API Server");
    info!(data_dir = %config.data_dir.display(), "Loading dataset");

    // Schema errors abort here, before the server binds
    let pipeline = Arc::new(bootstrap::build_pipeline(&config)?);

    info!("Starting API server on {}", config.bind_address());

    start_server(pipeline, &config.bind_address()).await?;

    Ok(())
}
