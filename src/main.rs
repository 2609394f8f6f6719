use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use pricelens::catalog::JsonCatalog;
use pricelens::config::AppConfig;
use pricelens::embeddings::{self, Embedder};
use pricelens::index::{self, SemanticIndex};
use pricelens::llm::{self, Generator};
use pricelens::routes;
use pricelens::services::AppState;

/// Graceful shutdown signal handler
/// Listens for SIGINT (Ctrl+C) and SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::build().expect("Failed to load configuration");

    // 2. Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.rust_log))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting pricelens...");

    // 3. Initialize the embedding capability
    let embedder: Arc<dyn Embedder> = if config.embeddings.api_key == "mock" {
        tracing::warn!("Using mock embedder - not for production use");
        Arc::new(embeddings::MockEmbedder::new(config.embeddings.embedding_dim))
    } else {
        Arc::new(embeddings::CloudEmbedder::new(config.embeddings.clone())?)
    };

    // 4. Initialize the semantic index
    let index: Arc<dyn SemanticIndex> = if config.index.url == "memory" {
        tracing::warn!("Using in-memory index - contents are lost on restart");
        Arc::new(index::MemoryIndex::new(embedder.clone()))
    } else {
        let qdrant = index::QdrantIndex::new(
            config.index.clone(),
            embedder.clone(),
            config.embeddings.embedding_dim,
        )?;
        // The index may come up after us; ingestion is re-triggerable
        if let Err(e) = qdrant.ensure_collection().await {
            tracing::warn!(error = %e, "Could not verify Qdrant collection, continuing");
        }
        Arc::new(qdrant)
    };

    // 5. Initialize the language model capability
    let generator: Arc<dyn Generator> = if config.llm.api_key == "mock" {
        tracing::warn!("Using mock generator - not for production use");
        Arc::new(llm::MockGenerator)
    } else {
        Arc::new(llm::CloudGenerator::new(config.llm.clone())?)
    };

    // 6. Initialize App State (Services)
    let catalog = JsonCatalog::new(config.catalog.path.clone());
    let state = AppState::new(catalog, index.clone(), generator);

    // 7. Startup ingestion: run once in the background, log the outcome,
    // never block request handling on its completion
    let startup_ingest = state.ingest_service.clone();
    tokio::spawn(async move {
        match startup_ingest.ingest(false).await {
            Ok(outcome) => tracing::info!(?outcome, "Startup ingestion finished"),
            Err(e) => tracing::error!(error = %e, "Startup ingestion failed"),
        }
    });

    // 8. Setup Router
    let app = routes::create_router(state, index);

    // 9. Start Server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
