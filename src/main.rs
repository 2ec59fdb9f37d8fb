use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use gist_searching_lib::{server, Args, GistSearcher, SearchConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env must be loaded before clap reads its env fallbacks
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = SearchConfig::from(&args);
    if config.token.is_none() {
        warn!("GITHUB_TOKEN not provided, unauthenticated GitHub rate limits apply");
    }
    info!(
        "Searching via {} ({} gists per page, {} gists x {} files, at most {} retrievals in flight)",
        config.api_base_url,
        config.per_page,
        config.gist_concurrency,
        config.file_concurrency,
        config.max_in_flight()
    );

    let searcher = Arc::new(GistSearcher::new(config)?);
    let app = server::router(searcher);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Listening on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
