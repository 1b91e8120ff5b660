use reddit_client::{PostFetcher, RedditClient, RetryConfig};
use sentiment_engine::SentimentClassifier;
use std::sync::Arc;
use threadmood_core::{AppConfig, CoreError, ErrorExt};
use tracing_subscriber::EnvFilter;
use web::{create_router, AppState};

const DEFAULT_LOG_FILTER: &str = "threadmood=info,web=info,reddit_client=info,sentiment_engine=info";

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Threadmood - Reddit Sentiment Analyzer");

    run().await.map_err(|e| {
        e.log_error();
        tracing::error!("{}", e.user_friendly_message());
        e
    })
}

async fn run() -> Result<(), CoreError> {
    let config = AppConfig::load()?;

    let client = RedditClient::new(&config.reddit)?;
    let fetcher = PostFetcher::new(Arc::new(client), RetryConfig::reddit());
    let state = AppState::new(fetcher, SentimentClassifier::vader());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
