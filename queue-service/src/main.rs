//! Queue service binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use channel_queue_service::{
    AppState, PgQueueStore, SchemaBootstrap, ServiceConfig, WebhookNotifier, create_router,
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env feeds the clap env fallbacks, so it loads first
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ServiceConfig::parse();

    let store = PgQueueStore::connect_lazy(&config).context("invalid database settings")?;
    let webhook = match config.webhook_url() {
        Some(url) => Some(
            WebhookNotifier::new(url, config.webhook_timeout())
                .context("failed to build webhook client")?,
        ),
        None => {
            warn!("N8N_WEBHOOK_URL is not set; inserts will not notify a webhook");
            None
        }
    };
    let state = Arc::new(AppState::new(Arc::new(store), webhook));

    match state.store.ping().await {
        Ok(()) => info!("Database connection successful"),
        Err(e) => error!("Database connection failed: {}", e),
    }

    if config.schema_bootstrap == SchemaBootstrap::Startup {
        if let Err(e) = state.ensure_schema().await {
            warn!("Schema bootstrap failed, retrying on first request: {}", e);
        }
    }

    let app = create_router(state);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
