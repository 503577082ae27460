mod config;
mod db;
mod errors;
mod insights;
mod llm_client;
mod models;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::insights::scheduler::start_scheduler;
use crate::insights::service::InsightService;
use crate::insights::store::PgInsightStore;
use crate::llm_client::{CompletionClient, LlmClient, WithRetry, WithTimeout};
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::store::PgUserStore;

/// First retry waits this long; each further retry doubles it.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Industry Insights API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize completion client: provider adapter, bounded per attempt, retried on transient errors
    let timeout = Duration::from_secs(config.completion_timeout_secs);
    let llm = LlmClient::new(config.model_credential.clone(), config.model.clone(), timeout)?;
    info!("LLM client initialized (model: {})", llm.model());
    let completion: Arc<dyn CompletionClient> = Arc::new(WithRetry::new(
        WithTimeout::new(llm, timeout),
        config.completion_max_attempts,
        RETRY_BASE_DELAY,
    ));

    let store = Arc::new(PgInsightStore::new(db.clone()));
    let insights = Arc::new(InsightService::new(store, completion));

    // Weekly refresh. Keep the handle alive for the lifetime of the server.
    let _scheduler = if config.refresh_enabled {
        Some(start_scheduler(insights.clone(), &config.refresh_cron).await?)
    } else {
        info!("Scheduled insight refresh disabled (ENABLE_INSIGHT_REFRESH=false)");
        None
    };

    // Build app state
    let state = AppState {
        insights,
        users: Arc::new(PgUserStore::new(db)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
