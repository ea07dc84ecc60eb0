mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod roster;
mod routes;
mod services;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::interview::integrity::DirectiveDisplay;
use crate::interview::orchestrator::{Orchestrator, StationDeps};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::services::http_backend::HttpServices;
use crate::services::llm_backend::LlmServices;
use crate::services::InterviewServices;
use crate::state::AppState;
use crate::storage::postgres::PgRosterRepository;
use crate::storage::redis::RedisSessionStore;
use crate::storage::{MemoryRosterRepository, MemorySessionStore, RosterRepository, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("interview_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; the /api/* endpoints always call it in-process
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let ai: Arc<dyn InterviewServices> = Arc::new(LlmServices::new(llm));

    let services: Arc<dyn InterviewServices> = match &config.services_base_url {
        Some(url) => {
            info!("Station uses interview services at {url}");
            Arc::new(HttpServices::new(url.as_str()))
        }
        None => Arc::clone(&ai),
    };

    // Roster: PostgreSQL when configured
    let roster: Arc<dyn RosterRepository> = match &config.database_url {
        Some(url) => {
            let db = create_pool(url).await?;
            ensure_schema(&db).await?;
            Arc::new(PgRosterRepository::new(db))
        }
        None => {
            warn!("DATABASE_URL not set, roster is kept in memory only");
            Arc::new(MemoryRosterRepository::default())
        }
    };

    // Session snapshot: Redis when configured
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Redis client initialized (key: {})", config.session_key);
            Arc::new(RedisSessionStore::new(redis, config.session_key.clone()))
        }
        None => {
            warn!("REDIS_URL not set, session snapshot is kept in memory only");
            Arc::new(MemorySessionStore::default())
        }
    };

    // Start the interview station
    let (display, directives) = DirectiveDisplay::new();
    let (orchestrator, station) = Orchestrator::restore(StationDeps {
        services,
        sessions,
        roster,
        display: Arc::new(display),
    })
    .await?;
    tokio::spawn(orchestrator.run());

    // Build app state
    let state = AppState {
        station,
        ai,
        display: directives,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
