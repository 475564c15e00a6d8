mod config;
mod document;
mod errors;
mod llm_client;
mod negotiation;
mod references;
mod render;
mod routes;
mod session;
mod sow;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::references::{ClauseIndexSource, ReferenceSource, StaticReferenceSource};
use crate::routes::build_router;
use crate::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Clausewright API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let llm = LlmClient::new(&config.completion_base_url, config.completion_api_key.clone())?;
    info!(
        "Completion client initialized (model: {}, temperature: {})",
        config.model.model, config.model.temperature
    );

    // Scraping client shared by the clause index and user-supplied URLs
    let http = reqwest::Client::builder()
        .user_agent(concat!("clausewright/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let references: Arc<dyn ReferenceSource> = match &config.clause_index_url {
        Some(url) => {
            info!("Reference clauses from {url}");
            Arc::new(ClauseIndexSource::new(http.clone(), url.clone()))
        }
        None => {
            info!("Clause index disabled; using an empty static reference source");
            Arc::new(StaticReferenceSource(Vec::new()))
        }
    };

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!(
                "Redis session store initialized (ttl {}s)",
                config.session_ttl_secs
            );
            Arc::new(RedisSessionStore::new(client, config.session_ttl_secs))
        }
        None => {
            info!("In-memory session store initialized");
            Arc::new(InMemorySessionStore::new())
        }
    };

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        references,
        sessions,
        http,
        config: config.clone(),
    };

    // Build router
    // TODO: restrict CORS origins once the web frontend has a fixed host
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
