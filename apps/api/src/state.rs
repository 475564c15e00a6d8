use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Completion;
use crate::references::ReferenceSource;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production.
    pub llm: Arc<dyn Completion>,
    /// Fixed reference-clause source. Clause index scraper, or a static list when disabled.
    pub references: Arc<dyn ReferenceSource>,
    pub sessions: Arc<dyn SessionStore>,
    /// Plain HTTP client for scraping user-supplied URLs.
    pub http: reqwest::Client,
    pub config: Config,
}
