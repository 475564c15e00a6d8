//! Reference Clause Collector: example clauses that steer SoW drafting.
//!
//! Three independent, best-effort paths feed one ordered clause set:
//! 1. the fixed clause index (a pluggable `ReferenceSource`); failures propagate
//! 2. user-pasted text, used verbatim when non-blank
//! 3. an arbitrary URL; failures degrade to a placeholder string

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

/// Maximum clauses taken from the fixed clause index.
pub const MAX_INDEX_CLAUSES: usize = 5;
/// Maximum paragraphs taken from a user-supplied URL.
pub const MAX_URL_PARAGRAPHS: usize = 10;
/// Prefix of the placeholder returned when a user-supplied URL cannot be read.
pub const URL_ERROR_PREFIX: &str = "[Error fetching URL content:";

const CLAUSE_SELECTOR: &str = ".clause-body";
const PARAGRAPH_SELECTOR: &str = "p";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid selector '{0}'")]
    Selector(String),
}

/// A source of reference clauses. Swappable so offline or alternative
/// sources can replace the scraped clause index.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_clauses(&self) -> Result<Vec<String>, ScrapeError>;
}

/// Scrapes `.clause-body` nodes from a public clause-index page.
pub struct ClauseIndexSource {
    client: Client,
    url: String,
}

impl ClauseIndexSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReferenceSource for ClauseIndexSource {
    async fn fetch_clauses(&self) -> Result<Vec<String>, ScrapeError> {
        let html = fetch_html(&self.client, &self.url).await?;
        let clauses = select_texts(&html, CLAUSE_SELECTOR, MAX_INDEX_CLAUSES)?;
        info!("Fetched {} reference clauses from {}", clauses.len(), self.url);
        Ok(clauses)
    }
}

/// A fixed, in-process list of clauses.
pub struct StaticReferenceSource(pub Vec<String>);

#[async_trait]
impl ReferenceSource for StaticReferenceSource {
    async fn fetch_clauses(&self) -> Result<Vec<String>, ScrapeError> {
        Ok(self.0.clone())
    }
}

/// Scrapes the first paragraphs of an arbitrary page.
/// Never fails: any error becomes a single placeholder string.
pub async fn fetch_text_from_url(client: &Client, url: &str) -> String {
    let result = async {
        let html = fetch_html(client, url).await?;
        let paragraphs = select_texts(&html, PARAGRAPH_SELECTOR, MAX_URL_PARAGRAPHS)?;
        Ok::<_, ScrapeError>(paragraphs.join("\n"))
    }
    .await;

    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Falling back to placeholder for {url}: {e}");
            format!("{URL_ERROR_PREFIX} {e}]")
        }
    }
}

/// Builds the clause set in collection order: fixed source, pasted text, URL.
pub async fn collect_clauses(
    source: &dyn ReferenceSource,
    client: &Client,
    custom_text: Option<&str>,
    url: Option<&str>,
) -> Result<Vec<String>, ScrapeError> {
    let mut clauses = source.fetch_clauses().await?;

    if let Some(custom) = custom_text.map(str::trim).filter(|t| !t.is_empty()) {
        clauses.push(custom.to_string());
    }

    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        clauses.push(fetch_text_from_url(client, url).await);
    }

    Ok(clauses)
}

async fn fetch_html(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let wrap = |source| ScrapeError::Http {
        url: url.to_string(),
        source,
    };

    client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?
        .text()
        .await
        .map_err(wrap)
}

/// Text of the first `limit` nodes matching `selector`, each trimmed; blank nodes are kept
/// so positions line up with the page.
fn select_texts(html: &str, selector: &str, limit: usize) -> Result<Vec<String>, ScrapeError> {
    let selector = Selector::parse(selector).map_err(|_| ScrapeError::Selector(selector.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .take(limit)
        .map(stripped_text)
        .collect())
}

/// Joins an element's text fragments after stripping each one.
///
/// Fragments are separated by a single space, so `<b>Net</b>30` reads
/// "Net 30" rather than "Net30".
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
