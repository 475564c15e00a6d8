use anyhow::{bail, Context, Result};

pub const DEFAULT_COMPLETION_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CLAUSE_INDEX_URL: &str = "https://www.lawinsider.com/clause/scope-of-work";
pub const MAX_NEGOTIATION_ROUNDS: u32 = 10;

/// Model parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion_api_key: String,
    pub completion_base_url: String,
    pub model: ModelSettings,
    /// `None` when the fixed clause index is switched off (`CLAUSE_INDEX_URL=off`).
    pub clause_index_url: Option<String>,
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub negotiation_rounds: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let temperature = optional_env("COMPLETION_TEMPERATURE")
            .map(|v| v.parse::<f32>())
            .transpose()
            .context("COMPLETION_TEMPERATURE must be a number")?
            .unwrap_or(0.5);
        if !(0.0..=2.0).contains(&temperature) {
            bail!("COMPLETION_TEMPERATURE must be between 0.0 and 2.0, got {temperature}");
        }

        let negotiation_rounds = optional_env("NEGOTIATION_ROUNDS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("NEGOTIATION_ROUNDS must be a positive integer")?
            .unwrap_or(3);
        if negotiation_rounds == 0 || negotiation_rounds > MAX_NEGOTIATION_ROUNDS {
            bail!("NEGOTIATION_ROUNDS must be between 1 and {MAX_NEGOTIATION_ROUNDS}");
        }

        Ok(Config {
            completion_api_key: require_env("OPENAI_API_KEY")?,
            completion_base_url: optional_env("COMPLETION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_BASE_URL.to_string()),
            model: ModelSettings {
                model: optional_env("COMPLETION_MODEL")
                    .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
                temperature,
            },
            clause_index_url: parse_clause_index_url(optional_env("CLAUSE_INDEX_URL")),
            redis_url: optional_env("REDIS_URL"),
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("SESSION_TTL_SECS must be a number of seconds")?
                .unwrap_or(3600),
            negotiation_rounds,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an env var, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_clause_index_url(value: Option<String>) -> Option<String> {
    match value {
        Some(v) if v.eq_ignore_ascii_case("off") => None,
        Some(v) => Some(v),
        None => Some(DEFAULT_CLAUSE_INDEX_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_index_defaults_to_lawinsider() {
        assert_eq!(
            parse_clause_index_url(None).as_deref(),
            Some(DEFAULT_CLAUSE_INDEX_URL)
        );
    }

    #[test]
    fn test_clause_index_can_be_switched_off() {
        assert_eq!(parse_clause_index_url(Some("OFF".to_string())), None);
    }

    #[test]
    fn test_clause_index_custom_url_kept() {
        let url = "http://localhost:9000/clauses".to_string();
        assert_eq!(parse_clause_index_url(Some(url.clone())), Some(url));
    }
}
