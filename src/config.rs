use crate::scrapers::firecrawl::DEFAULT_BASE_URL as FIRECRAWL_BASE_URL;
use crate::scrapers::ListingSource;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model_id: String,
    pub listing_sources: Vec<ListingSource>,
    pub market_region: String,
    pub extract_poll_interval: Duration,
    pub extract_max_polls: u32,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY must be set")?,
            firecrawl_base_url: env::var("FIRECRAWL_BASE_URL")
                .unwrap_or_else(|_| FIRECRAWL_BASE_URL.to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model_id: env::var("MODEL_ID").unwrap_or_else(|_| "gpt-4o".to_string()),
            listing_sources: parse_sources(
                &env::var("LISTING_SOURCES").unwrap_or_else(|_| "propertyfinder".to_string()),
            )?,
            market_region: env::var("MARKET_REGION").unwrap_or_else(|_| "dubai".to_string()),
            extract_poll_interval: Duration::from_millis(
                env::var("EXTRACT_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .context("EXTRACT_POLL_INTERVAL_MS must be a valid number")?,
            ),
            extract_max_polls: env::var("EXTRACT_MAX_POLLS")
                .unwrap_or_else(|_| "150".to_string())
                .parse()
                .context("EXTRACT_MAX_POLLS must be a valid number")?,
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("HTTP_TIMEOUT_SECS must be a valid number")?,
            ),
        })
    }
}

/// Parse a comma-separated source list such as `propertyfinder,bayut`
pub fn parse_sources(raw: &str) -> Result<Vec<ListingSource>> {
    let sources = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ListingSource>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()
        .context("LISTING_SOURCES contains an unknown source")?;

    if sources.is_empty() {
        anyhow::bail!("LISTING_SOURCES must name at least one source");
    }

    Ok(sources)
}
