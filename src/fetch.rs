//! Page fetching.
//!
//! One GET per operation, carrying the configured `User-Agent` and timeout.
//! No retries. Non-2xx statuses and non-HTML bodies are errors so the
//! caller can log them and bail out before any extraction runs.

use crate::config::ScraperConfig;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use tracing::{debug, instrument};

/// Thin wrapper around a configured [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a client that sends `config.user_agent` and gives up after
    /// `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Fails if the user agent is not a valid header value or the TLS
    /// backend cannot be initialized.
    pub fn new(config: &ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.contains("html") {
                return Err(
                    format!("expected an HTML page, got content-type {content_type:?}").into(),
                );
            }
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// `<base>/chart/top250/`
pub fn top_chart_url(config: &ScraperConfig) -> String {
    format!("{}/chart/top250/", config.base())
}

/// `<base>/search/title/?genres=<genre>&sort=user_rating,-popularity`
///
/// The genre is lowercased and percent-encoded.
pub fn genre_search_url(config: &ScraperConfig, genre: &str) -> String {
    format!(
        "{}/search/title/?genres={}&sort=user_rating,-popularity",
        config.base(),
        urlencoding::encode(&genre.to_lowercase())
    )
}
