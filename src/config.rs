//! Scraper configuration.
//!
//! Everything the pipeline treats as fixed (endpoint, identity header,
//! timeout, caps) lives in [`ScraperConfig`] so callers and tests can point
//! it somewhere else. Values come from an optional YAML file; any key left
//! out keeps its default.
//!
//! ```yaml
//! base_url: https://www.imdb.com
//! user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
//! timeout_secs: 10
//! top_limit: 100
//! genre_cap: 50
//! output_file: imdb_movies.csv
//! ```

use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fixed settings shared by every scrape operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root the endpoint paths are appended to.
    pub base_url: String,
    /// Sent as the `User-Agent` header on every request.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    /// Default number of chart rows to visit.
    pub top_limit: usize,
    /// Number of genre search cards to visit.
    pub genre_cap: usize,
    /// Default export path.
    pub output_file: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            top_limit: 100,
            genre_cap: 50,
            output_file: "imdb_movies.csv".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: ScraperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let yaml = fs::read_to_string(path).await?;
                let config = Self::from_yaml(&yaml)?;
                info!(path, base_url = %config.base_url, "Loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Replace the base URL, re-validating it.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, Box<dyn Error>> {
        self.base_url = base_url.to_string();
        self.validate()?;
        Ok(self)
    }

    /// Whole-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url {:?}: {e}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("base_url must be http(s), got {:?}", parsed.scheme()).into());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.base_url, "https://www.imdb.com");
        assert_eq!(config.top_limit, 100);
        assert_eq!(config.genre_cap, 50);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.output_file, "imdb_movies.csv");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ScraperConfig::from_yaml("timeout_secs: 3\ngenre_cap: 10\n").unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.genre_cap, 10);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ScraperConfig::from_yaml("base_url: not a url\n").is_err());
        assert!(ScraperConfig::from_yaml("base_url: ftp://example.com\n").is_err());
        assert!(ScraperConfig::from_yaml("timeout_secs: 0\n").is_err());
    }

    #[test]
    fn test_base_trims_trailing_slash() {
        let config = ScraperConfig::default()
            .with_base_url("http://127.0.0.1:8080/")
            .unwrap();
        assert_eq!(config.base(), "http://127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://localhost:9000\ntop_limit: 5").unwrap();

        let config = ScraperConfig::load(file.path().to_str()).await.unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.top_limit, 5);
    }

    #[tokio::test]
    async fn test_load_without_path_is_default() {
        let config = ScraperConfig::load(None).await.unwrap();
        assert_eq!(config, ScraperConfig::default());
    }
}
