//! IMDb chart and genre scraper.
//!
//! Two operations, each self-contained: fetch one page, parse it, collect
//! records with the matching [`ExtractionPlan`]. Neither ever fails as a
//! whole; transport and plan errors are logged and produce an empty batch.
//!
//! # Endpoints
//!
//! | Operation | Path | Items visited |
//! |-----------|------|---------------|
//! | [`ImdbScraper::scrape_top_movies`] | `/chart/top250/` | `limit` table rows |
//! | [`ImdbScraper::scrape_by_genre`] | `/search/title/?genres=…` | `genre_cap` listing cards |

use crate::config::ScraperConfig;
use crate::extract::{ExtractionPlan, collect_batch};
use crate::fetch::{Fetcher, genre_search_url, top_chart_url};
use crate::models::{GenreMovie, TopMovie};
use scraper::Html;
use std::error::Error;
use tracing::{error, info, instrument};

#[derive(Debug, Clone)]
pub struct ImdbScraper {
    config: ScraperConfig,
    fetcher: Fetcher,
}

impl ImdbScraper {
    /// Create a scraper for the site described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, identity header, timeout and caps
    ///
    /// # Returns
    ///
    /// The scraper, or an error if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    /// The configuration this scraper was built with.
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape the Top 250 chart, visiting at most `limit` rows.
    ///
    /// Rows missing any of title, year or rating are dropped.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_top_movies(&self, limit: usize) -> Vec<TopMovie> {
        let plan = match ExtractionPlan::top_chart() {
            Ok(plan) => plan,
            Err(e) => {
                error!(error = %e, "Failed to build top chart extraction plan");
                return Vec::new();
            }
        };

        let url = top_chart_url(&self.config);
        let html = match self.fetcher.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, %url, "Request error");
                return Vec::new();
            }
        };

        let document = Html::parse_document(&html);
        let movies = collect_batch(&document, &plan, limit, TopMovie::from_fields);
        info!(count = movies.len(), "Successfully scraped top movies");
        movies
    }

    /// Scrape the best-rated titles of `genre`, visiting at most
    /// `genre_cap` listing cards.
    ///
    /// Every record carries `genre` exactly as given.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_by_genre(&self, genre: &str) -> Vec<GenreMovie> {
        let plan = match ExtractionPlan::genre_search() {
            Ok(plan) => plan,
            Err(e) => {
                error!(error = %e, %genre, "Failed to build genre extraction plan");
                return Vec::new();
            }
        };

        let url = genre_search_url(&self.config, genre);
        let html = match self.fetcher.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, %url, %genre, "Error scraping genre");
                return Vec::new();
            }
        };

        let document = Html::parse_document(&html);
        let movies = collect_batch(&document, &plan, self.config.genre_cap, |fields| {
            GenreMovie::from_fields(fields, genre)
        });
        info!(count = movies.len(), %genre, "Scraped genre movies");
        movies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    const TOP_CHART: &str = r#"<html><body>
        <table class="chart full-width">
          <thead><tr><th>Rank &amp; Title</th><th>IMDb Rating</th></tr></thead>
          <tbody class="lister-list">
            <tr>
              <td class="titleColumn">1. <a href="/title/tt0111161/">The Shawshank Redemption</a>
                <span class="secondaryInfo">(1994)</span></td>
              <td class="ratingColumn imdbRating"><strong title="9.2 based on 2,000,000 user ratings">9.2</strong></td>
            </tr>
            <tr>
              <td class="titleColumn">2. <a href="/title/tt0068646/">The Godfather</a>
                <span class="secondaryInfo">(1972)</span></td>
              <td class="ratingColumn"></td>
            </tr>
            <tr>
              <td class="titleColumn">3. <a href="/title/tt0468569/">The Dark Knight</a>
                <span class="secondaryInfo">(2008)</span></td>
              <td class="ratingColumn imdbRating"><strong>9.0</strong></td>
            </tr>
          </tbody>
        </table></body></html>"#;

    fn genre_page(count: usize) -> String {
        let cards: String = (0..count)
            .map(|i| {
                format!(
                    r#"<div class="lister-item mode-advanced">
                      <div class="lister-item-content">
                        <h3 class="lister-item-header"><span>{n}.</span> <a href="/title/tt{i}/">Movie {i}</a></h3>
                        <div class="ratings-bar"><div class="inline-block ratings-imdb-rating"><strong>8.{d}</strong></div></div>
                      </div>
                    </div>"#,
                    n = i + 1,
                    d = i % 10
                )
            })
            .collect();
        format!(r#"<html><body><div class="lister-list">{cards}</div></body></html>"#)
    }

    fn scraper_for(server: &ServerGuard) -> ImdbScraper {
        let config = ScraperConfig::default().with_base_url(&server.url()).unwrap();
        ImdbScraper::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_scrape_top_movies_skips_incomplete_rows() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/chart/top250/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(TOP_CHART)
            .expect(1)
            .create_async()
            .await;

        let movies = scraper_for(&server).scrape_top_movies(100).await;
        assert_eq!(
            movies,
            vec![
                TopMovie {
                    title: "The Shawshank Redemption".into(),
                    year: "1994".into(),
                    rating: "9.2".into(),
                },
                TopMovie {
                    title: "The Dark Knight".into(),
                    year: "2008".into(),
                    rating: "9.0".into(),
                },
            ]
        );
        assert!(
            movies
                .iter()
                .all(|m| !m.title.is_empty() && !m.year.is_empty() && !m.rating.is_empty())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scrape_top_movies_respects_limit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/chart/top250/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(TOP_CHART)
            .create_async()
            .await;

        // header row plus the first data row
        let movies = scraper_for(&server).scrape_top_movies(2).await;
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
    }

    #[tokio::test]
    async fn test_scrape_by_genre_echoes_genre_and_caps() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/title/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("genres".into(), "sci-fi".into()),
                Matcher::UrlEncoded("sort".into(), "user_rating,-popularity".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(genre_page(60))
            .expect(1)
            .create_async()
            .await;

        let movies = scraper_for(&server).scrape_by_genre("Sci-Fi").await;
        assert_eq!(movies.len(), 50);
        assert!(movies.iter().all(|m| m.genre == "Sci-Fi"));
        assert_eq!(movies[0].title, "Movie 0");
        assert_eq!(movies[3].rating, "8.3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scrape_by_genre_is_idempotent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/title/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(genre_page(5))
            .expect(2)
            .create_async()
            .await;

        let scraper = scraper_for(&server);
        let first = scraper.scrape_by_genre("Drama").await;
        let second = scraper.scrape_by_genre("Drama").await;
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_connection_error_yields_empty_batch() {
        // nothing listens on port 1
        let config = ScraperConfig::default()
            .with_base_url("http://127.0.0.1:1")
            .unwrap();
        let scraper = ImdbScraper::new(config).unwrap();

        assert!(scraper.scrape_top_movies(100).await.is_empty());
        assert!(scraper.scrape_by_genre("Action").await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_yields_empty_batch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/chart/top250/")
            .with_status(500)
            .create_async()
            .await;

        assert!(scraper_for(&server).scrape_top_movies(100).await.is_empty());
    }
}
