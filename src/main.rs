//! # imdb_scrape
//!
//! Scrapes IMDb listing pages into CSV files.
//!
//! ## Usage
//!
//! ```sh
//! imdb_scrape top --limit 50 --output top.csv
//! imdb_scrape genre Action
//! ```
//!
//! ## Architecture
//!
//! Each operation is a single pass:
//! 1. **Fetching**: one GET for the listing page
//! 2. **Parsing**: build the document tree
//! 3. **Collecting**: extract records item by item, skipping broken ones
//! 4. **Output**: write the batch as CSV
//!
//! Operations always finish; failures show up as log lines and short or
//! empty batches.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod outputs;
mod scrapers;

use cli::{Cli, Command};
use config::ScraperConfig;
use outputs::csv::export_to_csv;
use scrapers::imdb::ImdbScraper;

const DEFAULT_RUN_LIMIT: usize = 25;
const DEFAULT_RUN_OUTPUT: &str = "top_imdb_movies.csv";
const DEFAULT_RUN_GENRE: &str = "Action";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init ---
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    debug!(?args, "Parsed CLI arguments");

    let mut config = ScraperConfig::load(args.config.as_deref()).await?;
    if let Some(base_url) = args.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let scraper = ImdbScraper::new(config)?;

    run(&scraper, args.command).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip(scraper))]
async fn run(scraper: &ImdbScraper, command: Option<Command>) {
    match command {
        Some(Command::Top { limit, output }) => {
            let limit = limit.unwrap_or(scraper.config().top_limit);
            let output = output.unwrap_or_else(|| scraper.config().output_file.clone());
            let movies = scraper.scrape_top_movies(limit).await;
            export_to_csv(&movies, &output).await;
        }
        Some(Command::Genre { genre, output }) => {
            let movies = scraper.scrape_by_genre(&genre).await;
            match output {
                Some(output) => {
                    export_to_csv(&movies, &output).await;
                }
                None => println!("Found {} {} movies", movies.len(), genre.to_lowercase()),
            }
        }
        None => {
            let top_movies = scraper.scrape_top_movies(DEFAULT_RUN_LIMIT).await;
            export_to_csv(&top_movies, DEFAULT_RUN_OUTPUT).await;

            let genre_movies = scraper.scrape_by_genre(DEFAULT_RUN_GENRE).await;
            println!(
                "Found {} {} movies",
                genre_movies.len(),
                DEFAULT_RUN_GENRE.to_lowercase()
            );
        }
    }
}
