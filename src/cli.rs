//! Command-line interface definitions for imdb_scrape.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options can also be supplied through environment variables.

use clap::{Parser, Subcommand};

/// Command-line arguments for imdb_scrape.
///
/// Without a subcommand the scraper runs its default pass: the top 25 chart
/// entries are exported to `top_imdb_movies.csv`, then the `Action` genre is
/// scraped and counted.
///
/// # Examples
///
/// ```sh
/// # Default pass
/// imdb_scrape
///
/// # Top 100 into a named file
/// imdb_scrape top --limit 100 --output top.csv
///
/// # A genre, exported
/// imdb_scrape genre Drama --output drama.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, env = "IMDB_SCRAPE_CONFIG", global = true)]
    pub config: Option<String>,

    /// Override the site base URL
    #[arg(long, env = "IMDB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scrape the Top 250 chart and export it
    Top {
        /// Number of chart rows to visit (defaults to the configured top_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output CSV path (defaults to the configured output_file)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Scrape the best-rated titles of one genre
    Genre {
        /// Genre name, e.g. Action or Drama
        genre: String,

        /// Export to this CSV path instead of only printing a count
        #[arg(short, long)]
        output: Option<String>,
    },
}
