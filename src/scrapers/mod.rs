//! Movie-database scrapers.
//!
//! Each scraper follows the same single-pass pattern:
//!
//! 1. **Fetching**: one GET for the listing page
//! 2. **Collecting**: run an extraction plan over the page's item nodes
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | IMDb Top 250 | [`imdb`] | HTML scraping | Table rows, capped by `limit` |
//! | IMDb genre search | [`imdb`] | HTML scraping | Listing cards, capped at 50 |
//!
//! Failed fetches are logged and produce an empty batch; failed items are
//! logged and skipped.

pub mod imdb;
