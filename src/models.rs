//! Data models for scraped movie records.
//!
//! This module defines the two record shapes produced by the scrapers:
//! - [`TopMovie`]: a row of the Top 250 chart
//! - [`GenreMovie`]: a hit from a genre search, tagged with the requested genre
//!
//! Records only exist once every required field has been extracted. The
//! extractor hands over a [`Fields`] map and the record types pick their
//! columns out of it; a missing column means no record.
//!
//! Field declaration order is the CSV column order.

use serde::Serialize;
use std::collections::HashMap;

/// A movie scraped from the Top 250 chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopMovie {
    /// The movie title as displayed.
    pub title: String,
    /// Release year with the enclosing parentheses removed, e.g. `"1994"`.
    pub year: String,
    /// The rating exactly as displayed, e.g. `"9.2"`.
    pub rating: String,
}

/// A movie scraped from a genre search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreMovie {
    /// The movie title as displayed.
    pub title: String,
    /// The genre the caller asked for, echoed verbatim.
    pub genre: String,
    /// The rating exactly as displayed.
    pub rating: String,
}

/// Normalized field values pulled out of a single item node.
///
/// Only produced when every field of an extraction plan resolved, so the
/// record constructors below can treat a missing key as a plan mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(HashMap<&'static str, String>);

impl Fields {
    /// An empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, replacing any earlier value.
    pub fn insert(&mut self, name: &'static str, value: String) {
        self.0.insert(name, value);
    }

    /// Borrow a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Remove and return a field value.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl TopMovie {
    /// Build a chart record from extracted fields.
    ///
    /// Returns `None` unless `title`, `year` and `rating` are all present.
    pub fn from_fields(mut fields: Fields) -> Option<Self> {
        Some(Self {
            title: fields.take("title")?,
            year: fields.take("year")?,
            rating: fields.take("rating")?,
        })
    }
}

impl GenreMovie {
    /// Build a genre record, tagging it with the caller's genre.
    pub fn from_fields(mut fields: Fields, genre: &str) -> Option<Self> {
        Some(Self {
            title: fields.take("title")?,
            genre: genre.to_string(),
            rating: fields.take("rating")?,
        })
    }
}
