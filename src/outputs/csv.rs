//! CSV export of scraped batches.
//!
//! The header comes from the record's field names, so a [`TopMovie`] batch
//! is written as `title,year,rating` and a [`GenreMovie`] batch as
//! `title,genre,rating`. Existing files are overwritten.
//!
//! [`TopMovie`]: crate::models::TopMovie
//! [`GenreMovie`]: crate::models::GenreMovie

use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Serialize `records` to CSV text with a header row.
///
/// Rows end with `\r\n`, the line ending spreadsheet tools expect.
///
/// # Returns
///
/// The encoded bytes, or an error if a record cannot be serialized.
pub fn to_csv<T: Serialize>(records: &[T]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(::csv::Terminator::CRLF)
        .from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    Ok(bytes)
}

async fn write_csv<T: Serialize>(records: &[T], path: &str) -> Result<(), Box<dyn Error>> {
    let bytes = to_csv(records)?;
    fs::write(path, bytes).await?;
    Ok(())
}

/// Write a batch to `path`.
///
/// An empty batch writes nothing. Write failures are logged, never
/// returned. Returns whether a file was written.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub async fn export_to_csv<T: Serialize>(records: &[T], path: &str) -> bool {
    if records.is_empty() {
        warn!("No movies to export");
        return false;
    }

    match write_csv(records, path).await {
        Ok(()) => {
            info!(count = records.len(), %path, "Exported movies");
            true
        }
        Err(e) => {
            error!(error = %e, %path, "File write error");
            false
        }
    }
}
