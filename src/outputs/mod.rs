//! Output generation for scraped batches.
//!
//! # Submodules
//!
//! - [`csv`]: Writes a batch to a delimited file with a header row
//!
//! # Output Structure
//!
//! ```text
//! imdb_movies.csv
//! title,year,rating
//! The Shawshank Redemption,1994,9.2
//! ...
//! ```

pub mod csv;
