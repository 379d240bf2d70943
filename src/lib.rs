//! vespa-tube: YouTube video CSV to Vespa feed, plus hybrid queries.
//!
//! - [`feed`] turns the CSV into `{put, fields}` JSON lines.
//! - [`query`] runs keyword, semantic and vector queries and projects hits
//!   into a fixed-column table.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod query;
pub mod test_utils;
pub mod utils;

pub use error::{Result, VtError};
