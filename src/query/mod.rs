//! Keyword, semantic and vector queries against a Vespa endpoint.

pub mod client;
pub mod payload;
pub mod response;
pub mod table;

pub use client::{HttpTransport, QueryTransport, SEARCH_PATH, SearchClient};
pub use payload::QueryPayload;
pub use response::{Hit, QueryResponse};
pub use table::{ResultRow, ResultTable, project_hit};
