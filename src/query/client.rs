//! Search client over a pluggable transport.
//!
//! Every operation is one blocking round trip; nothing is retried.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{EndpointConfig, SearchConfig};
use crate::error::{Result, VtError};

use super::payload::{self, QueryPayload};
use super::response::{Hit, QueryResponse};
use super::table::ResultTable;

pub const SEARCH_PATH: &str = "/search/";

/// Sends a query body and returns the parsed response.
pub trait QueryTransport {
    /// Where queries go, for error reports.
    fn endpoint(&self) -> &str;

    fn send(&self, payload: &QueryPayload) -> Result<QueryResponse>;
}

pub struct HttpTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `base_url` is scheme, host and port; the search path is appended.
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| VtError::Config(format!("search http client: {err}")))?;
        Ok(Self {
            endpoint: format!("{}{SEARCH_PATH}", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        Self::new(&config.base_url(), config.timeout_secs)
    }

    fn error(&self, payload: &QueryPayload, message: impl Into<String>) -> VtError {
        VtError::Query {
            endpoint: self.endpoint.clone(),
            payload: payload.to_json_string(),
            message: message.into(),
        }
    }
}

impl QueryTransport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, payload: &QueryPayload) -> Result<QueryResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .map_err(|err| self.error(payload, format!("request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| self.error(payload, format!("reading response body: {err}")))?;

        if !status.is_success() {
            // Vespa reports query errors in a regular result body.
            let detail = serde_json::from_str::<QueryResponse>(&body)
                .ok()
                .and_then(|parsed| join_errors(&parsed))
                .unwrap_or_else(|| body.trim().chars().take(200).collect());
            return Err(self.error(payload, format!("HTTP {status}: {detail}")));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|err| self.error(payload, format!("malformed response: {err}")))?;

        if let Some(detail) = join_errors(&parsed) {
            return Err(self.error(payload, detail));
        }
        Ok(parsed)
    }
}

fn join_errors(response: &QueryResponse) -> Option<String> {
    let errors = response.errors();
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Explicit handle for the query operations. Holds no per-call state, so it
/// can be shared by independent callers.
pub struct SearchClient<T = HttpTransport> {
    transport: T,
    search: SearchConfig,
}

impl SearchClient<HttpTransport> {
    pub fn from_config(endpoint: &EndpointConfig, search: &SearchConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(endpoint)?, search.clone()))
    }
}

impl<T: QueryTransport> SearchClient<T> {
    pub const fn new(transport: T, search: SearchConfig) -> Self {
        Self { transport, search }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn execute(&self, payload: &QueryPayload) -> Result<QueryResponse> {
        let started = Instant::now();
        debug!(endpoint = self.endpoint(), payload = %payload.to_json_string(), "sending query");
        let response = self.transport.send(payload)?;
        debug!(
            hits = response.hits().len(),
            total = ?response.total_count(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "query answered"
        );
        Ok(response)
    }

    /// `bm25`-ranked lexical search.
    pub fn keyword_search(&self, text: &str) -> Result<ResultTable> {
        let payload = payload::keyword(text, self.search.hits);
        self.table_for(&payload)
    }

    /// Nearest-neighbour search over the embedded query text.
    pub fn semantic_search(&self, text: &str) -> Result<ResultTable> {
        let payload = payload::semantic(
            text,
            &self.search.embedding_field,
            self.search.target_hits,
            self.search.hits,
        );
        self.table_for(&payload)
    }

    /// Full hit for one `doc_id`, embedding included, or `None` if unknown.
    pub fn fetch_embedding_by_doc_id(&self, doc_id: &str) -> Result<Option<Hit>> {
        let payload = payload::by_doc_id(doc_id, &self.search.embedding_field);
        let response = self.execute(&payload)?;
        Ok(response.into_hits().into_iter().next())
    }

    /// Documents closest to `vector` under the recommendation profile.
    pub fn recommend_by_embedding(&self, vector: &[f32]) -> Result<ResultTable> {
        let payload = payload::recommend(vector, &self.search.embedding_field, self.search.hits);
        self.table_for(&payload)
    }

    /// Look up `doc_id` and recommend by its stored embedding.
    pub fn recommend_similar(&self, doc_id: &str) -> Result<Option<ResultTable>> {
        let Some(hit) = self.fetch_embedding_by_doc_id(doc_id)? else {
            return Ok(None);
        };
        let field = &self.search.embedding_field;
        let vector = hit.vector(field).ok_or_else(|| VtError::Query {
            endpoint: self.endpoint().to_string(),
            payload: payload::by_doc_id(doc_id, field).to_json_string(),
            message: format!("document {doc_id} has no readable `{field}` tensor"),
        })?;
        self.recommend_by_embedding(&vector).map(Some)
    }

    fn table_for(&self, payload: &QueryPayload) -> Result<ResultTable> {
        let response = self.execute(payload)?;
        Ok(ResultTable::from_hits(
            response.hits(),
            &self.search.display_fields,
        ))
    }
}
