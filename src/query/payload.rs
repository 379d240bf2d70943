//! Query bodies for the Vespa search API.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Map, Value};

pub const BM25_PROFILE: &str = "bm25";
pub const SEMANTIC_PROFILE: &str = "semantic";
pub const RECOMMENDATION_PROFILE: &str = "recommendation";

/// A flat JSON object of query parameters, e.g. `yql`, `query`, `ranking`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryPayload(Map<String, Value>);

impl QueryPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compact JSON, used in error reports and debug logs.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// Lexical match over the default fieldset, ranked by `bm25`.
#[must_use]
pub fn keyword(text: &str, hits: usize) -> QueryPayload {
    QueryPayload::new()
        .with(
            "yql",
            format!("select * from sources * where userQuery() limit {hits}"),
        )
        .with("query", text)
        .with("ranking", BM25_PROFILE)
}

/// Approximate nearest neighbours over `field`, with the query text embedded
/// server side.
#[must_use]
pub fn semantic(text: &str, field: &str, target_hits: usize, hits: usize) -> QueryPayload {
    QueryPayload::new()
        .with(
            "yql",
            format!(
                "select * from sources * where ({{targetHits:{target_hits}}}nearestNeighbor({field},e)) limit {hits}"
            ),
        )
        .with("query", text)
        .with("ranking", SEMANTIC_PROFILE)
        .with("input.query(e)", "embed(@query)")
}

/// Exact lookup of one document by `doc_id`.
#[must_use]
pub fn by_doc_id(doc_id: &str, field: &str) -> QueryPayload {
    QueryPayload::new()
        .with(
            "yql",
            format!(
                "select doc_id, title, text, {field} from doc where doc_id contains '{}'",
                escape_yql_string(doc_id)
            ),
        )
        .with("hits", 1)
}

/// Nearest neighbours of a caller-supplied vector.
#[must_use]
pub fn recommend(vector: &[f32], field: &str, hits: usize) -> QueryPayload {
    QueryPayload::new()
        .with("hits", hits)
        .with(
            "yql",
            format!(
                "select * from doc where ({{targetHits:{hits}}}nearestNeighbor({field}, user_embedding))"
            ),
        )
        .with("ranking.features.query(user_embedding)", tensor_literal(vector))
        .with("ranking.profile", RECOMMENDATION_PROFILE)
}

/// Indexed-tensor short form: `[0.1, 0.2, 0.3]`.
#[must_use]
pub fn tensor_literal(vector: &[f32]) -> String {
    let mut out = String::with_capacity(vector.len() * 8 + 2);
    out.push('[');
    for (idx, value) in vector.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{value:?}");
    }
    out.push(']');
    out
}

fn escape_yql_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
