//! Search-text derivation and projection onto the feed schema.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::FeedConfig;
use crate::error::{Result, VtError};

use super::table::{Row, SourceTable};

pub const TEXT_COLUMN: &str = "text";

/// Source columns in the order they land in `fields`; `video_id` becomes `doc_id`.
pub const PROJECTED_COLUMNS: [&str; 8] = [
    "video_id",
    "title",
    TEXT_COLUMN,
    "views",
    "likes",
    "dislikes",
    "comment_count",
    "publish_time",
];

/// Why the search text could not be built for one row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationFault {
    #[error("field `{0}` is missing")]
    MissingField(&'static str),
    #[error("field `{field}` holds {found}, not text")]
    NotText {
        field: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFault {
    pub row: usize,
    pub fault: DerivationFault,
}

/// Per-batch outcome of text derivation. Faulted rows stay in the table
/// with a null `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationReport {
    pub derived: usize,
    pub faults: Vec<RowFault>,
}

impl DerivationReport {
    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.faults.len()
    }
}

/// `title`, one space, `channel_title`. No trimming.
pub fn derive_text(row: &Row) -> std::result::Result<String, DerivationFault> {
    let title = text_field(row, "title")?;
    let channel = text_field(row, "channel_title")?;
    Ok(format!("{title} {channel}"))
}

/// Add the `text` column to every row, isolating per-row faults.
pub fn derive_all(table: &mut SourceTable) -> DerivationReport {
    table.ensure_column(TEXT_COLUMN);

    let mut report = DerivationReport::default();
    for (idx, row) in table.rows_mut().iter_mut().enumerate() {
        match derive_text(row) {
            Ok(text) => {
                row.insert(TEXT_COLUMN.to_string(), Value::String(text));
                report.derived += 1;
            }
            Err(fault) => {
                warn!(row = idx, record = ?row, error = %fault, "could not derive search text");
                row.insert(TEXT_COLUMN.to_string(), Value::Null);
                report.faults.push(RowFault { row: idx, fault });
            }
        }
    }
    report
}

fn text_field<'a>(row: &'a Row, field: &'static str) -> std::result::Result<&'a str, DerivationFault> {
    match row.get(field) {
        None => Err(DerivationFault::MissingField(field)),
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(DerivationFault::NotText {
            field,
            found: value_kind(other),
        }),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The `fields` object of one feed line. Key order is the declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFields {
    pub doc_id: String,
    pub title: Value,
    pub text: Value,
    pub views: Value,
    pub likes: Value,
    pub dislikes: Value,
    pub comment_count: Value,
    pub publish_time: Value,
}

/// One line of the feed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedRecord {
    pub put: String,
    pub fields: DocumentFields,
}

impl FeedRecord {
    #[must_use]
    pub fn new(fields: DocumentFields, feed: &FeedConfig) -> Self {
        Self {
            put: build_key(&feed.namespace, &feed.document_type, &fields.doc_id),
            fields,
        }
    }
}

/// Vespa document id: `id:<namespace>:<document_type>::<doc_id>`.
#[must_use]
pub fn build_key(namespace: &str, document_type: &str, doc_id: &str) -> String {
    format!("id:{namespace}:{document_type}::{doc_id}")
}

/// Select and rename the table onto the feed schema, keeping row order.
pub fn project(table: &SourceTable) -> Result<Vec<DocumentFields>> {
    if let Some(missing) = PROJECTED_COLUMNS
        .iter()
        .find(|column| !table.has_column(column))
    {
        return Err(VtError::Schema(format!(
            "column `{missing}` is missing from the table"
        )));
    }

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<DocumentFields> {
            let cell = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);
            Ok(DocumentFields {
                doc_id: doc_id(row, idx)?,
                title: cell("title"),
                text: cell(TEXT_COLUMN),
                views: cell("views"),
                likes: cell("likes"),
                dislikes: cell("dislikes"),
                comment_count: cell("comment_count"),
                publish_time: cell("publish_time"),
            })
        })
        .collect()
}

fn doc_id(row: &Row, idx: usize) -> Result<String> {
    match row.get("video_id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(VtError::Schema(format!("row {idx} has no usable video_id"))),
    }
}
