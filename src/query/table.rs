//! Fixed-column projection of hits.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use super::response::Hit;

/// Cells in declared column order; `None` marks a field the hit did not carry.
pub type ResultRow = Vec<Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_hits(hits: &[Hit], fields: &[String]) -> Self {
        let mut table = Self::new(fields.to_vec());
        for hit in hits {
            table.rows.push(project_hit(hit, fields));
        }
        table
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }
}

/// Pick `fields` out of a hit, in order, leaving gaps as `None`.
#[must_use]
pub fn project_hit(hit: &Hit, fields: &[String]) -> ResultRow {
    fields.iter().map(|name| hit.field(name).cloned()).collect()
}

// Rows serialize as objects keyed by column, in column order.
struct RowRef<'a> {
    columns: &'a [String],
    row: &'a ResultRow,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.row) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

struct RowsRef<'a>(&'a ResultTable);

impl Serialize for RowsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&RowRef {
                columns: &self.0.columns,
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("columns", &self.columns)?;
        map.serialize_entry("rows", &RowsRef(self))?;
        map.end()
    }
}
