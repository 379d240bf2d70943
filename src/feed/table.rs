//! In-memory view of the video CSV.

use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{Result, VtError};

/// Columns the input file must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "video_id",
    "title",
    "channel_title",
    "views",
    "likes",
    "dislikes",
    "comment_count",
    "publish_time",
];

/// Text columns blanked to `""` before the search text is derived.
pub const FILL_COLUMNS: [&str; 2] = ["title", "channel_title"];

const NUMERIC_COLUMNS: [&str; 4] = ["views", "likes", "dislikes", "comment_count"];

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl SourceTable {
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Parse a comma-delimited file with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|err| VtError::input_format(path, err.to_string()))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|err| VtError::input_format(path, err.to_string()))?
            .iter()
            .map(ToString::to_string)
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|required| !columns.iter().any(|c| c.as_str() == **required))
        {
            return Err(VtError::input_format(
                path,
                format!("required column `{missing}` not found in header"),
            ));
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|err| VtError::input_format(path, err.to_string()))?;
            if record.len() > columns.len() {
                return Err(VtError::input_format(
                    path,
                    format!(
                        "record {} has {} fields but the header has {}",
                        idx + 1,
                        record.len(),
                        columns.len()
                    ),
                ));
            }

            let mut row = Row::new();
            for (pos, name) in columns.iter().enumerate() {
                let cell = record.get(pos).map_or(Value::Null, |raw| parse_cell(name, raw));
                row.insert(name.clone(), cell);
            }
            rows.push(row);
        }

        debug!(path = %path.display(), rows = rows.len(), "loaded source table");
        Ok(Self { columns, rows })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Replace null or absent cells in `columns` with the empty string.
    pub fn fill_missing(&mut self, columns: &[&str]) {
        for column in columns {
            self.ensure_column(column);
        }
        for row in &mut self.rows {
            for column in columns {
                match row.get(*column) {
                    Some(Value::Null) | None => {
                        row.insert((*column).to_string(), Value::String(String::new()));
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

fn parse_cell(column: &str, raw: &str) -> Value {
    // Ids keep their raw spelling, even when empty or numeric-looking.
    if column == "video_id" {
        return Value::String(raw.to_string());
    }
    if raw.is_empty() {
        return Value::Null;
    }
    if NUMERIC_COLUMNS.contains(&column) {
        if let Ok(int) = raw.trim().parse::<i64>() {
            return Value::Number(int.into());
        }
        if let Some(float) = raw.trim().parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(float);
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::fixtures::UnitTestFixture;

    const HEADER: &str =
        "video_id,trending_date,title,channel_title,views,likes,dislikes,comment_count,publish_time";

    #[test]
    fn load_parses_cells_by_column() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "videos.csv",
            &format!(
                "{HEADER}\n0123,17.14.11,\"Hello, again\",World,10,2.5,,3,2017-11-13T17:13:01.000Z\n"
            ),
        );

        let table = SourceTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.has_column("trending_date"));

        let row = &table.rows()[0];
        assert_eq!(row["video_id"], json!("0123"));
        assert_eq!(row["title"], json!("Hello, again"));
        assert_eq!(row["views"], json!(10));
        assert_eq!(row["likes"], json!(2.5));
        assert_eq!(row["dislikes"], Value::Null);
        assert_eq!(row["publish_time"], json!("2017-11-13T17:13:01.000Z"));
    }

    #[test]
    fn load_rejects_missing_required_column() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file("videos.csv", "video_id,title\nabc,Hello\n");

        let err = SourceTable::load(&path).unwrap_err();
        match err {
            VtError::InputFormat { message, .. } => assert!(message.contains("channel_title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_rejects_unreadable_file() {
        let fixture = UnitTestFixture::new();
        let err = SourceTable::load(fixture.data_path.join("absent.csv")).unwrap_err();
        assert_eq!(err.code(), "input_format");
    }

    #[test]
    fn load_rejects_overlong_record() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "videos.csv",
            &format!("{HEADER}\na,b,c,d,1,2,3,4,t,extra\n"),
        );
        let err = SourceTable::load(&path).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn short_records_are_padded_with_nulls() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file("videos.csv", &format!("{HEADER}\nabc,x,Hello\n"));

        let table = SourceTable::load(&path).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row["title"], json!("Hello"));
        assert_eq!(row["channel_title"], Value::Null);
        assert_eq!(row["publish_time"], Value::Null);
    }

    #[test]
    fn fill_missing_only_touches_listed_columns() {
        let mut row = Row::new();
        row.insert("title".to_string(), Value::Null);
        row.insert("views".to_string(), Value::Null);
        let mut table = SourceTable::new(vec!["title".into(), "views".into()], vec![row]);

        table.fill_missing(&FILL_COLUMNS);

        let row = &table.rows()[0];
        assert_eq!(row["title"], json!(""));
        assert_eq!(row["channel_title"], json!(""));
        assert_eq!(row["views"], Value::Null);
        assert!(table.has_column("channel_title"));
    }

    #[test]
    fn fill_missing_keeps_present_values() {
        let mut row = Row::new();
        row.insert("title".to_string(), json!("Hello"));
        row.insert("channel_title".to_string(), json!(""));
        let mut table = SourceTable::new(vec!["title".into(), "channel_title".into()], vec![row]);

        table.fill_missing(&FILL_COLUMNS);

        assert_eq!(table.rows()[0]["title"], json!("Hello"));
        assert_eq!(table.rows()[0]["channel_title"], json!(""));
    }
}
