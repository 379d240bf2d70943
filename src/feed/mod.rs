//! CSV to Vespa feed conversion.
//!
//! `load -> fill_missing -> derive_all -> project -> serialize`, one batch per
//! call. Rows whose search text cannot be derived are kept with a null `text`
//! and counted in the summary; everything else that goes wrong aborts the run.

pub mod document;
pub mod table;
pub mod writer;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::FeedConfig;
use crate::error::Result;

pub use document::{
    DerivationFault, DerivationReport, DocumentFields, FeedRecord, RowFault, build_key,
    derive_all, derive_text, project,
};
pub use table::{FILL_COLUMNS, REQUIRED_COLUMNS, Row, SourceTable};
pub use writer::serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub rows: usize,
    pub written: usize,
    pub derivation_faults: usize,
}

/// Turn an already loaded table into feed records.
pub fn transform(mut table: SourceTable, feed: &FeedConfig) -> Result<(Vec<FeedRecord>, DerivationReport)> {
    table.fill_missing(&FILL_COLUMNS);
    let report = derive_all(&mut table);
    let records = project(&table)?
        .into_iter()
        .map(|fields| FeedRecord::new(fields, feed))
        .collect();
    Ok((records, report))
}

/// Convert `input` (CSV) into `output` (JSON lines).
pub fn convert(input: &Path, output: &Path, feed: &FeedConfig) -> Result<FeedSummary> {
    let table = SourceTable::load(input)?;
    let rows = table.len();

    let (records, report) = transform(table, feed)?;
    let written = serialize(&records, output)?;

    let summary = FeedSummary {
        rows,
        written,
        derivation_faults: report.fault_count(),
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        rows = summary.rows,
        written = summary.written,
        faults = summary.derivation_faults,
        "feed written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::test_utils::fixtures::UnitTestFixture;

    #[test]
    fn convert_matches_reference_line() {
        let fixture = UnitTestFixture::new();
        let input = fixture.create_videos_csv(&[[
            "abc123",
            "Hello",
            "World",
            "10",
            "3",
            "1",
            "2",
            "2017-11-13T17:13:01.000Z",
        ]]);
        let output = fixture.data_path.join("feed.jsonl");

        let summary = convert(&input, &output, &FeedConfig::default()).unwrap();
        assert_eq!(
            summary,
            FeedSummary {
                rows: 1,
                written: 1,
                derivation_faults: 0
            }
        );

        let line: Value =
            serde_json::from_str(std::fs::read_to_string(&output).unwrap().trim_end()).unwrap();
        assert_eq!(
            line,
            json!({
                "put": "id:hybrid-search:doc::abc123",
                "fields": {
                    "doc_id": "abc123",
                    "title": "Hello",
                    "text": "Hello World",
                    "views": 10,
                    "likes": 3,
                    "dislikes": 1,
                    "comment_count": 2,
                    "publish_time": "2017-11-13T17:13:01.000Z"
                }
            })
        );
    }

    #[test]
    fn null_channel_becomes_trailing_space() {
        let fixture = UnitTestFixture::new();
        let input = fixture.create_videos_csv(&[["v1", "Solo", "", "1", "1", "1", "1", "t"]]);
        let table = SourceTable::load(&input).unwrap();

        let (records, report) = transform(table, &FeedConfig::default()).unwrap();
        assert_eq!(report.fault_count(), 0);
        assert_eq!(records[0].fields.text, json!("Solo "));
    }

    #[test]
    fn custom_namespace_flows_into_put() {
        let fixture = UnitTestFixture::new();
        let input = fixture.create_videos_csv(&[["v1", "a", "b", "1", "1", "1", "1", "t"]]);
        let table = SourceTable::load(&input).unwrap();
        let feed = FeedConfig {
            namespace: "videos".to_string(),
            document_type: "video".to_string(),
        };

        let (records, _) = transform(table, &feed).unwrap();
        assert_eq!(records[0].put, "id:videos:video::v1");
    }

    #[test]
    fn derivation_fault_still_emits_record() {
        let mut good = Row::new();
        good.insert("video_id".into(), json!("ok"));
        good.insert("title".into(), json!("T"));
        good.insert("channel_title".into(), json!("C"));
        let mut bad = good.clone();
        bad.insert("video_id".into(), json!("bad"));
        bad.insert("channel_title".into(), json!(7));

        let columns = REQUIRED_COLUMNS.iter().map(ToString::to_string).collect();
        let table = SourceTable::new(columns, vec![good, bad]);

        let (records, report) = transform(table, &FeedConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.fault_count(), 1);
        assert_eq!(records[1].fields.doc_id, "bad");
        assert_eq!(records[1].fields.text, Value::Null);
    }
}
