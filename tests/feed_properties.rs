use proptest::prelude::*;
use serde_json::{Map, Value};

use vespa_tube::config::FeedConfig;
use vespa_tube::feed::{REQUIRED_COLUMNS, Row, SourceTable, convert, transform};

#[derive(Debug, Clone)]
struct Video {
    id: String,
    title: Option<String>,
    channel: Option<String>,
    views: u32,
}

fn video() -> impl Strategy<Value = Video> {
    (
        "[A-Za-z0-9_-]{1,11}",
        proptest::option::of("[A-Za-z0-9 ,'\"]{0,16}"),
        proptest::option::of("[A-Za-z0-9 ]{0,12}"),
        any::<u32>(),
    )
        .prop_map(|(id, title, channel, views)| Video {
            id,
            title,
            channel,
            views,
        })
}

fn row(video: &Video) -> Row {
    let mut row = Map::new();
    row.insert("video_id".into(), Value::String(video.id.clone()));
    row.insert(
        "title".into(),
        video.title.clone().map_or(Value::Null, Value::String),
    );
    row.insert(
        "channel_title".into(),
        video.channel.clone().map_or(Value::Null, Value::String),
    );
    row.insert("views".into(), Value::from(video.views));
    row.insert("likes".into(), Value::from(1));
    row.insert("dislikes".into(), Value::from(0));
    row.insert("comment_count".into(), Value::from(2));
    row.insert("publish_time".into(), Value::String("2018-01-01T00:00:00.000Z".into()));
    row
}

fn table(videos: &[Video]) -> SourceTable {
    SourceTable::new(
        REQUIRED_COLUMNS.iter().map(ToString::to_string).collect(),
        videos.iter().map(row).collect(),
    )
}

proptest! {
    #[test]
    fn text_is_title_space_channel(videos in prop::collection::vec(video(), 0..20)) {
        let (records, report) = transform(table(&videos), &FeedConfig::default()).unwrap();
        prop_assert_eq!(report.fault_count(), 0);

        for (record, video) in records.iter().zip(&videos) {
            let expected = format!(
                "{} {}",
                video.title.as_deref().unwrap_or(""),
                video.channel.as_deref().unwrap_or("")
            );
            prop_assert_eq!(&record.fields.text, &Value::String(expected));
        }
    }

    #[test]
    fn count_order_and_keys_are_preserved(videos in prop::collection::vec(video(), 0..20)) {
        let feed = FeedConfig::default();
        let (records, _) = transform(table(&videos), &feed).unwrap();
        prop_assert_eq!(records.len(), videos.len());

        for (record, video) in records.iter().zip(&videos) {
            prop_assert_eq!(&record.fields.doc_id, &video.id);
            prop_assert_eq!(
                &record.put,
                &format!("id:{}:{}::{}", feed.namespace, feed.document_type, video.id)
            );
            prop_assert_eq!(&record.fields.views, &Value::from(video.views));
        }
    }

    #[test]
    fn csv_file_round_trips_through_feed_lines(videos in prop::collection::vec(video(), 1..10)) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("videos.csv");
        let output = dir.path().join("feed.jsonl");

        let mut writer = csv::Writer::from_path(&input).unwrap();
        writer.write_record(REQUIRED_COLUMNS).unwrap();
        for video in &videos {
            let views = video.views.to_string();
            writer
                .write_record([
                    video.id.as_str(),
                    video.title.as_deref().unwrap_or(""),
                    video.channel.as_deref().unwrap_or(""),
                    views.as_str(),
                    "1",
                    "0",
                    "2",
                    "2018-01-01T00:00:00.000Z",
                ])
                .unwrap();
        }
        writer.flush().unwrap();
        drop(writer);

        let summary = convert(&input, &output, &FeedConfig::default()).unwrap();
        prop_assert_eq!(summary.written, videos.len());

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        prop_assert_eq!(lines.len(), videos.len());

        for (line, video) in lines.iter().zip(&videos) {
            let object = line.as_object().unwrap();
            let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
            keys.sort_unstable();
            prop_assert_eq!(keys, vec!["fields", "put"]);

            let fields = object["fields"].as_object().unwrap();
            prop_assert_eq!(fields.len(), 8);
            prop_assert!(!fields.contains_key("channel_title"));
            prop_assert_eq!(&fields["doc_id"], &Value::String(video.id.clone()));
            prop_assert_eq!(&fields["views"], &Value::from(video.views));
        }
    }
}
