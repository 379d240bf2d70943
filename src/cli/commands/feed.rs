//! vtube feed - Convert a video CSV into a Vespa feed

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{
    HumanLayout, RobotResponse, RobotStatus, emit_human, emit_robot, robot_ok,
};
use crate::error::Result;
use crate::feed::{self, FeedSummary};
use crate::feed::writer::STDOUT_PATH;

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Input CSV with a header row
    pub input: PathBuf,

    /// Output JSON-lines file (`-` for stdout)
    pub output: PathBuf,
}

#[derive(Serialize)]
struct FeedReport<'a> {
    input: String,
    output: String,
    #[serde(flatten)]
    summary: &'a FeedSummary,
}

pub fn run(ctx: &AppContext, args: &FeedArgs) -> Result<()> {
    let summary = feed::convert(&args.input, &args.output, &ctx.config.feed)?;

    // The feed itself owns stdout in this case; the summary only goes to the log.
    if args.output.as_os_str() == STDOUT_PATH {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Json => emit_robot(&robot_report(args, &summary)),
        OutputFormat::Human => {
            emit_human(human_report(args, &summary));
            Ok(())
        }
    }
}

/// `ok`, or `partial` with a warning when some rows have no search text.
fn robot_report<'a>(args: &FeedArgs, summary: &'a FeedSummary) -> RobotResponse<FeedReport<'a>> {
    let mut response = robot_ok(FeedReport {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        summary,
    });
    if summary.derivation_faults > 0 {
        response.status = RobotStatus::Partial {
            completed: summary.written.saturating_sub(summary.derivation_faults),
            failed: summary.derivation_faults,
        };
        response
            .warnings
            .push(format!("{} rows have no search text", summary.derivation_faults));
    }
    response
}

fn human_report(args: &FeedArgs, summary: &FeedSummary) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title("Feed written")
        .kv("Input", &args.input.display().to_string())
        .kv("Output", &args.output.display().to_string())
        .kv("Rows", &summary.rows.to_string())
        .kv("Records", &summary.written.to_string());
    if summary.derivation_faults > 0 {
        layout.kv(
            "Missing text",
            &format!("{} (see log for details)", summary.derivation_faults),
        );
    }
    layout
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn args() -> FeedArgs {
        FeedArgs {
            input: PathBuf::from("USvideos.csv"),
            output: PathBuf::from("feed.jsonl"),
        }
    }

    fn summary(derivation_faults: usize) -> FeedSummary {
        FeedSummary {
            rows: 10,
            written: 10,
            derivation_faults,
        }
    }

    #[test]
    fn clean_run_is_ok_without_warnings() {
        let summary = summary(0);
        let value = serde_json::to_value(robot_report(&args(), &summary)).unwrap();

        assert_eq!(value["status"], json!("ok"));
        assert!(value.get("warnings").is_none());
        assert_eq!(value["data"]["written"], json!(10));
        assert_eq!(value["data"]["input"], json!("USvideos.csv"));
    }

    #[test]
    fn faulted_rows_make_partial_status() {
        let summary = summary(3);
        let value = serde_json::to_value(robot_report(&args(), &summary)).unwrap();

        assert_eq!(value["status"]["partial"]["completed"], json!(7));
        assert_eq!(value["status"]["partial"]["failed"], json!(3));
        assert_eq!(value["data"]["derivation_faults"], json!(3));
        assert_eq!(
            value["warnings"],
            Value::Array(vec![json!("3 rows have no search text")])
        );
    }

    #[test]
    fn human_report_lists_missing_text_only_when_present() {
        console::set_colors_enabled(false);

        let clean = human_report(&args(), &summary(0)).build();
        assert!(clean.contains("Records"));
        assert!(!clean.contains("Missing text"));

        let faulted = human_report(&args(), &summary(2)).build();
        assert!(faulted.contains("Missing text   2 (see log for details)"));
    }
}
