//! vtube recommend - Nearest documents by embedding

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, render_table, robot_ok};
use crate::error::Result;
use crate::query::ResultTable;

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Recommend by this document's stored embedding
    #[arg(required_unless_present = "vector", conflicts_with = "vector")]
    pub doc_id: Option<String>,

    /// Recommend by an explicit comma-separated vector
    #[arg(long, value_delimiter = ',', num_args = 1, allow_hyphen_values = true)]
    pub vector: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct RecommendReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_id: Option<&'a str>,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a ResultTable>,
}

pub fn run(ctx: &AppContext, args: &RecommendArgs) -> Result<()> {
    let client = ctx.search_client()?;
    let table = match (&args.doc_id, &args.vector) {
        (Some(doc_id), _) => client.recommend_similar(doc_id)?,
        (None, Some(vector)) => Some(client.recommend_by_embedding(vector)?),
        (None, None) => None,
    };

    match ctx.output_format {
        OutputFormat::Json => emit_robot(&robot_ok(RecommendReport {
            doc_id: args.doc_id.as_deref(),
            found: table.is_some(),
            results: table.as_ref(),
        })),
        OutputFormat::Human => {
            let mut layout = HumanLayout::new();
            match (&table, &args.doc_id) {
                (Some(table), Some(doc_id)) => {
                    layout
                        .title(&format!("Similar to {doc_id}"))
                        .push_line(render_table(table));
                }
                (Some(table), None) => {
                    layout.title("Nearest to vector").push_line(render_table(table));
                }
                (None, doc_id) => {
                    layout.push_line(format!(
                        "No document with doc_id {}",
                        doc_id.as_deref().unwrap_or("?")
                    ));
                }
            }
            emit_human(layout);
            Ok(())
        }
    }
}
