//! vtube lookup - Fetch one document by doc_id

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, cell_text, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::query::Hit;
use crate::utils::format::truncate_string;

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Document id (the source video_id)
    pub doc_id: String,
}

#[derive(Serialize)]
struct LookupReport<'a> {
    doc_id: &'a str,
    found: bool,
    hit: Option<&'a Hit>,
}

pub fn run(ctx: &AppContext, args: &LookupArgs) -> Result<()> {
    let client = ctx.search_client()?;
    let hit = client.fetch_embedding_by_doc_id(&args.doc_id)?;

    match ctx.output_format {
        OutputFormat::Json => emit_robot(&robot_ok(LookupReport {
            doc_id: &args.doc_id,
            found: hit.is_some(),
            hit: hit.as_ref(),
        })),
        OutputFormat::Human => {
            let mut layout = HumanLayout::new();
            let Some(hit) = hit else {
                layout.push_line(format!("No document with doc_id {}", args.doc_id));
                emit_human(layout);
                return Ok(());
            };

            layout.title(&format!("Document {}", args.doc_id));
            let field = &ctx.config.search.embedding_field;
            for (name, value) in &hit.fields {
                if name == field {
                    continue;
                }
                layout.kv(name, &truncate_string(&cell_text(Some(value)), 72));
            }
            let embedding = hit.vector(field).map_or_else(
                || "unreadable".to_string(),
                |vector| format!("{} dimensions", vector.len()),
            );
            layout.blank().kv(field, &embedding);
            emit_human(layout);
            Ok(())
        }
    }
}
