//! vtube search - Keyword or semantic search

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, render_table, robot_ok};
use crate::error::Result;
use crate::query::ResultTable;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (may be empty)
    pub query: String,

    /// keyword ranks with bm25; semantic embeds the query server side
    #[arg(long, value_enum, default_value_t = SearchMode::Keyword)]
    pub mode: SearchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    Semantic,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
        }
    }
}

#[derive(Serialize)]
struct SearchReport<'a> {
    query: &'a str,
    mode: SearchMode,
    count: usize,
    results: &'a ResultTable,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let client = ctx.search_client()?;
    let table = match args.mode {
        SearchMode::Keyword => client.keyword_search(&args.query)?,
        SearchMode::Semantic => client.semantic_search(&args.query)?,
    };

    match ctx.output_format {
        OutputFormat::Json => emit_robot(&robot_ok(SearchReport {
            query: &args.query,
            mode: args.mode,
            count: table.len(),
            results: &table,
        })),
        OutputFormat::Human => {
            let mut layout = HumanLayout::new();
            layout
                .title(&format!("{} search: {}", args.mode.as_str(), args.query))
                .push_line(render_table(&table));
            emit_human(layout);
            Ok(())
        }
    }
}
