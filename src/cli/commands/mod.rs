//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod feed;
pub mod lookup;
pub mod recommend;
pub mod search;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a video CSV into a Vespa JSON-lines feed
    Feed(feed::FeedArgs),

    /// Keyword (bm25) or semantic search
    Search(search::SearchArgs),

    /// Fetch one document, embedding included, by doc_id
    Lookup(lookup::LookupArgs),

    /// Recommend documents near a document's embedding or a given vector
    Recommend(recommend::RecommendArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Feed(args) => feed::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Lookup(args) => lookup::run(ctx, args),
        Commands::Recommend(args) => recommend::run(ctx, args),
    }
}
