use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::query::SearchClient;

pub struct AppContext {
    pub project_dir: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_dir)?;

        Ok(Self {
            project_dir,
            config,
            output_format: cli.output_format(),
        })
    }

    /// A fresh client for the configured endpoint.
    pub fn search_client(&self) -> Result<SearchClient> {
        SearchClient::from_config(&self.config.endpoint, &self.config.search)
    }
}
