//! Content source resolution
//!
//! Commands read from a data directory when one is given (`--data-dir` or
//! `RULES_DATA_DIR`) and from the data compiled into `rules-content`
//! otherwise.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use rules_content::ContentFactory;

/// Where content is read from, shared by every command
#[derive(Args, Debug, Clone)]
pub struct DataSource {
    /// Data directory holding `legacy/`, `remaster/`, and `config.toml`
    /// (defaults to the embedded data)
    #[arg(short, long, value_name = "DIR", env = "RULES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl DataSource {
    pub fn factory(&self) -> Result<ContentFactory> {
        match &self.data_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("Data directory not found: {}", dir.display());
                }
                Ok(ContentFactory::new(dir))
            }
            None => Ok(ContentFactory::embedded()),
        }
    }

    /// One-line description for command headers
    pub fn describe(&self) -> String {
        match &self.data_dir {
            Some(dir) => dir.display().to_string(),
            None => style("embedded").dim().to_string(),
        }
    }
}
