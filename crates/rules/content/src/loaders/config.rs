//! Build configuration loader.

use std::path::Path;

use crate::config::BuildConfig;
use crate::loaders::{LoadResult, read_file};

/// Loader for build configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing BuildConfig
    pub fn load(path: &Path) -> LoadResult<BuildConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BuildConfig> {
        let config: BuildConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
