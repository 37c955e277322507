//! Loaders for the RON/TOML data files.
//!
//! Every loader reads either a file on disk (`load`) or text already in
//! memory (`parse`, used for the embedded copies). `origin` names the text in
//! error messages.

pub mod catalog;
pub mod config;
pub mod derivations;
mod embedded;
pub mod factory;
pub mod sweeps;

pub use catalog::{CatalogFile, CatalogLoader};
pub use config::ConfigLoader;
pub use derivations::{DerivationLoader, RemovalLoader};
pub use factory::ContentFactory;
pub use sweeps::SweepLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
