//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rules_core::Catalog;

use crate::config::BuildConfig;
use crate::legacy::LEGACY_EDITION;
use crate::loaders::catalog::merge_table;
use crate::loaders::{
    CatalogLoader, ConfigLoader, DerivationLoader, LoadResult, RemovalLoader, SweepLoader, embedded,
};
use crate::remaster::{BuildReport, CatalogBuilder, RemasterData};

enum Source {
    Dir(PathBuf),
    Embedded,
}

/// Content factory that loads rules content from a data directory, or from
/// the copy compiled into the crate.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── legacy/
/// │   ├── ancestries.ron
/// │   ├── heritages.ron
/// │   └── ...
/// └── remaster/
///     ├── derivations.ron
///     ├── literals.ron
///     ├── removals.ron
///     └── sweeps.ron
/// ```
///
/// `config.toml` and the `remaster/` files are optional; a missing one
/// counts as empty.
pub struct ContentFactory {
    source: Source,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Dir(data_dir.into()),
        }
    }

    /// Creates a factory over the data compiled into the crate.
    pub fn embedded() -> Self {
        Self {
            source: Source::Embedded,
        }
    }

    /// Returns the data directory path, `None` for embedded data.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Dir(dir) => Some(dir),
            Source::Embedded => None,
        }
    }

    /// Load build configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BuildConfig> {
        match &self.source {
            Source::Dir(dir) => {
                let path = dir.join("config.toml");
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    return Ok(BuildConfig::default());
                }
                ConfigLoader::load(&path)
            }
            Source::Embedded => ConfigLoader::parse(embedded::CONFIG),
        }
    }

    /// Load the legacy catalog from `legacy/`.
    pub fn load_legacy(&self) -> LoadResult<Catalog> {
        let catalog = match &self.source {
            Source::Dir(dir) => CatalogLoader::load_dir(&dir.join("legacy"), LEGACY_EDITION)?,
            Source::Embedded => {
                let mut catalog = Catalog::new(LEGACY_EDITION);
                for (origin, content) in embedded::LEGACY {
                    let table = CatalogLoader::parse(content, origin)?;
                    merge_table(&mut catalog, table)
                        .with_context(|| format!("Failed to merge {origin}"))?;
                }
                catalog
            }
        };
        tracing::debug!(entries = catalog.len(), "loaded legacy catalog");
        Ok(catalog)
    }

    /// Load derivations, literals, removals and sweeps from `remaster/`.
    pub fn load_remaster_data(&self) -> LoadResult<RemasterData> {
        match &self.source {
            Source::Dir(dir) => {
                let dir = dir.join("remaster");
                Ok(RemasterData {
                    derivations: optional(&dir.join("derivations.ron"), DerivationLoader::load)?,
                    literals: optional(&dir.join("literals.ron"), CatalogLoader::load_many)?,
                    removals: optional(&dir.join("removals.ron"), RemovalLoader::load)?,
                    sweeps: optional(&dir.join("sweeps.ron"), SweepLoader::load)?,
                })
            }
            Source::Embedded => Ok(RemasterData {
                derivations: DerivationLoader::parse(embedded::DERIVATIONS, "derivations.ron")?,
                literals: CatalogLoader::parse_many(embedded::LITERALS, "literals.ron")?,
                removals: RemovalLoader::parse(embedded::REMOVALS, "removals.ron")?,
                sweeps: SweepLoader::parse(embedded::SWEEPS, "sweeps.ron")?,
            }),
        }
    }

    /// Loads everything and builds the Remaster catalog.
    pub fn build_remaster(&self, config: &BuildConfig) -> LoadResult<(Catalog, BuildReport)> {
        let legacy = self.load_legacy()?;
        let data = self.load_remaster_data()?;
        let built = CatalogBuilder::new(&legacy, config).build(&data)?;
        Ok(built)
    }
}

fn optional<T: Default>(path: &Path, load: fn(&Path) -> LoadResult<T>) -> LoadResult<T> {
    if path.exists() {
        load(path)
    } else {
        tracing::debug!(path = %path.display(), "missing data file, treating as empty");
        Ok(T::default())
    }
}
