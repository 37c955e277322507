//! Content table loader.
//!
//! A catalog file holds the entries of one content kind:
//!
//! ```ron
//! (
//!     kind: Ancestry,
//!     entries: [
//!         ("Dwarf", r#"HitPoints=10 Traits=Dwarf,Humanoid"#),
//!     ],
//! )
//! ```
//!
//! Entries are a list rather than a map so duplicate names are caught
//! instead of silently overwritten.

use std::path::Path;

use anyhow::Context;
use rules_core::{Catalog, ContentKind, ContentTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub kind: ContentKind,
    pub entries: Vec<(String, String)>,
}

impl CatalogFile {
    pub fn into_table(self) -> LoadResult<ContentTable> {
        Ok(ContentTable::from_entries(self.kind, self.entries)?)
    }
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// Load one table from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentTable> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, origin: &str) -> LoadResult<ContentTable> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON {}: {}", origin, e))?;
        file.into_table()
            .with_context(|| format!("Invalid catalog {origin}"))
    }

    /// Load a list of tables from one RON file (used for literals).
    pub fn load_many(path: &Path) -> LoadResult<Vec<ContentTable>> {
        let content = read_file(path)?;
        Self::parse_many(&content, &path.display().to_string())
    }

    pub fn parse_many(content: &str, origin: &str) -> LoadResult<Vec<ContentTable>> {
        let files: Vec<CatalogFile> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON {}: {}", origin, e))?;
        files
            .into_iter()
            .map(|file| {
                file.into_table()
                    .with_context(|| format!("Invalid catalog {origin}"))
            })
            .collect()
    }

    /// Load every `*.ron` file in `dir` into one catalog.
    ///
    /// Files are read in name order; several files may contribute to the
    /// same kind as long as their names do not collide.
    pub fn load_dir(dir: &Path, edition: &str) -> LoadResult<Catalog> {
        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read catalog directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Catalog::new(edition);
        for path in paths {
            let table = Self::load(&path)?;
            merge_table(&mut catalog, table)
                .with_context(|| format!("Failed to merge {}", path.display()))?;
        }
        Ok(catalog)
    }
}

/// Adds `table`'s entries to the catalog's table of the same kind.
pub(crate) fn merge_table(catalog: &mut Catalog, table: ContentTable) -> LoadResult<()> {
    let target = catalog.table_mut(table.kind());
    for (name, attrs) in table.iter() {
        target.insert(name, attrs)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_string_entries() {
        let table = CatalogLoader::parse(
            r##"(
                kind: Heritage,
                entries: [
                    ("Ancient Elf", r#"Traits=Elf"#),
                    ("Aiuvarin", r#"Traits=Aiuvarin,Elf Features="1:Low-Light Vision""#),
                ],
            )"##,
            "test",
        )
        .unwrap();

        assert_eq!(table.kind(), ContentKind::Heritage);
        assert_eq!(
            table.get("Aiuvarin"),
            Some(r#"Traits=Aiuvarin,Elf Features="1:Low-Light Vision""#)
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = CatalogLoader::parse(
            r#"(kind: Feat, entries: [("Toughness", "Traits=General"), ("Toughness", "Traits=General")])"#,
            "feats.ron",
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Toughness"));
        assert!(format!("{err:#}").contains("feats.ron"));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        assert!(CatalogLoader::parse(r#"(kind: Vehicle, entries: [])"#, "test").is_err());
    }
}
