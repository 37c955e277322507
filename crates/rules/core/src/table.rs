//! Content tables and catalogs.
//!
//! A [`ContentTable`] maps content names to attribute strings for one
//! [`ContentKind`]; a [`Catalog`] holds one table per kind for an edition.
//! Tables are built once and then handed out read-only.

use std::collections::{BTreeMap, BTreeSet};

use crate::attrs::{AttrString, GrammarError};
use crate::error::{ErrorContext, ErrorSeverity, RulesError};
use crate::record::ContentKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("{kind} table already has an entry named {name:?}")]
    DuplicateEntry { kind: ContentKind, name: String },

    #[error("{kind} table has no entry named {name:?}")]
    MissingEntry { kind: ContentKind, name: String },

    #[error("{context}: {source}")]
    InvalidEntry {
        context: ErrorContext,
        source: GrammarError,
    },
}

impl RulesError for TableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvalidEntry { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEntry { .. } => "TABLE_DUPLICATE_ENTRY",
            Self::MissingEntry { .. } => "TABLE_MISSING_ENTRY",
            Self::InvalidEntry { .. } => "TABLE_INVALID_ENTRY",
        }
    }
}

/// Name → attribute string for one content kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTable {
    kind: ContentKind,
    entries: BTreeMap<String, String>,
    /// One-shot sweeps already applied to this table.
    sweeps: BTreeSet<&'static str>,
}

impl ContentTable {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
            sweeps: BTreeSet::new(),
        }
    }

    /// Builds a table from `(name, attrs)` pairs, rejecting duplicate names.
    pub fn from_entries<I, K, V>(kind: ContentKind, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new(kind);
        for (name, attrs) in entries {
            table.insert(name, attrs)?;
        }
        Ok(table)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Adds a new entry. Names are unique within a table.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        attrs: impl Into<String>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(TableError::DuplicateEntry {
                kind: self.kind,
                name,
            });
        }
        self.entries.insert(name, attrs.into());
        Ok(())
    }

    /// Replaces the value of an existing entry.
    pub fn replace(&mut self, name: &str, attrs: impl Into<String>) -> Result<(), TableError> {
        match self.entries.get_mut(name) {
            Some(value) => {
                *value = attrs.into();
                Ok(())
            }
            None => Err(TableError::MissingEntry {
                kind: self.kind,
                name: name.to_string(),
            }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, attrs)| (name.as_str(), attrs.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> + '_ {
        self.entries
            .iter_mut()
            .map(|(name, attrs)| (name.as_str(), attrs))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a one-shot sweep. Returns false if it was already recorded.
    pub(crate) fn mark_sweep(&mut self, id: &'static str) -> bool {
        self.sweeps.insert(id)
    }

    pub fn has_sweep(&self, id: &str) -> bool {
        self.sweeps.contains(id)
    }

    /// Checks every entry against the attribute-string grammar.
    ///
    /// Returns every failing entry rather than stopping at the first.
    pub fn validate(&self) -> Vec<TableError> {
        self.entries
            .iter()
            .filter_map(|(name, attrs)| {
                AttrString::parse(attrs).err().map(|source| TableError::InvalidEntry {
                    context: ErrorContext::new().with_kind(self.kind).with_name(name),
                    source,
                })
            })
            .collect()
    }
}

/// One [`ContentTable`] per kind for a single edition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    edition: String,
    tables: BTreeMap<ContentKind, ContentTable>,
}

impl Catalog {
    pub fn new(edition: impl Into<String>) -> Self {
        Self {
            edition: edition.into(),
            tables: BTreeMap::new(),
        }
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn table(&self, kind: ContentKind) -> Option<&ContentTable> {
        self.tables.get(&kind)
    }

    /// Mutable table for `kind`, created empty on first access.
    pub fn table_mut(&mut self, kind: ContentKind) -> &mut ContentTable {
        self.tables
            .entry(kind)
            .or_insert_with(|| ContentTable::new(kind))
    }

    /// Installs `table`, replacing any table of the same kind.
    pub fn set_table(&mut self, table: ContentTable) {
        self.tables.insert(table.kind(), table);
    }

    pub fn entry(&self, kind: ContentKind, name: &str) -> Option<&str> {
        self.table(kind).and_then(|table| table.get(name))
    }

    pub fn tables(&self) -> impl Iterator<Item = &ContentTable> + '_ {
        self.tables.values()
    }

    /// Total entries across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(ContentTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries as `(kind, name, attrs)`, ordered so that ancestries,
    /// heritages, and classes are registered before the feats that name them.
    pub fn registration_order(&self) -> Vec<(ContentKind, &str, &str)> {
        let mut tables: Vec<&ContentTable> = self.tables.values().collect();
        tables.sort_by_key(|table| table.kind().registration_order());
        tables
            .into_iter()
            .flat_map(|table| table.iter().map(move |(name, attrs)| (table.kind(), name, attrs)))
            .collect()
    }

    /// Grammar errors across every table.
    pub fn validate(&self) -> Vec<TableError> {
        self.tables.values().flat_map(ContentTable::validate).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_are_unique() {
        let mut table = ContentTable::new(ContentKind::Feat);
        table.insert("Toughness", "Traits=General").unwrap();
        assert_eq!(
            table.insert("Toughness", "Traits=General,Skill"),
            Err(TableError::DuplicateEntry {
                kind: ContentKind::Feat,
                name: "Toughness".to_string()
            })
        );
        assert_eq!(table.get("Toughness"), Some("Traits=General"));

        table.replace("Toughness", "Traits=General,Skill").unwrap();
        assert_eq!(table.get("Toughness"), Some("Traits=General,Skill"));
        assert!(table.replace("Fleet", "Traits=General").is_err());
    }

    #[test]
    fn validate_reports_each_bad_entry() {
        let table = ContentTable::from_entries(
            ContentKind::Feat,
            [
                ("Good", "Traits=General"),
                ("Bad Quote", "Traits=\"General"),
                ("No Equals", "Traits"),
            ],
        )
        .unwrap();

        let errors = table.validate();
        assert_eq!(errors.len(), 2);
        let names: Vec<_> = errors
            .iter()
            .filter_map(|e| e.context().and_then(|c| c.name.clone()))
            .collect();
        assert_eq!(names, vec!["Bad Quote", "No Equals"]);
    }

    #[test]
    fn registration_order_puts_feats_after_ancestries() {
        let mut catalog = Catalog::new("test");
        catalog
            .table_mut(ContentKind::Feat)
            .insert("Dwarven Lore", "Traits=Dwarf")
            .unwrap();
        catalog
            .table_mut(ContentKind::Ancestry)
            .insert("Dwarf", "HitPoints=10")
            .unwrap();

        let order: Vec<_> = catalog
            .registration_order()
            .into_iter()
            .map(|(kind, name, _)| (kind, name))
            .collect();
        assert_eq!(
            order,
            vec![
                (ContentKind::Ancestry, "Dwarf"),
                (ContentKind::Feat, "Dwarven Lore")
            ]
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entry(ContentKind::Ancestry, "Dwarf"), Some("HitPoints=10"));
    }
}
