//! The legacy (pre-Remaster) catalog.

use rules_core::Catalog;

use crate::loaders::{ContentFactory, LoadResult};

pub const LEGACY_EDITION: &str = "Pathfinder 2E";

/// The legacy catalog compiled into the crate.
pub fn legacy_catalog() -> LoadResult<Catalog> {
    ContentFactory::embedded().load_legacy()
}
