//! Remaster catalog construction.
//!
//! The Remaster catalog is built from the legacy catalog plus four data
//! sets: derivations (entries produced by patching a legacy entry), literals
//! (entries written in full), removals (legacy entries the Remaster drops),
//! and sweeps (edits applied across a whole table). Every legacy entry not
//! named by any of these carries over unchanged.

mod builder;
pub mod extras;
mod report;

pub use builder::CatalogBuilder;
pub use extras::{ExtraFn, ExtraRules};
pub use report::{BuildError, BuildReport, Issue};

use rules_core::{ContentKind, ContentTable, Patch, Sweep};
use serde::{Deserialize, Serialize};

/// A Remaster entry expressed as patches over a legacy entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub kind: ContentKind,
    pub name: String,
    /// Legacy entry to start from when it was renamed. Defaults to `name`.
    #[serde(default)]
    pub from: Option<String>,
    pub patches: Vec<Patch>,
}

impl Derivation {
    pub fn source_name(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.name)
    }
}

/// A sweep bound to the table it runs over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStep {
    pub kind: ContentKind,
    pub sweep: Sweep,
}

/// Legacy entries of one kind that the Remaster drops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub kind: ContentKind,
    pub names: Vec<String>,
}

/// Everything the Remaster build needs besides the legacy catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemasterData {
    pub derivations: Vec<Derivation>,
    pub literals: Vec<ContentTable>,
    pub removals: Vec<Removal>,
    pub sweeps: Vec<SweepStep>,
}
