//! Content records, patches, and rule registration for Pathfinder 2E rulesets.
//!
//! `rules-core` is the I/O-free half of a ruleset plugin. It defines the
//! attribute-string grammar every content record is written in, the typed
//! records parsed out of those strings, content tables and catalogs, typed
//! patches for deriving one edition's records from another's, table-wide
//! sweeps, and the [`dispatch::choice_rules`] entry point that turns a
//! `(kind, name, attrs)` triple into choices and rules on a
//! [`registry::RuleRegistry`].
//!
//! Formulas attached to rules stay opaque ([`registry::Expr`]); evaluating
//! them is the host engine's job.

pub mod attrs;
pub mod dispatch;
pub mod error;
pub mod patch;
pub mod record;
pub mod registry;
pub mod sweep;
pub mod table;

pub use attrs::{AttrField, AttrItem, AttrString, FeatureRef, GrammarError};
pub use dispatch::{
    DispatchError, FeatBucket, Registration, choice_rules, choice_rules_by_name, classify_feat,
    parse_record, rule_prefix,
};
pub use error::{ErrorContext, ErrorSeverity, RulesError};
pub use patch::{NoopPolicy, Patch, PatchError, PatchOp, Patched, apply_patches};
pub use record::{ContentKind, FromAttrs, Record, RecordError};
pub use registry::{ChoiceRegistry, Expr, RuleDef, RuleOp, RuleRegistry};
pub use sweep::{Sweep, SweepError};
pub use table::{Catalog, ContentTable, TableError};
