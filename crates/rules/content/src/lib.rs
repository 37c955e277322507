//! Pathfinder 2E content and the Remaster transformation.
//!
//! This crate houses the rules content and everything that turns it into
//! registered rules:
//! - The legacy catalog (RON data, embedded)
//! - Remaster derivations, literals, removals and sweeps (RON data, embedded)
//! - The Remaster catalog builder and its report
//! - Extra rule callbacks for classes, ancestries and feats
//! - Build configuration (TOML)
//! - The legacy and Remaster ruleset plugins
//!
//! Every data file can also be loaded from disk through [`ContentFactory`].

pub mod config;
pub mod legacy;
pub mod loaders;
pub mod remaster;
pub mod ruleset;

pub use config::{BuildConfig, Strictness};
pub use legacy::{LEGACY_EDITION, legacy_catalog};
pub use loaders::{
    CatalogFile, CatalogLoader, ConfigLoader, ContentFactory, DerivationLoader, LoadResult,
    RemovalLoader, SweepLoader,
};
pub use remaster::{
    BuildError, BuildReport, CatalogBuilder, Derivation, ExtraFn, ExtraRules, Issue,
    RemasterData, Removal, SweepStep,
};
pub use ruleset::{LegacyRuleset, RegisterSummary, RemasterRuleset, Ruleset};
