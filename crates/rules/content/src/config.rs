//! Build configuration.

use rules_core::NoopPolicy;
use serde::{Deserialize, Serialize};

/// How a catalog build treats the issues it finds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Log and record issues, keep building.
    #[default]
    Lenient,
    /// Fail on the first issue.
    Strict,
}

impl Strictness {
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Settings for building and registering a catalog.
///
/// Every field has a default, so a partial (or empty) `config.toml` is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Label the built catalog carries.
    pub edition: String,
    pub strictness: Strictness,
    /// Policy for derivation patches that match nothing.
    pub noop_patches: NoopPolicy,
}

impl BuildConfig {
    pub const REMASTER_EDITION: &'static str = "Pathfinder 2E Remaster";

    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Self::default()
        }
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = edition.into();
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            edition: Self::REMASTER_EDITION.to_string(),
            strictness: Strictness::Lenient,
            noop_patches: NoopPolicy::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_uses_defaults() {
        let config: BuildConfig = toml::from_str(r#"strictness = "strict""#).unwrap();
        assert_eq!(config.strictness, Strictness::Strict);
        assert_eq!(config.noop_patches, NoopPolicy::Warn);
        assert_eq!(config.edition, BuildConfig::REMASTER_EDITION);

        let config: BuildConfig = toml::from_str(r#"noop_patches = "deny""#).unwrap();
        assert_eq!(config.noop_patches, NoopPolicy::Deny);
        assert!(!config.strictness.is_strict());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(toml::from_str::<BuildConfig>(r#"noop_patches = "ignore""#).is_err());
    }
}
