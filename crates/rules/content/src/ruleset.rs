//! Ruleset plugins.
//!
//! A [`Ruleset`] is what a host loads: an edition label, the catalog for that
//! edition, and the registration entry point. Registration runs the core
//! dispatcher for the item's kind and then the item's extra callback, if it
//! has one.

use rules_core::{
    AttrString, Catalog, ContentKind, DispatchError, ErrorContext, Registration, RuleRegistry,
};

use crate::config::{BuildConfig, Strictness};
use crate::legacy::legacy_catalog;
use crate::loaders::{ContentFactory, LoadResult};
use crate::remaster::{BuildReport, ExtraRules};

/// Totals from registering a whole catalog.
#[derive(Debug, Default)]
pub struct RegisterSummary {
    pub entries: usize,
    pub choices: usize,
    pub rules: usize,
    /// Entries left out in lenient mode.
    pub skipped: Vec<DispatchError>,
}

pub trait Ruleset {
    fn edition(&self) -> &str;

    fn catalog(&self) -> &Catalog;

    fn extras(&self) -> &ExtraRules;

    fn strictness(&self) -> Strictness;

    /// Registers one content item, then its extra rules.
    fn choice_rules(
        &self,
        registry: &mut dyn RuleRegistry,
        kind: ContentKind,
        name: &str,
        attrs: &str,
    ) -> Result<Registration, DispatchError> {
        let mut registration = rules_core::choice_rules(registry, kind, name, attrs)?;

        if let Some(callback) = self.extras().get(kind, name) {
            let parsed = AttrString::parse(attrs).map_err(|source| DispatchError::Grammar {
                context: ErrorContext::new().with_kind(kind).with_name(name),
                source,
            })?;
            for rule in callback(name, &parsed) {
                tracing::trace!(%rule, "define extra rule");
                registry.define_rule(rule);
                registration.rules += 1;
            }
        }
        Ok(registration)
    }

    /// Registers every catalog entry in registration order.
    ///
    /// # Errors
    ///
    /// In strict mode the first entry that fails to register stops the run.
    /// Lenient mode logs the entry, records it in
    /// [`RegisterSummary::skipped`], and moves on.
    fn register_all(
        &self,
        registry: &mut dyn RuleRegistry,
    ) -> Result<RegisterSummary, DispatchError> {
        let mut summary = RegisterSummary::default();
        for (kind, name, attrs) in self.catalog().registration_order() {
            match self.choice_rules(registry, kind, name, attrs) {
                Ok(registration) => {
                    summary.entries += 1;
                    summary.choices += registration.choices.len();
                    summary.rules += registration.rules;
                }
                Err(err) if !self.strictness().is_strict() => {
                    tracing::warn!(%kind, name, error = %err, "skipping entry");
                    summary.skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            edition = self.edition(),
            entries = summary.entries,
            choices = summary.choices,
            rules = summary.rules,
            skipped = summary.skipped.len(),
            "registered catalog"
        );
        Ok(summary)
    }
}

/// The legacy ruleset, registered as-is.
pub struct LegacyRuleset {
    catalog: Catalog,
    extras: ExtraRules,
}

impl LegacyRuleset {
    pub fn new() -> LoadResult<Self> {
        Ok(Self::from_catalog(legacy_catalog()?))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            extras: ExtraRules::legacy(),
        }
    }
}

impl Ruleset for LegacyRuleset {
    fn edition(&self) -> &str {
        self.catalog.edition()
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn extras(&self) -> &ExtraRules {
        &self.extras
    }

    fn strictness(&self) -> Strictness {
        Strictness::Lenient
    }
}

/// The Remaster ruleset, built from the legacy catalog at construction.
pub struct RemasterRuleset {
    catalog: Catalog,
    extras: ExtraRules,
    config: BuildConfig,
    report: BuildReport,
}

impl RemasterRuleset {
    /// Builds the Remaster catalog from the embedded data.
    pub fn new(config: BuildConfig) -> LoadResult<Self> {
        Self::from_factory(&ContentFactory::embedded(), config)
    }

    pub fn from_factory(factory: &ContentFactory, config: BuildConfig) -> LoadResult<Self> {
        let (catalog, report) = factory.build_remaster(&config)?;
        Ok(Self {
            catalog,
            extras: ExtraRules::remaster(),
            config,
            report,
        })
    }

    /// What the catalog build found.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }
}

impl Ruleset for RemasterRuleset {
    fn edition(&self) -> &str {
        self.catalog.edition()
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn extras(&self) -> &ExtraRules {
        &self.extras
    }

    fn strictness(&self) -> Strictness {
        self.config.strictness
    }
}

#[cfg(test)]
mod tests {
    use rules_core::{ChoiceRegistry, ContentTable, RuleOp};

    use super::*;

    fn catalog(tables: Vec<ContentTable>) -> Catalog {
        let mut catalog = Catalog::new("Test");
        for table in tables {
            catalog.set_table(table);
        }
        catalog
    }

    #[test]
    fn extra_rules_follow_the_base_registration() {
        let ruleset = LegacyRuleset::from_catalog(Catalog::new("Test"));
        let mut registry = ChoiceRegistry::new();

        let registration = ruleset
            .choice_rules(&mut registry, ContentKind::Feat, "Toughness", "Traits=General")
            .unwrap();

        assert!(registration.has_choice("generalFeats", "Toughness"));
        let hit_points: Vec<_> = registry.rules_for("hitPoints").collect();
        assert_eq!(hit_points.len(), 1);
        assert_eq!(hit_points[0].op, RuleOp::Add);
        assert_eq!(registration.rules, registry.rule_count());
    }

    #[test]
    fn lenient_registration_skips_bad_entries() {
        let feats = ContentTable::from_entries(
            ContentKind::Feat,
            [("Fleet", "Traits=General"), ("Broken", "Level=1")],
        )
        .unwrap();
        let ruleset = LegacyRuleset::from_catalog(catalog(vec![feats]));
        let mut registry = ChoiceRegistry::new();

        let summary = ruleset.register_all(&mut registry).unwrap();

        assert_eq!(summary.entries, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert!(registry.has_choice("feats", "Fleet"));
        assert!(!registry.has_choice("feats", "Broken"));
    }

    #[test]
    fn heritages_register_before_feats_that_name_them() {
        let heritages =
            ContentTable::from_entries(ContentKind::Heritage, [("Aiuvarin", "Traits=Aiuvarin")])
                .unwrap();
        let feats = ContentTable::from_entries(
            ContentKind::Feat,
            [("Elf Atavism", "Traits=Aiuvarin Require=\"level >= 1\"")],
        )
        .unwrap();
        let ruleset = LegacyRuleset::from_catalog(catalog(vec![feats, heritages]));
        let mut registry = ChoiceRegistry::new();

        ruleset.register_all(&mut registry).unwrap();

        assert!(registry.has_choice("ancestryFeats", "Elf Atavism"));
    }
}
