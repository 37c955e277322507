//! Rule registration dispatcher.
//!
//! [`choice_rules`] is the single entry point a host calls once per content
//! item. It parses the attribute string into the typed record for the item's
//! kind and hands it to that kind's constructor, which defines the item's
//! choices and derived rules on the registry.
//!
//! Parsing happens before any registration, so a malformed item never leaves
//! a half-registered entry behind.

mod character;
mod equipment;
mod feats;
mod spells;

pub use feats::{FeatBucket, classify_feat};

use character::{
    ancestry_rules, background_rules, class_rules, deity_rules, feature_rules, heritage_rules,
    language_rules, skill_rules,
};
use equipment::{armor_rules, goody_rules, shield_rules, weapon_rules};
use feats::feat_rules;
use spells::spell_rules;

use std::str::FromStr;

use crate::attrs::{AttrString, GrammarError};
use crate::error::{ErrorContext, ErrorSeverity, RulesError};
use crate::record::{ContentKind, FromAttrs, Record, RecordError};
use crate::registry::{RuleDef, RuleRegistry};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("{context}: {source}")]
    Grammar {
        context: ErrorContext,
        source: GrammarError,
    },

    #[error("{context}: {source}")]
    Record {
        context: ErrorContext,
        source: RecordError,
    },
}

impl RulesError for DispatchError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Grammar { context, .. } | Self::Record { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Grammar { source, .. } => source.error_code(),
            Self::Record { source, .. } => source.error_code(),
        }
    }
}

/// What a single `choice_rules` call registered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    /// `(group, name)` pairs defined as choices.
    pub choices: Vec<(String, String)>,
    /// Number of rules defined.
    pub rules: usize,
}

impl Registration {
    pub fn in_group(&self, group: &str) -> impl Iterator<Item = &str> + '_ {
        let group = group.to_string();
        self.choices
            .iter()
            .filter(move |(g, _)| *g == group)
            .map(|(_, name)| name.as_str())
    }

    pub fn has_choice(&self, group: &str, name: &str) -> bool {
        self.choices.iter().any(|(g, n)| g == group && n == name)
    }
}

/// Registry wrapper that records what a constructor registers.
pub(crate) struct Recorder<'a, R: RuleRegistry + ?Sized> {
    registry: &'a mut R,
    registration: Registration,
}

impl<'a, R: RuleRegistry + ?Sized> Recorder<'a, R> {
    pub(crate) fn new(registry: &'a mut R) -> Self {
        Self {
            registry,
            registration: Registration::default(),
        }
    }

    pub(crate) fn choice(&mut self, group: &str, name: &str, attrs: &str) {
        self.registry.define_choice(group, name, attrs);
        self.registration
            .choices
            .push((group.to_string(), name.to_string()));
    }

    pub(crate) fn rule(&mut self, rule: RuleDef) {
        tracing::trace!(%rule, "define rule");
        self.registry.define_rule(rule);
        self.registration.rules += 1;
    }

    pub(crate) fn registry(&self) -> &R {
        self.registry
    }

    pub(crate) fn finish(self) -> Registration {
        self.registration
    }
}

/// Registers one content item.
///
/// # Errors
///
/// Returns an error, without touching `registry`, if `attrs` does not parse
/// or lacks a field the kind requires.
pub fn choice_rules<R: RuleRegistry + ?Sized>(
    registry: &mut R,
    kind: ContentKind,
    name: &str,
    attrs: &str,
) -> Result<Registration, DispatchError> {
    let context = || ErrorContext::new().with_kind(kind).with_name(name);
    let parsed = AttrString::parse(attrs).map_err(|source| DispatchError::Grammar {
        context: context(),
        source,
    })?;
    let record = Record::from_attrs(kind, &parsed).map_err(|source| DispatchError::Record {
        context: context(),
        source,
    })?;

    let mut recorder = Recorder::new(registry);
    match record {
        Record::Ancestry(r) => ancestry_rules(&mut recorder, name, &r, attrs),
        Record::Armor(r) => armor_rules(&mut recorder, name, &r, attrs),
        Record::Background(r) => background_rules(&mut recorder, name, &r, attrs),
        Record::Class(r) => class_rules(&mut recorder, name, &r, attrs),
        Record::Deity(r) => deity_rules(&mut recorder, name, &r, attrs),
        Record::Feat(r) => feat_rules(&mut recorder, name, &r, attrs),
        Record::Feature(r) => feature_rules(&mut recorder, kind, name, &r, attrs),
        Record::Goody(r) => goody_rules(&mut recorder, name, &r, attrs),
        Record::Heritage(r) => heritage_rules(&mut recorder, name, &r, attrs),
        Record::Language(r) => language_rules(&mut recorder, name, &r, attrs),
        Record::Shield(r) => shield_rules(&mut recorder, name, &r, attrs),
        Record::Skill(r) => skill_rules(&mut recorder, name, &r, attrs),
        Record::Spell(r) => spell_rules(&mut recorder, name, &r, &parsed),
        Record::Weapon(r) => weapon_rules(&mut recorder, name, &r, attrs),
    }

    let registration = recorder.finish();
    tracing::debug!(
        %kind,
        name,
        choices = registration.choices.len(),
        rules = registration.rules,
        "registered"
    );
    Ok(registration)
}

/// Registers one content item named by the host's type string.
///
/// An unrecognized `type_name` is logged and skipped: the result is
/// `Ok(None)` and `registry` is left untouched.
pub fn choice_rules_by_name<R: RuleRegistry + ?Sized>(
    registry: &mut R,
    type_name: &str,
    name: &str,
    attrs: &str,
) -> Result<Option<Registration>, DispatchError> {
    match ContentKind::from_str(type_name) {
        Ok(kind) => choice_rules(registry, kind, name, attrs).map(Some),
        Err(_) => {
            tracing::warn!(type_name, name, "unknown choice type; skipping");
            Ok(None)
        }
    }
}

/// Parses `attrs` as a record of type `T`, for callers that need the typed
/// record outside of registration.
pub fn parse_record<T: FromAttrs>(attrs: &str) -> Result<T, RecordError> {
    let parsed = AttrString::parse(attrs)?;
    T::from_attrs(&parsed)
}

/// Rule-name prefix for a content name: `Half-Elf` → `halfElf`.
pub fn rule_prefix(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if out.is_empty() {
                out.push(c.to_ascii_lowercase());
            } else if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChoiceRegistry;

    #[test]
    fn prefixes() {
        assert_eq!(rule_prefix("Half-Elf"), "halfElf");
        assert_eq!(rule_prefix("Elf"), "elf");
        assert_eq!(rule_prefix("Acolyte of the Deep"), "acolyteOfTheDeep");
        assert_eq!(rule_prefix("Attack Of Opportunity"), "attackOfOpportunity");
    }

    #[test]
    fn unknown_type_is_skipped_without_mutation() {
        let mut registry = ChoiceRegistry::new();
        let result =
            choice_rules_by_name(&mut registry, "Vehicle", "Wagon", "Speed=20 Price=5").unwrap();
        assert_eq!(result, None);
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_attrs_leave_registry_untouched() {
        let mut registry = ChoiceRegistry::new();
        let err =
            choice_rules(&mut registry, ContentKind::Ancestry, "Elf", "HitPoints=\"6").unwrap_err();
        assert!(matches!(err, DispatchError::Grammar { .. }));
        assert_eq!(
            err.context().and_then(|c| c.name.as_deref()),
            Some("Elf")
        );

        let err = choice_rules(&mut registry, ContentKind::Ancestry, "Elf", "Size=Medium")
            .unwrap_err();
        assert!(matches!(err, DispatchError::Record { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn by_name_dispatches_known_types() {
        let mut registry = ChoiceRegistry::new();
        let registration = choice_rules_by_name(&mut registry, "Language", "Draconic", "")
            .unwrap()
            .unwrap();
        assert!(registration.has_choice("languages", "Draconic"));
        assert!(registry.has_choice("languages", "Draconic"));
    }
}
