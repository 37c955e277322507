//! Typed content records.
//!
//! Each content kind has a record struct with explicit optional fields,
//! parsed out of an [`AttrString`]. Embedded expressions (`Require`, `Imply`,
//! `%{...}` note snippets) stay opaque [`Expr`] values.

mod character;
mod equipment;
mod kind;
mod spell;

pub use character::{
    AncestryRecord, BackgroundRecord, ClassRecord, DeityRecord, FeatRecord, FeatureRecord,
    HeritageRecord, LanguageRecord, SkillRecord,
};
pub use equipment::{ArmorRecord, GoodyEffect, GoodyRecord, ShieldRecord, WeaponRecord};
pub use kind::ContentKind;
pub use spell::SpellRecord;

use crate::attrs::{AttrString, FeatureRef, GrammarError};
use crate::error::{ErrorSeverity, RulesError};
use crate::registry::Expr;

/// Errors raised while turning an attribute string into a typed record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{kind} record is missing required field {field}")]
    MissingField {
        kind: ContentKind,
        field: &'static str,
    },

    #[error("{kind} field {field} has non-numeric value {value:?}")]
    InvalidNumber {
        kind: ContentKind,
        field: &'static str,
        value: String,
    },

    #[error("{kind} field {field} has unsupported value {value:?}")]
    InvalidValue {
        kind: ContentKind,
        field: &'static str,
        value: String,
    },

    #[error("{kind} record has {sections} sections but {notes} notes")]
    MismatchedNotes {
        kind: ContentKind,
        sections: usize,
        notes: usize,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl RulesError for RecordError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RecordError::*;
        match self {
            MissingField { .. } => "RECORD_MISSING_FIELD",
            InvalidNumber { .. } => "RECORD_INVALID_NUMBER",
            InvalidValue { .. } => "RECORD_INVALID_VALUE",
            MismatchedNotes { .. } => "RECORD_MISMATCHED_NOTES",
            Grammar(inner) => inner.error_code(),
        }
    }
}

/// Conversion from a parsed attribute string into a typed record.
pub trait FromAttrs: Sized {
    /// Kind reported in errors raised while parsing.
    const KIND: ContentKind;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError>;
}

/// Any typed record, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Ancestry(AncestryRecord),
    Armor(ArmorRecord),
    Background(BackgroundRecord),
    Class(ClassRecord),
    Deity(DeityRecord),
    Feat(FeatRecord),
    Feature(FeatureRecord),
    Goody(GoodyRecord),
    Heritage(HeritageRecord),
    Language(LanguageRecord),
    Shield(ShieldRecord),
    Skill(SkillRecord),
    Spell(SpellRecord),
    Weapon(WeaponRecord),
}

impl Record {
    /// Parses `attrs` as a record of `kind`.
    ///
    /// "X Feature" kinds parse as [`FeatureRecord`] and must name their owner.
    pub fn from_attrs(kind: ContentKind, attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(match kind {
            ContentKind::Ancestry => Self::Ancestry(AncestryRecord::from_attrs(attrs)?),
            ContentKind::Armor => Self::Armor(ArmorRecord::from_attrs(attrs)?),
            ContentKind::Background => Self::Background(BackgroundRecord::from_attrs(attrs)?),
            ContentKind::Class => Self::Class(ClassRecord::from_attrs(attrs)?),
            ContentKind::Deity => Self::Deity(DeityRecord::from_attrs(attrs)?),
            ContentKind::Feat => Self::Feat(FeatRecord::from_attrs(attrs)?),
            ContentKind::Feature
            | ContentKind::AncestryFeature
            | ContentKind::BackgroundFeature
            | ContentKind::ClassFeature => {
                Self::Feature(FeatureRecord::from_attrs_as(kind, attrs)?)
            }
            ContentKind::Goody => Self::Goody(GoodyRecord::from_attrs(attrs)?),
            ContentKind::Heritage => Self::Heritage(HeritageRecord::from_attrs(attrs)?),
            ContentKind::Language => Self::Language(LanguageRecord::from_attrs(attrs)?),
            ContentKind::Shield => Self::Shield(ShieldRecord::from_attrs(attrs)?),
            ContentKind::Skill => Self::Skill(SkillRecord::from_attrs(attrs)?),
            ContentKind::Spell => Self::Spell(SpellRecord::from_attrs(attrs)?),
            ContentKind::Weapon => Self::Weapon(WeaponRecord::from_attrs(attrs)?),
        })
    }
}

// ============================================================================
// Field helpers
// ============================================================================

pub(crate) fn required<'a>(
    attrs: &'a AttrString,
    kind: ContentKind,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    attrs
        .value(field)
        .ok_or(RecordError::MissingField { kind, field })
}

pub(crate) fn int(
    attrs: &AttrString,
    kind: ContentKind,
    field: &'static str,
) -> Result<Option<i64>, RecordError> {
    attrs
        .value(field)
        .map(|value| {
            value.parse::<i64>().map_err(|_| RecordError::InvalidNumber {
                kind,
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}

pub(crate) fn required_int(
    attrs: &AttrString,
    kind: ContentKind,
    field: &'static str,
) -> Result<i64, RecordError> {
    int(attrs, kind, field)?.ok_or(RecordError::MissingField { kind, field })
}

pub(crate) fn decimal(
    attrs: &AttrString,
    kind: ContentKind,
    field: &'static str,
) -> Result<Option<f64>, RecordError> {
    attrs
        .value(field)
        .map(|value| {
            value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
                kind,
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}

pub(crate) fn text(attrs: &AttrString, field: &str) -> Option<String> {
    attrs.value(field).map(str::to_string)
}

pub(crate) fn list(attrs: &AttrString, field: &str) -> Vec<String> {
    attrs.values(field).into_iter().map(str::to_string).collect()
}

pub(crate) fn exprs(attrs: &AttrString, field: &str) -> Vec<Expr> {
    attrs.values(field).into_iter().map(Expr::from).collect()
}

pub(crate) fn features(attrs: &AttrString, field: &str) -> Result<Vec<FeatureRef>, RecordError> {
    attrs
        .values(field)
        .into_iter()
        .map(|text| FeatureRef::parse(text).map_err(RecordError::from))
        .collect()
}
