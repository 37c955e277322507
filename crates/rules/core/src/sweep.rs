//! Table-wide post-processing sweeps.
//!
//! A sweep applies one edit to every entry of a table after it has been
//! built. A text sweep is idempotent as long as its replacement cannot
//! re-form the pattern ([`Sweep::is_idempotent`]). The armor strength
//! conversion is not: run twice it would treat modifiers as scores, so a
//! table remembers it and refuses a second run.

use crate::attrs::{AttrItem, AttrString, GrammarError};
use crate::error::{ErrorContext, ErrorSeverity, RulesError};
use crate::record::ContentKind;
use crate::table::ContentTable;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    #[error("sweep {sweep} was already applied to the {kind} table")]
    AlreadyApplied {
        sweep: &'static str,
        kind: ContentKind,
    },

    #[error("sweep {sweep} only applies to {expected} tables, not {kind}")]
    WrongKind {
        sweep: &'static str,
        expected: ContentKind,
        kind: ContentKind,
    },

    #[error("sweep {sweep} has an empty pattern")]
    EmptyPattern { sweep: &'static str },

    #[error("{context}: strength {value:?} is not a number")]
    InvalidScore { context: ErrorContext, value: String },

    #[error("{context}: {source}")]
    Grammar {
        context: ErrorContext,
        source: GrammarError,
    },
}

impl RulesError for SweepError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyApplied { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvalidScore { context, .. } | Self::Grammar { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyApplied { .. } => "SWEEP_ALREADY_APPLIED",
            Self::WrongKind { .. } => "SWEEP_WRONG_KIND",
            Self::EmptyPattern { .. } => "SWEEP_EMPTY_PATTERN",
            Self::InvalidScore { .. } => "SWEEP_INVALID_SCORE",
            Self::Grammar { .. } => "SWEEP_GRAMMAR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sweep {
    /// Replace every occurrence of `pattern` in every entry.
    ReplaceAll { pattern: String, with: String },
    /// Turn armor `Str=<score>` requirements into modifiers,
    /// `floor((score - 10) / 2)`.
    ArmorStrengthToModifier,
}

impl Sweep {
    /// Returns true if a second run over an already swept table changes
    /// nothing.
    pub fn is_idempotent(&self) -> bool {
        match self {
            Self::ReplaceAll { pattern, with } => {
                crate::patch::replacement_is_stable(pattern, with)
            }
            Self::ArmorStrengthToModifier => false,
        }
    }

    pub fn replace_all(pattern: impl Into<String>, with: impl Into<String>) -> Self {
        Self::ReplaceAll {
            pattern: pattern.into(),
            with: with.into(),
        }
    }

    pub const fn id(&self) -> &'static str {
        match self {
            Self::ReplaceAll { .. } => "replace-all",
            Self::ArmorStrengthToModifier => "armor-strength-to-modifier",
        }
    }

    /// One-shot sweeps must never run twice on the same table.
    pub const fn is_one_shot(&self) -> bool {
        matches!(self, Self::ArmorStrengthToModifier)
    }

    /// Applies the sweep, returning how many entries changed.
    pub fn apply(&self, table: &mut ContentTable) -> Result<usize, SweepError> {
        match self {
            Self::ReplaceAll { pattern, with } => {
                if pattern.is_empty() {
                    return Err(SweepError::EmptyPattern { sweep: self.id() });
                }
                let mut changed = 0;
                for (_, attrs) in table.values_mut() {
                    if attrs.contains(pattern.as_str()) {
                        *attrs = attrs.replace(pattern.as_str(), with);
                        changed += 1;
                    }
                }
                Ok(changed)
            }
            Self::ArmorStrengthToModifier => self.convert_armor_strength(table),
        }
    }

    fn convert_armor_strength(&self, table: &mut ContentTable) -> Result<usize, SweepError> {
        let kind = table.kind();
        if kind != ContentKind::Armor {
            return Err(SweepError::WrongKind {
                sweep: self.id(),
                expected: ContentKind::Armor,
                kind,
            });
        }
        if table.has_sweep(self.id()) {
            return Err(SweepError::AlreadyApplied {
                sweep: self.id(),
                kind,
            });
        }

        // Compute every replacement first so a bad entry leaves the table untouched.
        let mut updates = Vec::new();
        for (name, attrs) in table.iter() {
            let context = || ErrorContext::new().with_kind(kind).with_name(name).with_field("Str");
            let mut parsed = AttrString::parse(attrs).map_err(|source| SweepError::Grammar {
                context: context(),
                source,
            })?;
            let Some(score) = parsed.value("Str") else {
                continue;
            };
            let score: i64 = score.parse().map_err(|_| SweepError::InvalidScore {
                context: context(),
                value: score.to_string(),
            })?;
            parsed.set("Str", vec![AttrItem::new(strength_modifier(score).to_string())]);
            updates.push((name.to_string(), parsed.to_string()));
        }

        let changed = updates.len();
        for (name, attrs) in updates {
            if let Some((_, value)) = table.values_mut().find(|(entry, _)| *entry == name) {
                *value = attrs;
            }
        }
        table.mark_sweep(self.id());
        Ok(changed)
    }
}

/// Attribute modifier for an ability score.
pub const fn strength_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}
