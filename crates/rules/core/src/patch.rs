//! Typed patches for deriving one record from another.
//!
//! A derived record is written as a short list of [`Patch`]es applied to a
//! source record's attribute string. Text operations behave like a literal
//! find-and-replace (case and whitespace significant); list operations edit
//! a single field's items. Every application reports whether it changed
//! anything, so patches that silently match nothing can be flagged instead
//! of swallowed.
//!
//! Patches apply strictly in order, and each sees the output of the ones
//! before it.

use core::fmt;

use crate::attrs::{AttrItem, AttrString, GrammarError};
use crate::error::{ErrorSeverity, RulesError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("patch #{index} ({patch}) has an empty pattern")]
    EmptyPattern { index: usize, patch: String },

    #[error("patch #{index} ({patch}) needs a field")]
    FieldRequired { index: usize, patch: String },

    #[error("patch #{index} ({patch}) targets missing field {field}")]
    UnknownField {
        index: usize,
        patch: String,
        field: String,
    },

    #[error("patch #{index} ({patch}) changed nothing")]
    Noop { index: usize, patch: String },

    #[error("patch #{index} ({patch}) left unparseable text: {source}")]
    Grammar {
        index: usize,
        patch: String,
        source: GrammarError,
    },
}

impl RulesError for PatchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Noop { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPattern { .. } => "PATCH_EMPTY_PATTERN",
            Self::FieldRequired { .. } => "PATCH_FIELD_REQUIRED",
            Self::UnknownField { .. } => "PATCH_UNKNOWN_FIELD",
            Self::Noop { .. } => "PATCH_NOOP",
            Self::Grammar { .. } => "PATCH_GRAMMAR",
        }
    }
}

/// What to do when a patch matches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NoopPolicy {
    /// Accept silently.
    Allow,
    /// Accept, but report it.
    #[default]
    Warn,
    /// Fail the derivation.
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatchOp {
    /// Replace the first occurrence of `pattern`.
    Replace { pattern: String, with: String },
    /// Replace every occurrence of `pattern`.
    ReplaceAll { pattern: String, with: String },
    /// Append an item to the field's list unless already present.
    Append { item: String },
    /// Insert an item at the front of the field's list unless already present.
    Prepend { item: String },
    /// Remove every copy of an item from the field's list.
    RemoveItem { item: String },
    /// Set the field's value (`item,item` text), adding the field if needed.
    Set { value: String },
    /// Remove the field.
    Delete,
}

/// One step of a derivation.
///
/// `field: None` makes text operations act on the whole attribute string;
/// with a field they act on that field's value only. Every other operation
/// requires a field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patch {
    #[cfg_attr(feature = "serde", serde(default))]
    pub field: Option<String>,
    pub op: PatchOp,
}

impl Patch {
    pub fn replace(pattern: impl Into<String>, with: impl Into<String>) -> Self {
        Self {
            field: None,
            op: PatchOp::Replace {
                pattern: pattern.into(),
                with: with.into(),
            },
        }
    }

    pub fn replace_all(pattern: impl Into<String>, with: impl Into<String>) -> Self {
        Self {
            field: None,
            op: PatchOp::ReplaceAll {
                pattern: pattern.into(),
                with: with.into(),
            },
        }
    }

    pub fn append(field: impl Into<String>, item: impl Into<String>) -> Self {
        Self::on(field, PatchOp::Append { item: item.into() })
    }

    pub fn prepend(field: impl Into<String>, item: impl Into<String>) -> Self {
        Self::on(field, PatchOp::Prepend { item: item.into() })
    }

    pub fn remove_item(field: impl Into<String>, item: impl Into<String>) -> Self {
        Self::on(field, PatchOp::RemoveItem { item: item.into() })
    }

    pub fn set(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::on(
            field,
            PatchOp::Set {
                value: value.into(),
            },
        )
    }

    pub fn delete(field: impl Into<String>) -> Self {
        Self::on(field, PatchOp::Delete)
    }

    /// Scopes this patch to a single field.
    #[must_use]
    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn on(field: impl Into<String>, op: PatchOp) -> Self {
        Self {
            field: Some(field.into()),
            op,
        }
    }

    /// Returns true if applying this patch twice gives the same result as
    /// applying it once.
    ///
    /// `Replace` only touches the first match, so a second application can
    /// change a later occurrence. `ReplaceAll` is idempotent only when no
    /// copy of the pattern can appear in its output; see
    /// [`replacement_is_stable`].
    pub fn is_idempotent(&self) -> bool {
        match &self.op {
            PatchOp::Replace { .. } => false,
            PatchOp::ReplaceAll { pattern, with } => replacement_is_stable(pattern, with),
            PatchOp::Append { .. }
            | PatchOp::Prepend { .. }
            | PatchOp::RemoveItem { .. }
            | PatchOp::Set { .. }
            | PatchOp::Delete => true,
        }
    }

    /// Applies the patch to `text`. Returns the new text and whether anything
    /// changed.
    pub fn apply(&self, index: usize, text: &str) -> Result<(String, bool), PatchError> {
        match (&self.field, &self.op) {
            (_, PatchOp::Replace { pattern, .. } | PatchOp::ReplaceAll { pattern, .. })
                if pattern.is_empty() =>
            {
                Err(PatchError::EmptyPattern {
                    index,
                    patch: self.to_string(),
                })
            }
            (None, PatchOp::Replace { pattern, with }) => Ok(replace_text(text, pattern, with, 1)),
            (None, PatchOp::ReplaceAll { pattern, with }) => {
                Ok(replace_text(text, pattern, with, usize::MAX))
            }
            (None, _) => Err(PatchError::FieldRequired {
                index,
                patch: self.to_string(),
            }),
            (Some(field), op) => self.apply_to_field(index, text, field, op),
        }
    }

    fn apply_to_field(
        &self,
        index: usize,
        text: &str,
        field: &str,
        op: &PatchOp,
    ) -> Result<(String, bool), PatchError> {
        let grammar = |source: GrammarError| PatchError::Grammar {
            index,
            patch: self.to_string(),
            source,
        };
        let unknown = || PatchError::UnknownField {
            index,
            patch: self.to_string(),
            field: field.to_string(),
        };

        let mut attrs = AttrString::parse(text).map_err(grammar)?;
        let changed = match op {
            PatchOp::Replace { pattern, with } | PatchOp::ReplaceAll { pattern, with } => {
                let current = attrs.field(field).ok_or_else(unknown)?.value_text();
                let limit = match op {
                    PatchOp::Replace { .. } => 1,
                    _ => usize::MAX,
                };
                let (value, changed) = replace_text(&current, pattern, with, limit);
                if changed {
                    let items = AttrString::parse_value(field, &value).map_err(grammar)?;
                    attrs.set(field, items);
                }
                changed
            }
            PatchOp::Append { item } | PatchOp::Prepend { item } => {
                let existing = attrs.field(field).ok_or_else(unknown)?;
                if existing.items().iter().any(|i| i.text() == item) {
                    false
                } else {
                    let at = match op {
                        PatchOp::Prepend { .. } => 0,
                        _ => existing.items().len(),
                    };
                    attrs.insert_item(field, at, AttrItem::new(item.as_str()))
                }
            }
            PatchOp::RemoveItem { item } => {
                if !attrs.has(field) {
                    return Err(unknown());
                }
                let removed = attrs.remove_item(field, item) > 0;
                // A field with no items would not parse back.
                if attrs.field(field).is_some_and(|f| f.items().is_empty()) {
                    attrs.remove_field(field);
                }
                removed
            }
            PatchOp::Set { value } => {
                let items = AttrString::parse_value(field, value).map_err(grammar)?;
                let unchanged = attrs.field(field).is_some_and(|f| f.items() == items);
                if !unchanged {
                    attrs.set(field, items);
                }
                !unchanged
            }
            PatchOp::Delete => attrs.remove_field(field),
        };

        if changed {
            Ok((attrs.to_string(), true))
        } else {
            Ok((text.to_string(), false))
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            PatchOp::Replace { pattern, with } => write!(f, "replace {pattern:?} -> {with:?}")?,
            PatchOp::ReplaceAll { pattern, with } => {
                write!(f, "replace all {pattern:?} -> {with:?}")?
            }
            PatchOp::Append { item } => write!(f, "append {item:?}")?,
            PatchOp::Prepend { item } => write!(f, "prepend {item:?}")?,
            PatchOp::RemoveItem { item } => write!(f, "remove {item:?}")?,
            PatchOp::Set { value } => write!(f, "set {value:?}")?,
            PatchOp::Delete => f.write_str("delete")?,
        }
        if let Some(field) = &self.field {
            write!(f, " in {field}")?;
        }
        Ok(())
    }
}

fn replace_text(text: &str, pattern: &str, with: &str, limit: usize) -> (String, bool) {
    if text.contains(pattern) {
        (text.replacen(pattern, with, limit), true)
    } else {
        (text.to_string(), false)
    }
}

/// Returns true if replacing every `pattern` with `with` can never leave a
/// new `pattern` behind, whatever the surrounding text.
///
/// A new match has to overlap an inserted `with`: it lies inside it, covers
/// it, or straddles one of its ends. An empty replacement joins its
/// neighbours (`"ab"` -> `""` turns `aabb` into `ab`), so it never counts.
pub(crate) fn replacement_is_stable(pattern: &str, with: &str) -> bool {
    if pattern.is_empty() || with.is_empty() {
        return false;
    }
    if with.contains(pattern) || pattern.contains(with) {
        return false;
    }
    // A proper suffix of one that is a proper prefix of the other.
    let straddles = |left: &str, right: &str| {
        (1..left.len().min(right.len()))
            .filter(|&n| left.is_char_boundary(left.len() - n) && right.is_char_boundary(n))
            .any(|n| left[left.len() - n..] == right[..n])
    };
    !straddles(with, pattern) && !straddles(pattern, with)
}

/// Result of applying a patch list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    /// Indices of patches that changed nothing.
    pub noops: Vec<usize>,
}

impl Patched {
    pub fn is_clean(&self) -> bool {
        self.noops.is_empty()
    }
}

/// Applies `patches` to `source` in order.
///
/// No-op patches are collected in [`Patched::noops`] unless `policy` is
/// [`NoopPolicy::Deny`], in which case the first one is returned as an error.
/// Logging is left to the caller, which knows which entry is being derived.
pub fn apply_patches(
    source: &str,
    patches: &[Patch],
    policy: NoopPolicy,
) -> Result<Patched, PatchError> {
    let mut text = source.to_string();
    let mut noops = Vec::new();

    for (index, patch) in patches.iter().enumerate() {
        let (next, changed) = patch.apply(index, &text)?;
        if !changed {
            if policy == NoopPolicy::Deny {
                return Err(PatchError::Noop {
                    index,
                    patch: patch.to_string(),
                });
            }
            noops.push(index);
        }
        text = next;
    }

    Ok(Patched { text, noops })
}
