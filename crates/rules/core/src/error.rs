//! Common error infrastructure for rules-core.
//!
//! This module provides shared types and traits used across all error types in rules-core.
//! Concern-specific errors (e.g., `GrammarError`, `PatchError`) are defined in their
//! respective modules alongside the operations that produce them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each concern has its own error type with specific variants
//! - **Rich Context**: Errors name the content kind, entry, and field involved
//! - **Severity Classification**: Errors are categorized so loaders can decide
//!   between skipping an entry and aborting a build

use crate::record::ContentKind;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The offending entry can be skipped and loading continues
/// - **Validation**: Authored data is malformed and should be fixed at the source
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: The catalog cannot be built at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - skip the entry and keep loading.
    ///
    /// Examples: a patch that matched nothing, an unknown content type
    Recoverable,

    /// Validation error - authored data does not follow the grammar.
    ///
    /// Examples: unterminated quote, missing required field
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a one-shot sweep applied twice
    Internal,

    /// Fatal error - the catalog cannot be produced.
    ///
    /// Examples: missing legacy catalog, strict build with outstanding issues
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
///
/// Context is captured where the error is raised and names the piece of
/// content being processed, so log lines point straight at the data to fix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Content kind of the entry (if known).
    pub kind: Option<ContentKind>,

    /// Entry name within its table.
    pub name: Option<String>,

    /// Attribute field being read or patched.
    pub field: Option<String>,

    /// Optional static message providing additional context.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates an empty error context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: None,
            name: None,
            field: None,
            message: None,
        }
    }

    /// Attaches a content kind to this context (builder pattern).
    #[must_use]
    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Attaches an entry name to this context (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a field name to this context (builder pattern).
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl core::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut core::fmt::Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(" ")
            }
        };
        if let Some(kind) = self.kind {
            sep(f)?;
            write!(f, "kind={kind}")?;
        }
        if let Some(name) = &self.name {
            sep(f)?;
            write!(f, "name={name:?}")?;
        }
        if let Some(field) = &self.field {
            sep(f)?;
            write!(f, "field={field}")?;
        }
        if let Some(message) = self.message {
            sep(f)?;
            f.write_str(message)?;
        }
        Ok(())
    }
}

/// Common trait for all rules-core errors.
///
/// This trait provides a uniform interface for error classification and context
/// retrieval across all error types in the crate.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_display_lists_known_parts() {
        let ctx = ErrorContext::new()
            .with_kind(ContentKind::Feat)
            .with_name("Toughness")
            .with_field("Traits");
        assert_eq!(ctx.to_string(), "kind=Feat name=\"Toughness\" field=Traits");
        assert_eq!(ErrorContext::new().to_string(), "");
    }

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
