//! Issues found while building a catalog.

use rules_core::{
    ContentKind, ErrorContext, ErrorSeverity, PatchError, RecordError, RulesError, SweepError,
    TableError,
};
use serde::Serialize;

/// A problem found in the build data.
///
/// Lenient builds record issues in the [`BuildReport`]; strict builds stop at
/// the first one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error("{kind} {name:?} derives from {from:?}, which has no legacy entry")]
    MissingSource {
        kind: ContentKind,
        name: String,
        from: String,
    },

    #[error("{kind} {name:?}: patch #{index} ({patch}) matched nothing")]
    NoopPatch {
        kind: ContentKind,
        name: String,
        index: usize,
        patch: String,
    },

    #[error("{kind} {name:?}: {source}")]
    PatchFailed {
        kind: ContentKind,
        name: String,
        source: PatchError,
    },

    #[error("{kind} {name:?} is listed for removal but has no legacy entry")]
    UnknownRemoval { kind: ContentKind, name: String },

    #[error("{kind} {name:?} is defined more than once")]
    DuplicateEntry { kind: ContentKind, name: String },

    #[error("literal {kind} {name:?} shadows a legacy entry that was neither derived nor removed")]
    ShadowedLegacy { kind: ContentKind, name: String },

    #[error("ancestry {ancestry:?} offers heritage {heritage:?}, which is not defined")]
    UnknownHeritage { ancestry: String, heritage: String },

    #[error(transparent)]
    InvalidEntry(TableError),

    #[error("{kind} {name:?}: {source}")]
    InvalidRecord {
        kind: ContentKind,
        name: String,
        source: RecordError,
    },
}

impl Issue {
    /// Content kind and entry name the issue is about.
    pub fn entry(&self) -> Option<(ContentKind, &str)> {
        match self {
            Self::MissingSource { kind, name, .. }
            | Self::NoopPatch { kind, name, .. }
            | Self::PatchFailed { kind, name, .. }
            | Self::UnknownRemoval { kind, name }
            | Self::DuplicateEntry { kind, name }
            | Self::ShadowedLegacy { kind, name }
            | Self::InvalidRecord { kind, name, .. } => Some((*kind, name.as_str())),
            Self::UnknownHeritage { ancestry, .. } => {
                Some((ContentKind::Ancestry, ancestry.as_str()))
            }
            Self::InvalidEntry(err) => err
                .context()
                .and_then(|ctx| Some((ctx.kind?, ctx.name.as_deref()?))),
        }
    }
}

impl RulesError for Issue {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoopPatch { .. } | Self::ShadowedLegacy { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSource { .. } => "BUILD_MISSING_SOURCE",
            Self::NoopPatch { .. } => "BUILD_NOOP_PATCH",
            Self::PatchFailed { source, .. } => source.error_code(),
            Self::UnknownRemoval { .. } => "BUILD_UNKNOWN_REMOVAL",
            Self::DuplicateEntry { .. } => "BUILD_DUPLICATE_ENTRY",
            Self::ShadowedLegacy { .. } => "BUILD_SHADOWED_LEGACY",
            Self::UnknownHeritage { .. } => "BUILD_UNKNOWN_HERITAGE",
            Self::InvalidEntry(err) => err.error_code(),
            Self::InvalidRecord { source, .. } => source.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("strict build stopped: {0}")]
    Strict(Issue),

    #[error("{context}: sweep failed: {source}")]
    Sweep {
        context: ErrorContext,
        source: SweepError,
    },
}

impl RulesError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Sweep { context, .. } => Some(context),
            Self::Strict(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Strict(issue) => issue.error_code(),
            Self::Sweep { source, .. } => source.error_code(),
        }
    }
}

/// Summary of a catalog build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Entries produced by patching a legacy entry.
    pub derived: usize,
    /// Entries written out in full.
    pub literal: usize,
    /// Legacy entries carried over unchanged.
    pub carried: usize,
    /// Legacy entries dropped.
    pub removed: usize,
    /// Entries edited by table-wide sweeps.
    pub swept: usize,
    #[serde(serialize_with = "issue_strings")]
    pub issues: Vec<Issue>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn total(&self) -> usize {
        self.derived + self.literal + self.carried
    }

    pub fn noop_patches(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, Issue::NoopPatch { .. }))
    }
}

fn issue_strings<S: serde::Serializer>(issues: &[Issue], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(issues.iter().map(ToString::to_string))
}
