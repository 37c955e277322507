use super::Recorder;
use crate::record::{ContentKind, FeatRecord};
use crate::registry::{RuleDef, RuleOp, RuleRegistry};

/// Secondary list a feat is offered in, besides `feats`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatBucket {
    Class,
    Ancestry,
    General,
}

impl FeatBucket {
    pub const fn group(self) -> &'static str {
        match self {
            Self::Class => "classFeats",
            Self::Ancestry => "ancestryFeats",
            Self::General => "generalFeats",
        }
    }
}

/// Picks the one bucket a feat belongs to from its traits.
///
/// Archetype feats and feats carrying a registered class's name are class
/// feats; a registered ancestry or heritage name makes an ancestry feat.
/// Classification reads the registry, so classes, ancestries, and heritages
/// must be registered before feats.
pub fn classify_feat<R: RuleRegistry + ?Sized>(registry: &R, feat: &FeatRecord) -> FeatBucket {
    let registered = |kind: ContentKind| {
        feat.traits
            .iter()
            .any(|name| registry.has_choice(kind.group(), name))
    };

    if feat.has_trait("Archetype") || registered(ContentKind::Class) {
        FeatBucket::Class
    } else if registered(ContentKind::Ancestry) || registered(ContentKind::Heritage) {
        FeatBucket::Ancestry
    } else {
        FeatBucket::General
    }
}

pub(crate) fn feat_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &FeatRecord,
    attrs: &str,
) {
    let bucket = classify_feat(rec.registry(), record);
    rec.choice(ContentKind::Feat.group(), name, attrs);
    rec.choice(bucket.group(), name, attrs);
    rec.rule(RuleDef::new(
        format!("features.{name}"),
        format!("feats.{name}"),
        RuleOp::Set,
        None,
    ));
}
