//! Records describing who a character is: ancestry, class, feats, features.

use super::{
    ContentKind, FromAttrs, RecordError, exprs, features, int, list, required, required_int, text,
};
use crate::attrs::{AttrString, FeatureRef};
use crate::registry::Expr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestryRecord {
    pub hit_points: i64,
    pub size: Option<String>,
    pub speed: Option<i64>,
    pub features: Vec<FeatureRef>,
    pub selectables: Vec<FeatureRef>,
    pub languages: Vec<String>,
    pub traits: Vec<String>,
}

impl FromAttrs for AncestryRecord {
    const KIND: ContentKind = ContentKind::Ancestry;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            hit_points: required_int(attrs, Self::KIND, "HitPoints")?,
            size: text(attrs, "Size"),
            speed: int(attrs, Self::KIND, "Speed")?,
            features: features(attrs, "Features")?,
            selectables: features(attrs, "Selectables")?,
            languages: list(attrs, "Languages"),
            traits: list(attrs, "Traits"),
        })
    }
}

/// A heritage, either tied to one ancestry or versatile across several.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeritageRecord {
    pub traits: Vec<String>,
    pub features: Vec<FeatureRef>,
}

impl FromAttrs for HeritageRecord {
    const KIND: ContentKind = ContentKind::Heritage;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            traits: list(attrs, "Traits"),
            features: features(attrs, "Features")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundRecord {
    pub features: Vec<FeatureRef>,
    pub selectables: Vec<FeatureRef>,
    pub traits: Vec<String>,
}

impl FromAttrs for BackgroundRecord {
    const KIND: ContentKind = ContentKind::Background;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            features: features(attrs, "Features")?,
            selectables: features(attrs, "Selectables")?,
            traits: list(attrs, "Traits"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    pub hit_points: i64,
    /// Key attribute options. Legacy records spell the field `Ability`.
    pub key_attributes: Vec<String>,
    pub features: Vec<FeatureRef>,
    pub selectables: Vec<FeatureRef>,
    pub traits: Vec<String>,
}

impl FromAttrs for ClassRecord {
    const KIND: ContentKind = ContentKind::Class;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        let key_attributes = match attrs.has("Attribute") {
            true => list(attrs, "Attribute"),
            false => list(attrs, "Ability"),
        };
        if key_attributes.is_empty() {
            return Err(RecordError::MissingField {
                kind: Self::KIND,
                field: "Attribute",
            });
        }

        Ok(Self {
            hit_points: required_int(attrs, Self::KIND, "HitPoints")?,
            key_attributes,
            features: features(attrs, "Features")?,
            selectables: features(attrs, "Selectables")?,
            traits: list(attrs, "Traits"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeityRecord {
    pub alignment: Option<String>,
    pub follower_alignments: Vec<String>,
    pub sanctification: Vec<String>,
    pub font: Vec<String>,
    pub domains: Vec<String>,
    pub skill: Option<String>,
    pub weapon: Option<String>,
    pub spells: Vec<String>,
}

impl FromAttrs for DeityRecord {
    const KIND: ContentKind = ContentKind::Deity;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            alignment: text(attrs, "Alignment"),
            follower_alignments: list(attrs, "FollowerAlignments"),
            sanctification: list(attrs, "Sanctification"),
            font: list(attrs, "Font"),
            domains: list(attrs, "Domain"),
            skill: text(attrs, "Skill"),
            weapon: text(attrs, "Weapon"),
            spells: list(attrs, "Spells"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageRecord {
    pub traits: Vec<String>,
}

impl FromAttrs for LanguageRecord {
    const KIND: ContentKind = ContentKind::Language;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            traits: list(attrs, "Traits"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillRecord {
    /// Governing attribute. Legacy records spell the field `Ability`.
    pub attribute: String,
    pub subcategory: Option<String>,
}

impl FromAttrs for SkillRecord {
    const KIND: ContentKind = ContentKind::Skill;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        let attribute = attrs
            .value("Attribute")
            .or_else(|| attrs.value("Ability"))
            .ok_or(RecordError::MissingField {
                kind: Self::KIND,
                field: "Attribute",
            })?;

        Ok(Self {
            attribute: attribute.to_string(),
            subcategory: text(attrs, "Subcategory"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatRecord {
    pub traits: Vec<String>,
    pub require: Vec<Expr>,
    pub imply: Vec<Expr>,
    pub level: Option<i64>,
}

impl FeatRecord {
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t == name)
    }
}

impl FromAttrs for FeatRecord {
    const KIND: ContentKind = ContentKind::Feat;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        required(attrs, Self::KIND, "Traits")?;
        Ok(Self {
            traits: list(attrs, "Traits"),
            require: exprs(attrs, "Require"),
            imply: exprs(attrs, "Imply"),
            level: int(attrs, Self::KIND, "Level")?,
        })
    }
}

/// A feature and the notes it contributes, one note per section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureRecord {
    pub sections: Vec<String>,
    pub notes: Vec<String>,
    pub action: Option<String>,
    /// Owning ancestry, background, or class for "X Feature" kinds.
    pub owner: Option<String>,
}

impl FeatureRecord {
    /// Parses a feature of a specific kind, requiring the owner field for
    /// "X Feature" kinds.
    pub fn from_attrs_as(kind: ContentKind, attrs: &AttrString) -> Result<Self, RecordError> {
        let owner = match kind.owner_field() {
            Some(field) => Some(required(attrs, kind, field)?.to_string()),
            None => None,
        };

        let sections = list(attrs, "Section");
        let notes = list(attrs, "Note");
        if sections.len() != notes.len() {
            return Err(RecordError::MismatchedNotes {
                kind,
                sections: sections.len(),
                notes: notes.len(),
            });
        }

        Ok(Self {
            sections,
            notes,
            action: text(attrs, "Action"),
            owner,
        })
    }

    /// Section/note pairs in declaration order.
    pub fn section_notes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .map(String::as_str)
            .zip(self.notes.iter().map(String::as_str))
    }
}

impl FromAttrs for FeatureRecord {
    const KIND: ContentKind = ContentKind::Feature;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Self::from_attrs_as(Self::KIND, attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AttrString {
        AttrString::parse(text).unwrap()
    }

    #[test]
    fn ancestry_reads_feature_lists() {
        let record = AncestryRecord::from_attrs(&parse(
            r#"HitPoints=6 Size=Medium Speed=30 Features="1:Attribute Boosts","1:Low-Light Vision" Selectables="1:Arctic Elf:Heritage" Languages=Common,Elven Traits=Elf,Humanoid"#,
        ))
        .unwrap();

        assert_eq!(record.hit_points, 6);
        assert_eq!(record.speed, Some(30));
        assert_eq!(record.features.len(), 2);
        assert_eq!(record.features[1].name, "Low-Light Vision");
        assert_eq!(record.selectables[0].tag.as_deref(), Some("Heritage"));
        assert_eq!(record.languages, vec!["Common", "Elven"]);
    }

    #[test]
    fn ancestry_requires_hit_points() {
        assert_eq!(
            AncestryRecord::from_attrs(&parse("Size=Small")),
            Err(RecordError::MissingField {
                kind: ContentKind::Ancestry,
                field: "HitPoints"
            })
        );
    }

    #[test]
    fn class_accepts_legacy_ability_field() {
        let legacy = ClassRecord::from_attrs(&parse("HitPoints=12 Ability=strength")).unwrap();
        let remaster = ClassRecord::from_attrs(&parse("HitPoints=12 Attribute=strength")).unwrap();
        assert_eq!(legacy.key_attributes, remaster.key_attributes);
        assert!(ClassRecord::from_attrs(&parse("HitPoints=12")).is_err());
    }

    #[test]
    fn feature_notes_must_pair_with_sections() {
        let err = FeatureRecord::from_attrs(&parse(r#"Section=combat,save Note="+1 AC""#))
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::MismatchedNotes {
                kind: ContentKind::Feature,
                sections: 2,
                notes: 1
            }
        );

        let record = FeatureRecord::from_attrs_as(
            ContentKind::ClassFeature,
            &parse(r#"Class=Fighter Section=combat Note="Attack of Opportunity""#),
        )
        .unwrap();
        assert_eq!(record.owner.as_deref(), Some("Fighter"));
        assert_eq!(
            record.section_notes().collect::<Vec<_>>(),
            vec![("combat", "Attack of Opportunity")]
        );
    }

    #[test]
    fn feat_requires_traits() {
        let feat = FeatRecord::from_attrs(&parse(
            r#"Traits=Dwarf Require="level >= 5","features.Rock Runner""#,
        ))
        .unwrap();
        assert!(feat.has_trait("Dwarf"));
        assert_eq!(feat.require.len(), 2);
        assert_eq!(feat.require[0].as_str(), "level >= 5");
        assert!(FeatRecord::from_attrs(&parse("Level=1")).is_err());
    }
}
