use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Closed set of content categories a ruleset registers.
///
/// The string form matches the type names the host passes to `choiceRules`
/// (`"Class Feature"`, `"Spell"`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentKind {
    Ancestry,
    #[strum(serialize = "Ancestry Feature")]
    AncestryFeature,
    Armor,
    Background,
    #[strum(serialize = "Background Feature")]
    BackgroundFeature,
    Class,
    #[strum(serialize = "Class Feature")]
    ClassFeature,
    Deity,
    Feat,
    Feature,
    Goody,
    Heritage,
    Language,
    Shield,
    Skill,
    Spell,
    Weapon,
}

impl ContentKind {
    /// Choice group the host keeps entries of this kind in.
    pub const fn group(self) -> &'static str {
        match self {
            Self::Ancestry => "ancestrys",
            Self::Armor => "armors",
            Self::Background => "backgrounds",
            Self::Class => "classs",
            Self::Deity => "deitys",
            Self::Feat => "feats",
            Self::AncestryFeature | Self::BackgroundFeature | Self::ClassFeature | Self::Feature => {
                "features"
            }
            Self::Goody => "goodys",
            Self::Heritage => "heritages",
            Self::Language => "languages",
            Self::Shield => "shields",
            Self::Skill => "skills",
            Self::Spell => "spells",
            Self::Weapon => "weapons",
        }
    }

    /// Position of this kind in bulk registration.
    ///
    /// Feat classification looks up registered ancestries, heritages, and
    /// classes, so those kinds come first.
    pub const fn registration_order(self) -> u8 {
        match self {
            Self::Language => 0,
            Self::Skill => 1,
            Self::Armor => 2,
            Self::Shield => 3,
            Self::Weapon => 4,
            Self::Deity => 5,
            Self::Ancestry => 6,
            Self::Heritage => 7,
            Self::Background => 8,
            Self::Class => 9,
            Self::AncestryFeature => 10,
            Self::BackgroundFeature => 11,
            Self::ClassFeature => 12,
            Self::Feature => 13,
            Self::Feat => 14,
            Self::Spell => 15,
            Self::Goody => 16,
        }
    }

    /// Owner field an "X Feature" record must name, if this is such a kind.
    pub const fn owner_field(self) -> Option<&'static str> {
        match self {
            Self::AncestryFeature => Some("Ancestry"),
            Self::BackgroundFeature => Some("Background"),
            Self::ClassFeature => Some("Class"),
            _ => None,
        }
    }
}
