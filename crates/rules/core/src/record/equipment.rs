//! Equipment records and magic-item bonus patterns.

use super::{ContentKind, FromAttrs, RecordError, decimal, int, list, required, required_int, text};
use crate::attrs::AttrString;

#[derive(Clone, Debug, PartialEq)]
pub struct ArmorRecord {
    pub category: String,
    pub price: Option<f64>,
    pub ac_bonus: i64,
    pub dex_cap: Option<i64>,
    /// Strength requirement; a score in legacy data, a modifier after the
    /// armor strength sweep.
    pub strength: Option<i64>,
    pub check_penalty: Option<i64>,
    pub speed_penalty: Option<i64>,
    pub bulk: Option<String>,
    pub group: Option<String>,
    pub traits: Vec<String>,
}

impl FromAttrs for ArmorRecord {
    const KIND: ContentKind = ContentKind::Armor;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            category: required(attrs, Self::KIND, "Category")?.to_string(),
            price: decimal(attrs, Self::KIND, "Price")?,
            ac_bonus: required_int(attrs, Self::KIND, "AC")?,
            dex_cap: int(attrs, Self::KIND, "Dex")?,
            strength: int(attrs, Self::KIND, "Str")?,
            check_penalty: int(attrs, Self::KIND, "Check")?,
            speed_penalty: int(attrs, Self::KIND, "Speed")?,
            bulk: text(attrs, "Bulk"),
            group: text(attrs, "Group"),
            traits: list(attrs, "Traits"),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShieldRecord {
    pub price: Option<f64>,
    pub ac_bonus: i64,
    pub hardness: i64,
    pub hit_points: i64,
    pub speed_penalty: Option<i64>,
    pub bulk: Option<String>,
    pub traits: Vec<String>,
}

impl FromAttrs for ShieldRecord {
    const KIND: ContentKind = ContentKind::Shield;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            price: decimal(attrs, Self::KIND, "Price")?,
            ac_bonus: required_int(attrs, Self::KIND, "AC")?,
            hardness: required_int(attrs, Self::KIND, "Hardness")?,
            hit_points: required_int(attrs, Self::KIND, "HP")?,
            speed_penalty: int(attrs, Self::KIND, "Speed")?,
            bulk: text(attrs, "Bulk"),
            traits: list(attrs, "Traits"),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponRecord {
    /// Unarmed, Simple, Martial, or Advanced.
    pub category: String,
    pub price: Option<f64>,
    /// Damage expression such as `1d8 S`.
    pub damage: String,
    pub bulk: Option<String>,
    pub hands: Option<i64>,
    pub group: Option<String>,
    pub range: Option<i64>,
    pub traits: Vec<String>,
}

impl WeaponRecord {
    pub fn is_advanced(&self) -> bool {
        self.category == "Advanced"
    }
}

impl FromAttrs for WeaponRecord {
    const KIND: ContentKind = ContentKind::Weapon;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        Ok(Self {
            category: required(attrs, Self::KIND, "Category")?.to_string(),
            price: decimal(attrs, Self::KIND, "Price")?,
            damage: required(attrs, Self::KIND, "Damage")?.to_string(),
            bulk: text(attrs, "Bulk"),
            hands: int(attrs, Self::KIND, "Hands")?,
            group: text(attrs, "Group"),
            range: int(attrs, Self::KIND, "Range")?,
            traits: list(attrs, "Traits"),
        })
    }
}

/// How a goody's captured value combines with its target attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoodyEffect {
    Add,
    Lower,
    Raise,
    Set,
}

impl GoodyEffect {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(Self::Add),
            "lower" => Some(Self::Lower),
            "raise" => Some(Self::Raise),
            "set" => Some(Self::Set),
            _ => None,
        }
    }
}

/// A pattern matched against free-text character notes that grants a bonus
/// (typically magic item bonuses such as `+1 armor`).
#[derive(Clone, Debug, PartialEq)]
pub struct GoodyRecord {
    pub pattern: String,
    pub effect: GoodyEffect,
    pub value: String,
    pub attributes: Vec<String>,
    pub section: Option<String>,
    pub note: Option<String>,
}

impl FromAttrs for GoodyRecord {
    const KIND: ContentKind = ContentKind::Goody;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        let effect = required(attrs, Self::KIND, "Effect")?;
        let effect = GoodyEffect::parse(effect).ok_or_else(|| RecordError::InvalidValue {
            kind: Self::KIND,
            field: "Effect",
            value: effect.to_string(),
        })?;

        let attributes = list(attrs, "Attribute");
        if attributes.is_empty() {
            return Err(RecordError::MissingField {
                kind: Self::KIND,
                field: "Attribute",
            });
        }

        Ok(Self {
            pattern: required(attrs, Self::KIND, "Pattern")?.to_string(),
            effect,
            value: required(attrs, Self::KIND, "Value")?.to_string(),
            attributes,
            section: text(attrs, "Section"),
            note: text(attrs, "Note"),
        })
    }
}
