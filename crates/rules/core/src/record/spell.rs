use super::{ContentKind, FromAttrs, RecordError, list, required, required_int, text};
use crate::attrs::AttrString;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellRecord {
    pub level: i64,
    pub traits: Vec<String>,
    pub traditions: Vec<String>,
    /// Casting time: action count, `Reaction`, `Free`, or a duration.
    pub cast: Option<String>,
    pub description: String,
}

impl SpellRecord {
    pub fn is_cantrip(&self) -> bool {
        self.traits.iter().any(|t| t == "Cantrip")
    }

    pub fn is_focus(&self) -> bool {
        self.traits.iter().any(|t| t == "Focus")
    }

    /// Focus spells that are not cantrips are tracked only through the
    /// feature or class that grants them, never in the general spell list.
    pub fn is_listed(&self) -> bool {
        !self.is_focus() || self.is_cantrip()
    }

    /// Tradition-qualified name, e.g. `Fireball (A3)` or `Shield (AC1)`.
    pub fn variant_name(&self, name: &str, tradition: &str) -> String {
        let initial = tradition.chars().next().map(|c| c.to_ascii_uppercase());
        let cantrip = if self.is_cantrip() { "C" } else { "" };
        match initial {
            Some(initial) => format!("{name} ({initial}{cantrip}{})", self.level),
            None => format!("{name} ({cantrip}{})", self.level),
        }
    }
}

impl FromAttrs for SpellRecord {
    const KIND: ContentKind = ContentKind::Spell;

    fn from_attrs(attrs: &AttrString) -> Result<Self, RecordError> {
        let record = Self {
            level: required_int(attrs, Self::KIND, "Level")?,
            traits: list(attrs, "Traits"),
            traditions: list(attrs, "Traditions"),
            cast: text(attrs, "Cast"),
            description: required(attrs, Self::KIND, "Description")?.to_string(),
        };

        // Only focus spells may omit traditions; they are granted directly.
        if record.traditions.is_empty() && !record.is_focus() {
            return Err(RecordError::MissingField {
                kind: Self::KIND,
                field: "Traditions",
            });
        }
        Ok(record)
    }
}
