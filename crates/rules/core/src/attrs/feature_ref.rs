use core::fmt;

use super::GrammarError;

/// A feature grant as written in `Features=` and `Selectables=` lists.
///
/// The textual form is `level:Name[:Tag]`, e.g. `1:Ancient Elf:Heritage`.
/// The level may be omitted, in which case the feature is granted at level 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureRef {
    pub level: u32,
    pub name: String,
    /// Category tag used to group selectable features (e.g. `Heritage`).
    pub tag: Option<String>,
}

impl FeatureRef {
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let invalid = || GrammarError::InvalidFeatureRef {
            text: text.to_string(),
        };

        let mut parts = text.splitn(3, ':');
        let first = parts.next().ok_or_else(invalid)?.trim();

        let (level, name, tag) = match first.parse::<u32>() {
            Ok(level) => {
                let name = parts.next().ok_or_else(invalid)?.trim();
                (level, name, parts.next())
            }
            // No level prefix: the remainder (if any) is the tag.
            Err(_) => {
                let tag = text.split_once(':').map(|(_, tag)| tag);
                (1, first, tag)
            }
        };

        if name.is_empty() || level == 0 {
            return Err(invalid());
        }
        let tag = match tag.map(str::trim) {
            Some("") => return Err(invalid()),
            other => other.map(str::to_string),
        };

        Ok(Self {
            level,
            name: name.to_string(),
            tag,
        })
    }
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        Ok(())
    }
}
