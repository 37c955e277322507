//! Attribute-string parser.

use super::{AttrField, AttrItem};
use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while parsing an attribute string.
///
/// Positions are byte offsets into the parsed text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrammarError {
    #[error("field {text:?} at {position} has no '='")]
    MissingEquals { text: String, position: usize },

    #[error("invalid field name {key:?} at {position}")]
    InvalidKey { key: String, position: usize },

    #[error("field {key} has an empty value")]
    EmptyValue { key: String },

    #[error("field {key} has an unterminated quote starting at {position}")]
    UnterminatedQuote { key: String, position: usize },

    #[error("field {key} has a stray quote at {position}")]
    StrayQuote { key: String, position: usize },

    #[error("field {key} has text directly after a closing quote at {position}")]
    MissingSeparator { key: String, position: usize },

    #[error("field {key} appears more than once")]
    DuplicateField { key: String },

    #[error("invalid feature reference {text:?}")]
    InvalidFeatureRef { text: String },
}

impl RulesError for GrammarError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use GrammarError::*;
        match self {
            MissingEquals { .. } => "GRAMMAR_MISSING_EQUALS",
            InvalidKey { .. } => "GRAMMAR_INVALID_KEY",
            EmptyValue { .. } => "GRAMMAR_EMPTY_VALUE",
            UnterminatedQuote { .. } => "GRAMMAR_UNTERMINATED_QUOTE",
            StrayQuote { .. } => "GRAMMAR_STRAY_QUOTE",
            MissingSeparator { .. } => "GRAMMAR_MISSING_SEPARATOR",
            DuplicateField { .. } => "GRAMMAR_DUPLICATE_FIELD",
            InvalidFeatureRef { .. } => "GRAMMAR_INVALID_FEATURE_REF",
        }
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn at_item_end(&self) -> bool {
        self.peek().is_none_or(|c| c.is_whitespace() || c == ',')
    }
}

pub(super) fn parse_fields(text: &str) -> Result<Vec<AttrField>, GrammarError> {
    let mut cursor = Cursor::new(text);
    let mut fields: Vec<AttrField> = Vec::new();

    loop {
        cursor.skip_whitespace();
        if cursor.peek().is_none() {
            break;
        }

        let key = read_key(&mut cursor)?;
        let items = read_items(&mut cursor, &key)?;

        if fields.iter().any(|f| f.key == key) {
            return Err(GrammarError::DuplicateField { key });
        }
        fields.push(AttrField { key, items });
    }

    Ok(fields)
}

pub(super) fn parse_value(key: &str, value: &str) -> Result<Vec<AttrItem>, GrammarError> {
    let mut cursor = Cursor::new(value);
    let items = read_items(&mut cursor, key)?;
    cursor.skip_whitespace();
    match cursor.peek() {
        None => Ok(items),
        Some(_) => Err(GrammarError::MissingEquals {
            text: value[cursor.pos..].to_string(),
            position: cursor.pos,
        }),
    }
}

fn read_key(cursor: &mut Cursor<'_>) -> Result<String, GrammarError> {
    let start = cursor.pos;
    loop {
        match cursor.peek() {
            Some('=') => break,
            Some(c) if !c.is_whitespace() => {
                cursor.bump();
            }
            _ => {
                return Err(GrammarError::MissingEquals {
                    text: cursor.text[start..cursor.pos].to_string(),
                    position: start,
                });
            }
        }
    }

    let key = &cursor.text[start..cursor.pos];
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GrammarError::InvalidKey {
            key: key.to_string(),
            position: start,
        });
    }
    // consume '='
    cursor.bump();
    Ok(key.to_string())
}

fn read_items(cursor: &mut Cursor<'_>, key: &str) -> Result<Vec<AttrItem>, GrammarError> {
    let mut items = Vec::new();
    loop {
        if cursor.at_item_end() {
            return Err(GrammarError::EmptyValue {
                key: key.to_string(),
            });
        }

        let item = if cursor.peek() == Some('"') {
            read_quoted(cursor, key)?
        } else {
            read_bare(cursor, key)?
        };
        items.push(item);

        if cursor.peek() == Some(',') {
            cursor.bump();
        } else {
            return Ok(items);
        }
    }
}

fn read_quoted(cursor: &mut Cursor<'_>, key: &str) -> Result<AttrItem, GrammarError> {
    let start = cursor.pos;
    cursor.bump();
    let mut text = String::new();
    loop {
        match cursor.bump() {
            None => {
                return Err(GrammarError::UnterminatedQuote {
                    key: key.to_string(),
                    position: start,
                });
            }
            Some('\\') if cursor.peek() == Some('"') => {
                cursor.bump();
                text.push('"');
            }
            Some('"') => break,
            Some(c) => text.push(c),
        }
    }

    if !cursor.at_item_end() {
        return Err(GrammarError::MissingSeparator {
            key: key.to_string(),
            position: cursor.pos,
        });
    }
    Ok(AttrItem { text, quoted: true })
}

fn read_bare(cursor: &mut Cursor<'_>, key: &str) -> Result<AttrItem, GrammarError> {
    let start = cursor.pos;
    while !cursor.at_item_end() {
        if cursor.peek() == Some('"') {
            return Err(GrammarError::StrayQuote {
                key: key.to_string(),
                position: cursor.pos,
            });
        }
        cursor.bump();
    }
    Ok(AttrItem {
        text: cursor.text[start..cursor.pos].to_string(),
        quoted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::AttrString;

    #[test]
    fn rejects_field_without_equals() {
        let err = AttrString::parse("Traits=Elf Heritage").unwrap_err();
        assert_eq!(
            err,
            GrammarError::MissingEquals {
                text: "Heritage".to_string(),
                position: 11
            }
        );
    }

    #[test]
    fn rejects_invalid_keys_and_empty_values() {
        assert!(matches!(
            AttrString::parse("=Elf"),
            Err(GrammarError::InvalidKey { .. })
        ));
        assert!(matches!(
            AttrString::parse("Hit-Points=8"),
            Err(GrammarError::InvalidKey { .. })
        ));
        assert!(matches!(
            AttrString::parse("Traits= Level=1"),
            Err(GrammarError::EmptyValue { .. })
        ));
        assert!(matches!(
            AttrString::parse("Traits=Elf,"),
            Err(GrammarError::EmptyValue { .. })
        ));
    }

    #[test]
    fn rejects_quote_problems() {
        assert!(matches!(
            AttrString::parse(r#"Note="unterminated"#),
            Err(GrammarError::UnterminatedQuote { key, .. }) if key == "Note"
        ));
        assert!(matches!(
            AttrString::parse(r#"Note=abc"def""#),
            Err(GrammarError::StrayQuote { .. })
        ));
        assert!(matches!(
            AttrString::parse(r#"Note="abc"def"#),
            Err(GrammarError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_fields() {
        assert_eq!(
            AttrString::parse("Traits=Elf Traits=Human"),
            Err(GrammarError::DuplicateField {
                key: "Traits".to_string()
            })
        );
    }

    #[test]
    fn quoted_items_keep_sub_list_separators() {
        let attrs =
            AttrString::parse(r#"Section=combat,save Note="+1 AC; +2 vs. traps","Saves, too""#)
                .unwrap();
        assert_eq!(
            attrs.values("Note"),
            vec!["+1 AC; +2 vs. traps", "Saves, too"]
        );
        assert_eq!(attrs.values("Section"), vec!["combat", "save"]);
    }

    #[test]
    fn empty_quoted_item_is_allowed() {
        let attrs = AttrString::parse(r#"Note="""#).unwrap();
        assert_eq!(attrs.value("Note"), Some(""));
    }

    #[test]
    fn parse_value_reads_a_bare_list() {
        let items = parse_value("Selectables", r#""1:Ancient Elf:Heritage",1:Arctic_Elf"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "1:Ancient Elf:Heritage");
        assert!(parse_value("Selectables", "a b").is_err());
    }
}
