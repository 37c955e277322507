//! Attribute-string grammar.
//!
//! Every content record is written as a whitespace-separated list of
//! `Key=value` fields. A value is a comma-separated list of items, and an item
//! is either a bare token or a double-quoted string:
//!
//! ```text
//! Traits=Archetype,Dedication Require="level >= 2","features.Fighter"
//! ```
//!
//! Inside quoted items `\"` escapes a quote; `,` and `;` are literal and
//! carry sub-list meaning for whoever consumes the field. Keys are
//! case-sensitive.
//!
//! [`AttrString`] keeps track of which items were quoted so a parsed record
//! renders back to the same text.

mod feature_ref;
mod parse;

pub use feature_ref::FeatureRef;
pub use parse::GrammarError;

use core::fmt;

/// One item of a field's value list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrItem {
    text: String,
    quoted: bool,
}

impl AttrItem {
    /// Creates an item, quoting it only if the text requires quotes.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let quoted = needs_quotes(&text);
        Self { text, quoted }
    }

    /// Creates an item that always renders quoted.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    /// Unquoted, unescaped text of the item.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }
}

impl fmt::Display for AttrItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted || needs_quotes(&self.text) {
            write!(f, "\"{}\"", self.text.replace('"', "\\\""))
        } else {
            f.write_str(&self.text)
        }
    }
}

/// A single `Key=item,item` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrField {
    key: String,
    items: Vec<AttrItem>,
}

impl AttrField {
    pub fn new(key: impl Into<String>, items: Vec<AttrItem>) -> Self {
        Self {
            key: key.into(),
            items,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[AttrItem] {
        &self.items
    }

    /// Renders only the value part (`item,item`) of the field.
    pub fn value_text(&self) -> String {
        let mut out = String::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&item.to_string());
        }
        out
    }
}

impl fmt::Display for AttrField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value_text())
    }
}

/// A parsed attribute string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrString {
    fields: Vec<AttrField>,
}

impl AttrString {
    /// Parses `text` according to the attribute-string grammar.
    ///
    /// An empty (or all-whitespace) string is a valid record with no fields.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        parse::parse_fields(text).map(|fields| Self { fields })
    }

    /// Parses a bare value list (`item,item`) as it would appear after `key=`.
    pub fn parse_value(key: &str, value: &str) -> Result<Vec<AttrItem>, GrammarError> {
        parse::parse_value(key, value)
    }

    pub fn fields(&self) -> &[AttrField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&AttrField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// First item of `key`, unquoted.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(|f| f.items.first())
            .map(AttrItem::text)
    }

    /// First item of `key` as an integer; `None` when absent or not a number.
    pub fn number(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(|v| v.parse().ok())
    }

    /// All items of `key`, unquoted. Empty when the field is absent.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.field(key)
            .map(|f| f.items.iter().map(AttrItem::text).collect())
            .unwrap_or_default()
    }

    /// Returns true if `key` lists `item` among its values.
    pub fn contains(&self, key: &str, item: &str) -> bool {
        self.field(key)
            .is_some_and(|f| f.items.iter().any(|i| i.text == item))
    }

    /// Replaces the items of `key`, appending the field if it does not exist.
    pub fn set(&mut self, key: &str, items: Vec<AttrItem>) {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => field.items = items,
            None => self.fields.push(AttrField::new(key, items)),
        }
    }

    /// Removes `key`. Returns false if the field was not present.
    pub fn remove_field(&mut self, key: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.key != key);
        self.fields.len() != before
    }

    /// Appends `item` to an existing field. Returns false if `key` is absent.
    pub fn push_item(&mut self, key: &str, item: AttrItem) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                field.items.push(item);
                true
            }
            None => false,
        }
    }

    /// Inserts `item` at `index` of an existing field. Returns false if `key` is absent.
    pub fn insert_item(&mut self, key: &str, index: usize, item: AttrItem) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                let index = index.min(field.items.len());
                field.items.insert(index, item);
                true
            }
            None => false,
        }
    }

    /// Removes every item equal to `text` from `key`, returning how many went.
    pub fn remove_item(&mut self, key: &str, text: &str) -> usize {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                let before = field.items.len();
                field.items.retain(|i| i.text != text);
                before - field.items.len()
            }
            None => 0,
        }
    }
}

impl fmt::Display for AttrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl core::str::FromStr for AttrString {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty() || text.chars().any(|c| c.is_whitespace() || c == ',' || c == '"')
}
