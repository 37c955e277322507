//! Rule registry seam.
//!
//! [`RuleRegistry`] is the surface a host rule engine exposes to a ruleset:
//! named choices grouped by category and derived rules whose formulas the
//! host evaluates later against character state. [`ChoiceRegistry`] is an
//! in-memory implementation for tools and tests.

use std::collections::BTreeMap;
use std::fmt;

/// Opaque formula handed to the host's expression evaluator,
/// e.g. `level<5?4:level<15?5:6`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Expr(String);

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn number(value: i64) -> Self {
        Self(value.to_string())
    }

    /// A string literal the evaluator yields as-is.
    pub fn literal(value: &str) -> Self {
        Self(quote(value))
    }

    /// `source == '<value>'`
    pub fn source_is(value: &str) -> Self {
        Self(format!("source == {}", quote(value)))
    }

    /// `source == '<value>' ? <then> : null`
    pub fn when_source_is(value: &str, then: impl fmt::Display) -> Self {
        Self(format!("source == {} ? {then} : null", quote(value)))
    }

    /// `source >= <level> ? 1 : null`
    pub fn from_level(level: u32) -> Self {
        Self(format!("source >= {level} ? 1 : null"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-quotes `value`, backslash-escaping quotes and backslashes so names
/// like `Champion's Reaction` stay one literal.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a rule's formula combines with other rules on the same target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleOp {
    /// `=` assign
    Set,
    /// `+` sum
    Add,
    /// `^` take the highest
    Max,
    /// `v` take the lowest
    Min,
    /// `*` multiply
    Multiply,
    /// `?` only apply the target's other rules when the formula is truthy
    Guard,
}

impl RuleOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Set => "=",
            Self::Add => "+",
            Self::Max => "^",
            Self::Min => "v",
            Self::Multiply => "*",
            Self::Guard => "?",
        }
    }
}

impl fmt::Display for RuleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A derived rule: `target` is computed from `source` via `op` and `formula`.
///
/// A missing formula passes the source value through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDef {
    pub target: String,
    pub source: String,
    pub op: RuleOp,
    pub formula: Option<Expr>,
}

impl RuleDef {
    pub fn new(
        target: impl Into<String>,
        source: impl Into<String>,
        op: RuleOp,
        formula: Option<Expr>,
    ) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
            op,
            formula,
        }
    }
}

impl fmt::Display for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.target, self.op, self.source)?;
        if let Some(formula) = &self.formula {
            write!(f, " [{formula}]")?;
        }
        Ok(())
    }
}

/// Host-side registry that content is registered into.
pub trait RuleRegistry {
    /// Adds (or replaces) `name` in choice group `group`.
    fn define_choice(&mut self, group: &str, name: &str, attrs: &str);

    fn define_rule(&mut self, rule: RuleDef);

    fn has_choice(&self, group: &str, name: &str) -> bool;

    /// Names registered in `group`, in sorted order.
    fn choice_names(&self, group: &str) -> Vec<String>;
}

/// In-memory [`RuleRegistry`].
#[derive(Clone, Debug, Default)]
pub struct ChoiceRegistry {
    choices: BTreeMap<String, BTreeMap<String, String>>,
    rules: Vec<RuleDef>,
}

impl ChoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of a choice group (name → attrs).
    pub fn choices(&self, group: &str) -> Option<&BTreeMap<String, String>> {
        self.choices.get(group)
    }

    pub fn choice(&self, group: &str, name: &str) -> Option<&str> {
        self.choices
            .get(group)
            .and_then(|entries| entries.get(name))
            .map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.choices
            .iter()
            .map(|(group, entries)| (group.as_str(), entries.len()))
    }

    pub fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    /// Rules that compute `target`.
    pub fn rules_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a RuleDef> + 'a {
        self.rules.iter().filter(move |rule| rule.target == target)
    }

    pub fn choice_count(&self) -> usize {
        self.choices.values().map(BTreeMap::len).sum()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.rules.is_empty()
    }
}

impl RuleRegistry for ChoiceRegistry {
    fn define_choice(&mut self, group: &str, name: &str, attrs: &str) {
        self.choices
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), attrs.to_string());
    }

    fn define_rule(&mut self, rule: RuleDef) {
        self.rules.push(rule);
    }

    fn has_choice(&self, group: &str, name: &str) -> bool {
        self.choice(group, name).is_some()
    }

    fn choice_names(&self, group: &str) -> Vec<String> {
        self.choices
            .get(group)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}
