//! Utility functions for xtask commands

use anyhow::{Context, Result};
use std::str::FromStr;
use strum::IntoEnumIterator;

use rules_content::{BuildConfig, BuildReport, ContentFactory};
use rules_core::{AttrString, Catalog, ContentKind};

/// Ruleset edition selected on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Edition {
    /// Pathfinder 2E as originally published
    Legacy,
    /// Pathfinder 2E Remaster, built from the legacy catalog
    Remaster,
}

/// Loads the catalog for `edition`.
///
/// The Remaster build report is returned alongside its catalog.
pub fn load_catalog(
    factory: &ContentFactory,
    edition: Edition,
    config: &BuildConfig,
) -> Result<(Catalog, Option<BuildReport>)> {
    match edition {
        Edition::Legacy => Ok((factory.load_legacy()?, None)),
        Edition::Remaster => {
            let (catalog, report) = factory
                .build_remaster(config)
                .context("Failed to build the Remaster catalog")?;
            Ok((catalog, Some(report)))
        }
    }
}

/// Parses a content kind, ignoring case, spaces, and dashes
/// (`"Class Feature"`, `classfeature`, and `class-feature` all match).
pub fn parse_kind(text: &str) -> Result<ContentKind, String> {
    if let Ok(kind) = ContentKind::from_str(text) {
        return Ok(kind);
    }

    let wanted = squash(text);
    ContentKind::iter()
        .find(|kind| squash(&kind.to_string()) == wanted)
        .ok_or_else(|| {
            let known: Vec<String> = ContentKind::iter().map(|k| k.to_string()).collect();
            format!("unknown content kind {text:?} (known: {})", known.join(", "))
        })
}

fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Attribute fields as a JSON object of item lists.
pub fn fields_json(attrs: &AttrString) -> serde_json::Value {
    let fields = attrs
        .fields()
        .iter()
        .map(|field| {
            let items = field
                .items()
                .iter()
                .map(|item| serde_json::Value::from(item.text()))
                .collect();
            (field.key().to_string(), serde_json::Value::Array(items))
        })
        .collect();
    serde_json::Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_loosely() {
        assert_eq!(parse_kind("Class Feature"), Ok(ContentKind::ClassFeature));
        assert_eq!(parse_kind("classfeature"), Ok(ContentKind::ClassFeature));
        assert_eq!(parse_kind("class-feature"), Ok(ContentKind::ClassFeature));
        assert_eq!(parse_kind("spell"), Ok(ContentKind::Spell));
        assert!(parse_kind("Vehicle").unwrap_err().contains("Heritage"));
    }

    #[test]
    fn fields_become_item_lists() {
        let attrs = AttrString::parse(r#"Level=1 Traits=Fire,Force Note="Deals 6d6 HP""#).unwrap();
        let json = fields_json(&attrs);
        assert_eq!(json["Level"][0], "1");
        assert_eq!(json["Traits"][1], "Force");
        assert_eq!(json["Note"][0], "Deals 6d6 HP");
    }
}
