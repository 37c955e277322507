//! Print catalog entries
//!
//! Dumps one entry or a whole table of either edition, as a field summary,
//! JSON, or the raw attribute strings.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use rules_core::{AttrString, ContentKind};

use crate::dirs::DataSource;
use crate::utils::{Edition, fields_json, load_catalog, parse_kind};

/// Print catalog entries
#[derive(Parser, Debug)]
pub struct Dump {
    /// Content kind (e.g. Ancestry, "Class Feature", spell)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    kind: ContentKind,

    /// Entry name; every entry of the kind when omitted
    #[arg(value_name = "NAME")]
    name: Option<String>,

    /// Edition to read
    #[arg(short, long, value_enum, default_value = "remaster")]
    edition: Edition,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    #[command(flatten)]
    source: DataSource,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    /// One line per field
    Summary,
    /// JSON objects with the raw string and parsed fields
    Json,
    /// `Name: attrs` lines, as stored
    Attrs,
}

impl Dump {
    pub fn execute(self) -> Result<()> {
        let factory = self.source.factory()?;
        let config = factory.load_config()?;
        let (catalog, _) = load_catalog(&factory, self.edition, &config)?;

        let entries: Vec<(&str, &str)> = match &self.name {
            Some(name) => {
                let attrs = catalog.entry(self.kind, name).with_context(|| {
                    format!("No {} named {:?} in {}", self.kind, name, catalog.edition())
                })?;
                vec![(name.as_str(), attrs)]
            }
            None => catalog
                .table(self.kind)
                .map(|table| table.iter().collect())
                .unwrap_or_default(),
        };

        match self.format {
            OutputFormat::Summary => {
                println!(
                    "{} {} {} ({} entries)",
                    style("Catalog:").bold().cyan(),
                    catalog.edition(),
                    self.kind,
                    entries.len()
                );
                println!();
                for (name, attrs) in entries {
                    print_summary(name, attrs)?;
                }
            }
            OutputFormat::Json => print_json(self.kind, &entries, self.name.is_some())?,
            OutputFormat::Attrs => {
                for (name, attrs) in entries {
                    println!("{name}: {attrs}");
                }
            }
        }

        Ok(())
    }
}

fn print_summary(name: &str, attrs: &str) -> Result<()> {
    let parsed = AttrString::parse(attrs).with_context(|| format!("Failed to parse {name}"))?;
    println!("{}", style(name).bold().yellow());
    for field in parsed.fields() {
        println!("  {}: {}", style(field.key()).cyan(), field.value_text());
    }
    println!();
    Ok(())
}

fn print_json(kind: ContentKind, entries: &[(&str, &str)], single: bool) -> Result<()> {
    let values = entries
        .iter()
        .map(|(name, attrs)| -> Result<serde_json::Value> {
            let parsed =
                AttrString::parse(attrs).with_context(|| format!("Failed to parse {name}"))?;
            Ok(serde_json::json!({
                "kind": kind.to_string(),
                "name": name,
                "attrs": attrs,
                "fields": fields_json(&parsed),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let json = match (single, values.as_slice()) {
        (true, [value]) => serde_json::to_string_pretty(value),
        _ => serde_json::to_string_pretty(&values),
    }
    .context("Failed to serialize entries to JSON")?;
    println!("{json}");
    Ok(())
}
