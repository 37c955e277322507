//! Compare a legacy entry with its Remaster counterpart
//!
//! Shows where the Remaster entry came from (derived, literal, carried, or
//! removed), the patches a derivation applies, and a field-by-field diff of
//! the two attribute strings after sweeps.

use anyhow::Result;
use clap::Parser;
use console::style;

use rules_core::{AttrString, ContentKind};

use crate::dirs::DataSource;
use crate::utils::parse_kind;

/// Compare a legacy entry with its Remaster counterpart
#[derive(Parser, Debug)]
pub struct Diff {
    /// Content kind (e.g. Ancestry, "Class Feature", spell)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    kind: ContentKind,

    /// Remaster entry name (or legacy name, for removed entries)
    #[arg(value_name = "NAME")]
    name: String,

    #[command(flatten)]
    source: DataSource,
}

impl Diff {
    pub fn execute(self) -> Result<()> {
        let factory = self.source.factory()?;
        let config = factory.load_config()?;
        let legacy = factory.load_legacy()?;
        let data = factory.load_remaster_data()?;
        let (remaster, _) = factory.build_remaster(&config)?;

        let kind = self.kind;
        let name = self.name.as_str();
        let derivation = data
            .derivations
            .iter()
            .find(|d| d.kind == kind && d.name == name);
        let legacy_name = derivation.map_or(name, |d| d.source_name());

        let before = legacy.entry(kind, legacy_name);
        let after = remaster.entry(kind, name);
        if before.is_none() && after.is_none() {
            anyhow::bail!("No {kind} named {name:?} in either edition");
        }

        println!("{} {} {}", style("Entry:").bold().cyan(), kind, style(name).bold());
        let origin = if let Some(derivation) = derivation {
            format!(
                "derived from {:?} ({} patches)",
                derivation.source_name(),
                derivation.patches.len()
            )
        } else if data
            .literals
            .iter()
            .any(|table| table.kind() == kind && table.contains(name))
        {
            "literal".to_string()
        } else if after.is_none() {
            "removed".to_string()
        } else {
            "carried over".to_string()
        };
        println!("{} {}", style("Origin:").bold().cyan(), origin);

        if let Some(derivation) = derivation {
            println!();
            println!("{}", style("Patches:").bold().yellow());
            for (index, patch) in derivation.patches.iter().enumerate() {
                println!("  {index}. {patch}");
            }
        }

        println!();
        println!("{}", style("Fields:").bold().yellow());
        let before = before.map(AttrString::parse).transpose()?.unwrap_or_default();
        let after = after.map(AttrString::parse).transpose()?.unwrap_or_default();
        print_field_diff(&before, &after);

        Ok(())
    }
}

/// Prints every field of `before` then the fields only `after` has.
fn print_field_diff(before: &AttrString, after: &AttrString) {
    for field in before.fields() {
        match after.field(field.key()) {
            Some(new) if new == field => println!("  {}", style(field).dim()),
            Some(new) => {
                println!("{}", style(format!("- {field}")).red());
                println!("{}", style(format!("+ {new}")).green());
            }
            None => println!("{}", style(format!("- {field}")).red()),
        }
    }
    for field in after.fields() {
        if !before.has(field.key()) {
            println!("{}", style(format!("+ {field}")).green());
        }
    }
}
