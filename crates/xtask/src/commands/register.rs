//! Register a whole catalog
//!
//! Runs every entry of one edition through `choiceRules` into an in-memory
//! registry and summarizes the choices and rules it defined.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use rules_content::{LegacyRuleset, RemasterRuleset, Ruleset, Strictness};
use rules_core::ChoiceRegistry;

use crate::dirs::DataSource;
use crate::utils::Edition;

/// Register a whole catalog and summarize the result
#[derive(Parser, Debug)]
pub struct Register {
    /// Edition to register
    #[arg(short, long, value_enum, default_value = "remaster")]
    edition: Edition,

    /// List the choices defined in one group (e.g. ancestryFeats)
    #[arg(short, long, value_name = "GROUP")]
    group: Option<String>,

    /// Print every rule defined
    #[arg(long)]
    rules: bool,

    /// Fail if any entry cannot be registered
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    source: DataSource,
}

impl Register {
    pub fn execute(self) -> Result<()> {
        let factory = self.source.factory()?;
        let mut registry = ChoiceRegistry::new();

        let summary = match self.edition {
            Edition::Legacy => {
                let ruleset = LegacyRuleset::from_catalog(factory.load_legacy()?);
                ruleset.register_all(&mut registry)?
            }
            Edition::Remaster => {
                let mut config = factory.load_config()?;
                if self.strict {
                    config.strictness = Strictness::Strict;
                }
                let ruleset = RemasterRuleset::from_factory(&factory, config)?;
                ruleset.register_all(&mut registry)?
            }
        };

        println!("{} {:?}", style("Edition:").bold().cyan(), self.edition);
        println!("{} {}", style("Entries:").bold().cyan(), summary.entries);
        println!("{} {}", style("Choices:").bold().cyan(), summary.choices);
        println!("{} {}", style("Rules:").bold().cyan(), summary.rules);
        println!();

        println!("{}", style("Groups:").bold().yellow());
        for (group, count) in registry.groups() {
            println!("  {group:<20} {count}");
        }
        println!();

        if let Some(group) = &self.group {
            let choices = registry
                .choices(group)
                .with_context(|| format!("No choices registered in group {group:?}"))?;
            println!("{}", style(format!("{group}:")).bold().yellow());
            for name in choices.keys() {
                println!("  {name}");
            }
            println!();
        }

        if self.rules {
            println!("{}", style("Rules:").bold().yellow());
            for rule in registry.rules() {
                println!("  {rule}");
            }
            println!();
        }

        if !summary.skipped.is_empty() {
            println!("{}", style("Skipped:").bold().red());
            for err in &summary.skipped {
                println!("  {} {}", style("✗").red().bold(), err);
            }
            if self.strict {
                anyhow::bail!("{} entries failed to register", summary.skipped.len());
            }
        }

        Ok(())
    }
}
