//! Lint the content data
//!
//! Loads the legacy catalog, builds the Remaster catalog from it, and checks
//! that every entry in both parses into a typed record. Build issues (missing
//! derivation sources, patches that match nothing, ...) are listed from the
//! build report as warnings; with `--strict` the first one fails the build.

use anyhow::Result;
use clap::Parser;
use console::style;

use rules_content::Strictness;
use rules_core::{AttrString, Catalog, Record};

use crate::dirs::DataSource;

/// Build both catalogs and report every problem found
#[derive(Parser, Debug)]
pub struct Lint {
    /// Fail on the first build issue instead of collecting them
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    source: DataSource,
}

impl Lint {
    pub fn execute(self) -> Result<()> {
        let factory = self.source.factory()?;
        let mut config = factory.load_config()?;
        if self.strict {
            config.strictness = Strictness::Strict;
        }

        println!("{} {}", style("Data:").bold().cyan(), self.source.describe());
        println!();

        let legacy = factory.load_legacy()?;
        let mut problems = check_catalog(&legacy);

        match factory.build_remaster(&config) {
            Ok((remaster, report)) => {
                println!(
                    "{} {} derived, {} literal, {} carried, {} removed, {} swept",
                    style("Remaster build:").bold().yellow(),
                    report.derived,
                    report.literal,
                    report.carried,
                    report.removed,
                    report.swept
                );
                for issue in &report.issues {
                    println!("  {} {}", style("!").yellow().bold(), issue);
                }
                println!();
                problems += check_catalog(&remaster);
            }
            Err(err) => {
                println!("{} {:#}", style("✗ Remaster build failed:").red().bold(), err);
                problems += 1;
            }
        }

        if problems > 0 {
            anyhow::bail!("{problems} problem(s) found");
        }

        println!("{}", style("✓ All content is clean").green().bold());
        Ok(())
    }
}

/// Prints and counts entries that fail the grammar or record checks.
fn check_catalog(catalog: &Catalog) -> usize {
    println!(
        "{} {} ({} entries)",
        style("Catalog:").bold().yellow(),
        catalog.edition(),
        catalog.len()
    );

    let mut problems = 0;
    for table in catalog.tables() {
        for (name, attrs) in table.iter() {
            let result = AttrString::parse(attrs)
                .map_err(|err| err.to_string())
                .and_then(|parsed| {
                    Record::from_attrs(table.kind(), &parsed).map_err(|err| err.to_string())
                });
            if let Err(err) = result {
                println!(
                    "  {} {} {}: {}",
                    style("✗").red().bold(),
                    table.kind(),
                    style(name).cyan(),
                    err
                );
                problems += 1;
            }
        }
    }

    if problems == 0 {
        println!("  {}", style("✓ every entry parses").green());
    }
    println!();
    problems
}
