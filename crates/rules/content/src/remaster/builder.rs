use std::collections::BTreeSet;

use rules_core::record::AncestryRecord;
use rules_core::{
    AttrString, Catalog, ContentKind, ErrorContext, NoopPolicy, Record, RulesError, apply_patches,
    parse_record,
};

use super::{BuildError, BuildReport, Derivation, Issue, RemasterData, SweepStep};
use crate::config::BuildConfig;

/// Builds the Remaster catalog from the legacy catalog.
///
/// The builder never touches its inputs; every call to [`build`] produces a
/// fresh catalog, so one-shot sweeps run exactly once per build.
///
/// Build order:
/// 1. removals are checked against the legacy catalog
/// 2. derivations patch their legacy source
/// 3. literals are added
/// 4. remaining legacy entries carry over, except those a derivation replaces
///    (its name and its source), even when that derivation failed
/// 5. sweeps run table by table
/// 6. every entry is checked against the grammar and its record type
///
/// [`build`]: CatalogBuilder::build
pub struct CatalogBuilder<'a> {
    legacy: &'a Catalog,
    config: &'a BuildConfig,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(legacy: &'a Catalog, config: &'a BuildConfig) -> Self {
        Self { legacy, config }
    }

    pub fn build(&self, data: &RemasterData) -> Result<(Catalog, BuildReport), BuildError> {
        let mut build = Build {
            catalog: Catalog::new(self.config.edition.as_str()),
            report: BuildReport::default(),
            strict: self.config.strictness.is_strict(),
        };

        let removed = self.removals(&mut build, data)?;
        let mut replaced = BTreeSet::new();
        for derivation in &data.derivations {
            replaced.insert((derivation.kind, derivation.name.as_str()));
            replaced.insert((derivation.kind, derivation.source_name()));
            self.derive(&mut build, derivation)?;
        }
        self.literals(&mut build, data, &removed)?;
        self.carry(&mut build, &removed, &replaced);
        for step in &data.sweeps {
            build.sweep(step)?;
        }
        build.validate()?;
        build.check_heritages()?;

        let report = &build.report;
        tracing::info!(
            edition = %self.config.edition,
            derived = report.derived,
            literal = report.literal,
            carried = report.carried,
            removed = report.removed,
            swept = report.swept,
            issues = report.issues.len(),
            "built catalog"
        );
        Ok((build.catalog, build.report))
    }

    fn removals<'d>(
        &self,
        build: &mut Build,
        data: &'d RemasterData,
    ) -> Result<BTreeSet<(ContentKind, &'d str)>, BuildError> {
        let mut removed = BTreeSet::new();
        for removal in &data.removals {
            for name in &removal.names {
                if self.legacy.entry(removal.kind, name).is_none() {
                    build.issue(Issue::UnknownRemoval {
                        kind: removal.kind,
                        name: name.clone(),
                    })?;
                } else if removed.insert((removal.kind, name.as_str())) {
                    build.report.removed += 1;
                }
            }
        }
        Ok(removed)
    }

    fn derive(&self, build: &mut Build, derivation: &Derivation) -> Result<(), BuildError> {
        let kind = derivation.kind;
        let name = derivation.name.as_str();
        let from = derivation.source_name();

        let Some(legacy_text) = self.legacy.entry(kind, from) else {
            return build.issue(Issue::MissingSource {
                kind,
                name: name.to_string(),
                from: from.to_string(),
            });
        };

        let policy = self.config.noop_patches;
        let patched = match apply_patches(legacy_text, &derivation.patches, policy) {
            Ok(patched) => patched,
            Err(source) => {
                return build.issue(Issue::PatchFailed {
                    kind,
                    name: name.to_string(),
                    source,
                });
            }
        };

        for &index in &patched.noops {
            let patch = derivation
                .patches
                .get(index)
                .map(ToString::to_string)
                .unwrap_or_default();
            match policy {
                NoopPolicy::Warn => build.issue(Issue::NoopPatch {
                    kind,
                    name: name.to_string(),
                    index,
                    patch,
                })?,
                _ => tracing::debug!(%kind, name, index, %patch, "patch matched nothing"),
            }
        }

        if build
            .catalog
            .table_mut(kind)
            .insert(name, patched.text)
            .is_err()
        {
            return build.issue(Issue::DuplicateEntry {
                kind,
                name: name.to_string(),
            });
        }
        build.report.derived += 1;
        tracing::debug!(%kind, name, from, patches = derivation.patches.len(), "derived");
        Ok(())
    }

    fn literals(
        &self,
        build: &mut Build,
        data: &RemasterData,
        removed: &BTreeSet<(ContentKind, &str)>,
    ) -> Result<(), BuildError> {
        for table in &data.literals {
            let kind = table.kind();
            for (name, attrs) in table.iter() {
                if build.catalog.entry(kind, name).is_some() {
                    build.issue(Issue::DuplicateEntry {
                        kind,
                        name: name.to_string(),
                    })?;
                    continue;
                }
                if self.legacy.entry(kind, name).is_some() && !removed.contains(&(kind, name)) {
                    build.issue(Issue::ShadowedLegacy {
                        kind,
                        name: name.to_string(),
                    })?;
                }
                if build.catalog.table_mut(kind).insert(name, attrs).is_ok() {
                    build.report.literal += 1;
                }
            }
        }
        Ok(())
    }

    fn carry(
        &self,
        build: &mut Build,
        removed: &BTreeSet<(ContentKind, &str)>,
        replaced: &BTreeSet<(ContentKind, &str)>,
    ) {
        for table in self.legacy.tables() {
            let kind = table.kind();
            for (name, attrs) in table.iter() {
                let key = (kind, name);
                if removed.contains(&key)
                    || replaced.contains(&key)
                    || build.catalog.entry(kind, name).is_some()
                {
                    continue;
                }
                if build.catalog.table_mut(kind).insert(name, attrs).is_ok() {
                    build.report.carried += 1;
                }
            }
        }
    }
}

/// State of one build in progress.
struct Build {
    catalog: Catalog,
    report: BuildReport,
    strict: bool,
}

impl Build {
    /// Records `issue`, or fails with it in strict mode.
    fn issue(&mut self, issue: Issue) -> Result<(), BuildError> {
        if self.strict {
            return Err(BuildError::Strict(issue));
        }
        tracing::warn!(code = issue.error_code(), "{issue}");
        self.report.issues.push(issue);
        Ok(())
    }

    fn sweep(&mut self, step: &SweepStep) -> Result<(), BuildError> {
        let changed = step
            .sweep
            .apply(self.catalog.table_mut(step.kind))
            .map_err(|source| BuildError::Sweep {
                context: ErrorContext::new()
                    .with_kind(step.kind)
                    .with_message(step.sweep.id()),
                source,
            })?;
        self.report.swept += changed;
        tracing::debug!(kind = %step.kind, sweep = step.sweep.id(), changed, "swept");
        Ok(())
    }

    /// Checks every entry against the grammar, then against its record type.
    fn validate(&mut self) -> Result<(), BuildError> {
        let mut issues: Vec<Issue> = self
            .catalog
            .validate()
            .into_iter()
            .map(Issue::InvalidEntry)
            .collect();

        for table in self.catalog.tables() {
            let kind = table.kind();
            for (name, attrs) in table.iter() {
                let Ok(parsed) = AttrString::parse(attrs) else {
                    continue;
                };
                if let Err(source) = Record::from_attrs(kind, &parsed) {
                    issues.push(Issue::InvalidRecord {
                        kind,
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }

        issues.into_iter().try_for_each(|issue| self.issue(issue))
    }

    /// Every heritage an ancestry offers must exist in the heritage table.
    fn check_heritages(&mut self) -> Result<(), BuildError> {
        let Some(ancestries) = self.catalog.table(ContentKind::Ancestry) else {
            return Ok(());
        };
        let heritages = self.catalog.table(ContentKind::Heritage);

        let mut missing = Vec::new();
        for (ancestry, attrs) in ancestries.iter() {
            let Ok(record) = parse_record::<AncestryRecord>(attrs) else {
                continue;
            };
            for selectable in &record.selectables {
                if selectable.tag.as_deref() != Some("Heritage") {
                    continue;
                }
                if !heritages.is_some_and(|table| table.contains(&selectable.name)) {
                    missing.push(Issue::UnknownHeritage {
                        ancestry: ancestry.to_string(),
                        heritage: selectable.name.clone(),
                    });
                }
            }
        }

        missing.into_iter().try_for_each(|issue| self.issue(issue))
    }
}
