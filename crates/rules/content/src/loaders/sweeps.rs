//! Sweep list loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::remaster::SweepStep;

/// Loader for the ordered list of table-wide sweeps.
pub struct SweepLoader;

impl SweepLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SweepStep>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, origin: &str) -> LoadResult<Vec<SweepStep>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sweeps RON {}: {}", origin, e))
    }
}

#[cfg(test)]
mod tests {
    use rules_core::{ContentKind, Sweep};

    use super::*;

    #[test]
    fn parses_both_sweep_kinds() {
        let steps = SweepLoader::parse(
            r#"[
                (kind: Ancestry, sweep: ReplaceAll(pattern: "Ability", with: "Attribute")),
                (kind: Armor, sweep: ArmorStrengthToModifier),
            ]"#,
            "test",
        )
        .unwrap();

        assert_eq!(steps[0].sweep, Sweep::replace_all("Ability", "Attribute"));
        assert_eq!(steps[1].kind, ContentKind::Armor);
        assert!(steps[1].sweep.is_one_shot());
    }
}
