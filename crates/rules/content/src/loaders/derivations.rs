//! Derivation and removal loaders.
//!
//! ```ron
//! #![enable(implicit_some)]
//! [
//!     (
//!         kind: Ancestry,
//!         name: "Elf",
//!         patches: [
//!             (op: Replace(pattern: "Selectables=", with: r#"Selectables="1:Ancient Elf:Heritage","#)),
//!         ],
//!     ),
//! ]
//! ```

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::remaster::{Derivation, Removal};

pub struct DerivationLoader;

impl DerivationLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Derivation>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, origin: &str) -> LoadResult<Vec<Derivation>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse derivations RON {}: {}", origin, e))
    }
}

pub struct RemovalLoader;

impl RemovalLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Removal>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, origin: &str) -> LoadResult<Vec<Removal>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse removals RON {}: {}", origin, e))
    }
}

#[cfg(test)]
mod tests {
    use rules_core::{ContentKind, Patch, PatchOp};

    use super::*;

    #[test]
    fn parses_field_and_whole_string_patches() {
        let derivations = DerivationLoader::parse(
            r##"#![enable(implicit_some)]
            [
                (
                    kind: Ancestry,
                    name: "Human",
                    patches: [
                        (field: "Selectables", op: RemoveItem(item: "1:Half-Elf:Heritage")),
                        (op: ReplaceAll(pattern: "Skilled Heritage Human", with: "Skilled Human")),
                    ],
                ),
                (
                    kind: ClassFeature,
                    name: "Reactive Strike",
                    from: "Attack Of Opportunity",
                    patches: [(field: "Note", op: Delete)],
                ),
            ]"##,
            "test",
        )
        .unwrap();

        assert_eq!(derivations.len(), 2);
        assert_eq!(
            derivations[0].patches,
            vec![
                Patch::remove_item("Selectables", "1:Half-Elf:Heritage"),
                Patch::replace_all("Skilled Heritage Human", "Skilled Human"),
            ]
        );
        assert_eq!(derivations[0].source_name(), "Human");
        assert_eq!(derivations[1].kind, ContentKind::ClassFeature);
        assert_eq!(derivations[1].source_name(), "Attack Of Opportunity");
        assert_eq!(derivations[1].patches[0].op, PatchOp::Delete);
    }

    #[test]
    fn parses_removals() {
        let removals = RemovalLoader::parse(
            r#"[(kind: Language, names: ["Aquan", "Auran"])]"#,
            "test",
        )
        .unwrap();
        assert_eq!(removals[0].names, vec!["Aquan", "Auran"]);
    }
}
