//! Data files compiled into the crate.

/// `(file name, contents)` of every legacy catalog file.
pub(crate) const LEGACY: &[(&str, &str)] = &[
    ("ancestries.ron", include_str!("../../data/legacy/ancestries.ron")),
    ("armor.ron", include_str!("../../data/legacy/armor.ron")),
    ("backgrounds.ron", include_str!("../../data/legacy/backgrounds.ron")),
    ("class_features.ron", include_str!("../../data/legacy/class_features.ron")),
    ("classes.ron", include_str!("../../data/legacy/classes.ron")),
    ("deities.ron", include_str!("../../data/legacy/deities.ron")),
    ("feats.ron", include_str!("../../data/legacy/feats.ron")),
    ("features.ron", include_str!("../../data/legacy/features.ron")),
    ("goodies.ron", include_str!("../../data/legacy/goodies.ron")),
    ("heritages.ron", include_str!("../../data/legacy/heritages.ron")),
    ("languages.ron", include_str!("../../data/legacy/languages.ron")),
    ("shields.ron", include_str!("../../data/legacy/shields.ron")),
    ("skills.ron", include_str!("../../data/legacy/skills.ron")),
    ("spells.ron", include_str!("../../data/legacy/spells.ron")),
    ("weapons.ron", include_str!("../../data/legacy/weapons.ron")),
];

pub(crate) const CONFIG: &str = include_str!("../../data/config.toml");
pub(crate) const DERIVATIONS: &str = include_str!("../../data/remaster/derivations.ron");
pub(crate) const LITERALS: &str = include_str!("../../data/remaster/literals.ron");
pub(crate) const REMOVALS: &str = include_str!("../../data/remaster/removals.ron");
pub(crate) const SWEEPS: &str = include_str!("../../data/remaster/sweeps.ron");
