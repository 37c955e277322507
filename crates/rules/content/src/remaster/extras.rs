//! Derived rules that the attribute strings cannot express.
//!
//! Each callback is keyed by the content kind and name it extends and runs
//! after that item's regular registration. Callbacks only describe rules;
//! the formulas are evaluated by the host.

use std::collections::BTreeMap;

use rules_core::{AttrString, ContentKind, Expr, RuleDef, RuleOp};

/// Builds the extra rules for one content item.
pub type ExtraFn = fn(name: &str, attrs: &AttrString) -> Vec<RuleDef>;

#[derive(Clone, Debug, Default)]
pub struct ExtraRules {
    callbacks: BTreeMap<(ContentKind, String), ExtraFn>,
}

impl ExtraRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks shared by both editions.
    pub fn legacy() -> Self {
        let mut extras = Self::new();
        extras.insert(ContentKind::Class, "Barbarian", barbarian);
        extras.insert(ContentKind::Class, "Fighter", fighter);
        extras.insert(ContentKind::Ancestry, "Dwarf", dwarf);
        extras.insert(ContentKind::Feat, "Toughness", toughness);
        extras.insert(ContentKind::Feat, "Fleet", fleet);
        extras
    }

    pub fn remaster() -> Self {
        let mut extras = Self::legacy();
        extras.insert(ContentKind::Class, "Barbarian", remaster_barbarian);
        extras.insert(ContentKind::Class, "Witch", witch);
        extras
    }

    /// Adds or replaces the callback for `(kind, name)`.
    pub fn insert(&mut self, kind: ContentKind, name: impl Into<String>, callback: ExtraFn) {
        self.callbacks.insert((kind, name.into()), callback);
    }

    pub fn get(&self, kind: ContentKind, name: &str) -> Option<ExtraFn> {
        self.callbacks.get(&(kind, name.to_string())).copied()
    }

    /// Extra rules for an item, empty when it has no callback.
    pub fn rules_for(&self, kind: ContentKind, name: &str, attrs: &AttrString) -> Vec<RuleDef> {
        self.get(kind, name)
            .map(|callback| callback(name, attrs))
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = (ContentKind, &str)> + '_ {
        self.callbacks
            .keys()
            .map(|(kind, name)| (*kind, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Rage damage bonus, `(instinct, base, specialization, greater)`.
const LEGACY_RAGE_DAMAGE: &[(&str, u8, u8, u8)] = &[
    ("Animal Instinct", 2, 5, 12),
    ("Dragon Instinct", 4, 8, 16),
    ("Fury Instinct", 2, 6, 12),
    ("Giant Instinct", 6, 10, 18),
    ("Spirit Instinct", 3, 7, 13),
];

const REMASTER_RAGE_DAMAGE: &[(&str, u8, u8, u8)] = &[
    ("Animal Instinct", 2, 5, 12),
    ("Dragon Instinct", 4, 8, 16),
    ("Fury Instinct", 2, 6, 12),
    ("Giant Instinct", 6, 10, 18),
    ("Spirit Instinct", 3, 7, 13),
    ("Superstition Instinct", 2, 6, 12),
];

/// Rage damage is the highest bonus among the instincts the barbarian has,
/// growing with weapon specialization (level 7) and greater weapon
/// specialization (level 15).
fn rage_damage(table: &[(&str, u8, u8, u8)]) -> Vec<RuleDef> {
    let mut rules = vec![RuleDef::new(
        "combatNotes.rage",
        "rageDamageBonus",
        RuleOp::Set,
        None,
    )];
    rules.extend(table.iter().map(|(instinct, base, special, greater)| {
        RuleDef::new(
            "rageDamageBonus",
            format!("features.{instinct}"),
            RuleOp::Max,
            Some(Expr::new(format!(
                "barbarianLevel<7?{base}:barbarianLevel<15?{special}:{greater}"
            ))),
        )
    }));
    rules
}

fn barbarian(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    rage_damage(LEGACY_RAGE_DAMAGE)
}

fn remaster_barbarian(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    rage_damage(REMASTER_RAGE_DAMAGE)
}

/// Proficiency rank in the chosen weapon group: expert, then master at 5,
/// then legendary at 13.
fn fighter(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    vec![
        RuleDef::new(
            "rank.Fighter Weapon Group",
            "fighterLevel",
            RuleOp::Max,
            Some(Expr::new("source<5?2:source<13?3:4")),
        ),
        RuleDef::new(
            "combatNotes.fighterWeaponMastery",
            "fighterFeatures.Fighter Weapon Mastery",
            RuleOp::Set,
            Some(Expr::new("level<5?4:level<15?5:6")),
        ),
    ]
}

const PATRON_TRADITIONS: &[(&str, &str)] = &[
    ("Faith's Flamekeeper", "Divine"),
    ("Silence In Snow", "Primal"),
    ("Spinner Of Threads", "Occult"),
    ("Starless Shadow", "Occult"),
    ("The Inscribed One", "Arcane"),
    ("The Resentment", "Occult"),
    ("Wilding Steward", "Primal"),
];

/// A witch's spellcasting tradition comes from their patron.
fn witch(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    PATRON_TRADITIONS
        .iter()
        .map(|(patron, tradition)| {
            RuleDef::new(
                "witchTradition",
                format!("features.{patron}"),
                RuleOp::Set,
                Some(Expr::literal(tradition)),
            )
        })
        .chain([RuleDef::new(
            "spellcastingTradition.Witch",
            "witchTradition",
            RuleOp::Set,
            None,
        )])
        .collect()
}

fn dwarf(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    vec![RuleDef::new(
        "weapons.Clan Dagger",
        "features.Clan Dagger",
        RuleOp::Set,
        Some(Expr::number(1)),
    )]
}

fn toughness(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    vec![RuleDef::new(
        "hitPoints",
        "features.Toughness",
        RuleOp::Add,
        Some(Expr::new("level")),
    )]
}

fn fleet(_name: &str, _attrs: &AttrString) -> Vec<RuleDef> {
    vec![RuleDef::new(
        "speed",
        "features.Fleet",
        RuleOp::Add,
        Some(Expr::number(5)),
    )]
}
