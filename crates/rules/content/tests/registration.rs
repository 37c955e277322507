use rules_content::{BuildConfig, LegacyRuleset, RemasterRuleset, Ruleset};
use rules_core::{ChoiceRegistry, RuleOp, RuleRegistry, choice_rules_by_name};

fn registered(ruleset: &impl Ruleset) -> ChoiceRegistry {
    let mut registry = ChoiceRegistry::new();
    let summary = ruleset
        .register_all(&mut registry)
        .expect("registration should succeed");
    assert!(summary.skipped.is_empty(), "skipped: {:?}", summary.skipped);
    assert_eq!(summary.entries, ruleset.catalog().len());
    assert_eq!(summary.rules, registry.rule_count());
    registry
}

fn remaster() -> ChoiceRegistry {
    let ruleset = RemasterRuleset::new(BuildConfig::strict()).expect("embedded data should build");
    assert!(ruleset.report().is_clean());
    registered(&ruleset)
}

/// Strict mode would stop at the first entry that failed to register.
#[test]
fn remaster_registers_every_entry_strictly() {
    let registry = remaster();
    assert!(registry.has_choice("ancestrys", "Orc"));
    assert!(registry.has_choice("heritages", "Aiuvarin"));
    assert!(registry.has_choice("classs", "Witch"));
    assert!(!registry.has_choice("heritages", "Half-Elf"));
}

#[test]
fn remaster_feats_land_in_the_right_bucket() {
    let registry = remaster();

    for (feat, bucket) in [
        ("Elf Atavism", "ancestryFeats"),
        ("Orc Ferocity", "ancestryFeats"),
        ("Cat Nap", "ancestryFeats"),
        ("Fighter Dedication", "classFeats"),
        ("Cackle", "classFeats"),
        ("Toughness", "generalFeats"),
    ] {
        assert!(registry.has_choice("feats", feat), "{feat} missing from feats");
        assert!(registry.has_choice(bucket, feat), "{feat} missing from {bucket}");
    }
}

#[test]
fn spells_register_one_variant_per_tradition() {
    let registry = remaster();

    assert!(registry.has_choice("spells", "Fireball (A3)"));
    assert!(registry.has_choice("spells", "Fireball (P3)"));
    assert!(!registry.has_choice("spells", "Fireball (D3)"));

    for variant in ["Shield (AC1)", "Shield (DC1)", "Shield (OC1)"] {
        assert!(registry.has_choice("spells", variant), "{variant}");
    }

    assert!(registry.has_choice("focusSpells", "Lay On Hands (1)"));
    assert!(!registry.has_choice("spells", "Lay On Hands (1)"));
    assert!(registry.has_choice("focusSpells", "Hymn Of Healing (O1)"));

    let fireball = registry.choice("spells", "Fireball (A3)").unwrap();
    assert!(fireball.contains("Traditions=Arcane"));
    assert!(!fireball.contains("Primal"));
}

#[test]
fn witch_tradition_comes_from_the_patron() {
    let registry = remaster();
    let traditions: Vec<_> = registry.rules_for("witchTradition").collect();
    assert_eq!(traditions.len(), 7);
    assert!(traditions.iter().all(|rule| rule.op == RuleOp::Set));
    assert!(
        traditions
            .iter()
            .any(|rule| rule.source == "features.Faith's Flamekeeper")
    );
    assert_eq!(registry.rules_for("spellcastingTradition.Witch").count(), 1);
}

/// Superstition is a Remaster instinct; the legacy barbarian has no rage
/// bonus for it.
#[test]
fn superstition_rage_damage_is_remaster_only() {
    let superstition = |registry: &ChoiceRegistry| {
        registry
            .rules_for("rageDamageBonus")
            .filter(|rule| rule.source == "features.Superstition Instinct")
            .count()
    };

    assert_eq!(superstition(&remaster()), 1);

    let legacy = LegacyRuleset::new().expect("legacy catalog should load");
    assert_eq!(superstition(&registered(&legacy)), 0);
}

#[test]
fn legacy_ruleset_keeps_legacy_content() {
    let ruleset = LegacyRuleset::new().unwrap();
    let registry = registered(&ruleset);

    assert!(registry.has_choice("heritages", "Half-Elf"));
    assert!(registry.has_choice("ancestryFeats", "Elf Atavism"));
    assert!(registry.has_choice("spells", "Magic Missile (A1)"));
    assert!(!registry.has_choice("classs", "Witch"));
}

#[test]
fn unknown_type_name_leaves_the_registry_untouched() {
    let mut registry = ChoiceRegistry::new();

    let outcome = choice_rules_by_name(&mut registry, "Vehicle", "Cart", "Speed=10").unwrap();

    assert!(outcome.is_none());
    assert!(registry.is_empty());
    assert!(registry.choice_names("vehicles").is_empty());
}
