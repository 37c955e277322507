use rules_content::{
    BuildConfig, CatalogBuilder, ContentFactory, LEGACY_EDITION, Strictness, legacy_catalog,
};
use rules_core::{AttrString, Catalog, ContentKind, NoopPolicy, Record, apply_patches};

fn remaster() -> Catalog {
    let (catalog, report) = ContentFactory::embedded()
        .build_remaster(&BuildConfig::default())
        .expect("embedded data should build");
    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    catalog
}

fn assert_all_entries_valid(catalog: &Catalog) {
    assert!(catalog.validate().is_empty(), "{:?}", catalog.validate());
    for table in catalog.tables() {
        for (name, attrs) in table.iter() {
            let parsed = AttrString::parse(attrs).expect("grammar checked above");
            if let Err(err) = Record::from_attrs(table.kind(), &parsed) {
                panic!("{} {name}: {err}", table.kind());
            }
        }
    }
}

#[test]
fn every_legacy_entry_parses() {
    let legacy = legacy_catalog().expect("legacy catalog should load");
    assert_eq!(legacy.edition(), LEGACY_EDITION);
    assert!(!legacy.is_empty());
    assert_all_entries_valid(&legacy);
}

#[test]
fn every_remaster_entry_parses() {
    assert_all_entries_valid(&remaster());
}

#[test]
fn embedded_build_report_counts() {
    let (catalog, report) = ContentFactory::embedded()
        .build_remaster(&BuildConfig::default())
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.derived, 35);
    assert_eq!(report.literal, 66);
    assert_eq!(report.removed, 23);
    assert_eq!(report.carried, 137);
    assert_eq!(report.total(), catalog.len());
    assert_eq!(catalog.edition(), BuildConfig::REMASTER_EDITION);
}

/// The embedded data holds up under the strictest settings.
#[test]
fn embedded_build_passes_strict_and_deny() {
    let config = BuildConfig {
        strictness: Strictness::Strict,
        noop_patches: NoopPolicy::Deny,
        ..BuildConfig::default()
    };
    ContentFactory::embedded()
        .build_remaster(&config)
        .expect("no issues under strict/deny");
}

/// The Remaster Elf offers Ancient Elf ahead of the full legacy heritage list.
#[test]
fn elf_gains_ancient_elf_before_legacy_heritages() {
    let legacy = legacy_catalog().unwrap();
    let legacy_elf = AttrString::parse(legacy.entry(ContentKind::Ancestry, "Elf").unwrap()).unwrap();
    let legacy_list = legacy_elf.field("Selectables").unwrap().value_text();

    let catalog = remaster();
    let elf = catalog.entry(ContentKind::Ancestry, "Elf").unwrap();

    let expected = format!(r#"Selectables="1:Ancient Elf:Heritage",{legacy_list}"#);
    assert!(elf.contains(&expected), "{elf}");
    assert!(catalog.entry(ContentKind::Heritage, "Ancient Elf").is_some());
}

#[test]
fn idempotent_patches_do_nothing_the_second_time() {
    let factory = ContentFactory::embedded();
    let legacy = factory.load_legacy().unwrap();
    let data = factory.load_remaster_data().unwrap();

    for derivation in &data.derivations {
        let source = legacy
            .entry(derivation.kind, derivation.source_name())
            .expect("derivation source exists");
        let derived = apply_patches(source, &derivation.patches, NoopPolicy::Allow).unwrap();

        for (index, patch) in derivation.patches.iter().enumerate() {
            if !patch.is_idempotent() {
                continue;
            }
            let (again, changed) = patch.apply(index, &derived.text).unwrap();
            assert!(
                !changed,
                "{} {}: patch {index} ({patch}) changed {} into {again}",
                derivation.kind, derivation.name, derived.text
            );
        }
    }
}

#[test]
fn sweeps_rename_abilities_and_convert_armor_strength() {
    let catalog = remaster();

    let fighter = catalog.entry(ContentKind::Class, "Fighter").unwrap();
    assert!(fighter.starts_with("Attribute=strength,dexterity"));
    assert!(!fighter.contains("Ability"));
    assert!(fighter.contains("1:Reactive Strike"));

    let full_plate = AttrString::parse(catalog.entry(ContentKind::Armor, "Full Plate").unwrap()).unwrap();
    assert_eq!(full_plate.value("Str"), Some("4"));
    let padded = AttrString::parse(catalog.entry(ContentKind::Armor, "Padded Armor").unwrap()).unwrap();
    assert_eq!(padded.value("Str"), Some("0"));

    let sneak_attack = catalog.entry(ContentKind::ClassFeature, "Sneak Attack").unwrap();
    assert!(sneak_attack.contains("off-guard"));
}

/// Every build starts from the legacy catalog, so converting armor strength
/// twice is impossible no matter how often the catalog is rebuilt.
#[test]
fn rebuilding_never_reconverts_armor() {
    let factory = ContentFactory::embedded();
    let legacy = factory.load_legacy().unwrap();
    let data = factory.load_remaster_data().unwrap();
    let config = BuildConfig::default();
    let builder = CatalogBuilder::new(&legacy, &config);

    let (first, _) = builder.build(&data).unwrap();
    let (second, _) = builder.build(&data).unwrap();

    assert_eq!(first, second);
    let legacy_plate = AttrString::parse(legacy.entry(ContentKind::Armor, "Full Plate").unwrap()).unwrap();
    assert_eq!(legacy_plate.value("Str"), Some("18"));
}

#[test]
fn removed_and_renamed_entries() {
    let catalog = remaster();

    for (kind, gone) in [
        (ContentKind::Heritage, "Half-Elf"),
        (ContentKind::Heritage, "Half-Orc"),
        (ContentKind::Language, "Aquan"),
        (ContentKind::ClassFeature, "Attack Of Opportunity"),
        (ContentKind::Feature, "Ability Boosts"),
        (ContentKind::Spell, "Magic Missile"),
    ] {
        assert!(catalog.entry(kind, gone).is_none(), "{kind} {gone} should be gone");
    }

    for (kind, added) in [
        (ContentKind::ClassFeature, "Reactive Strike"),
        (ContentKind::Feature, "Attribute Boosts"),
        (ContentKind::Spell, "Force Barrage"),
        (ContentKind::Spell, "Vitality Lash"),
        (ContentKind::Heritage, "Aiuvarin"),
        (ContentKind::Language, "Thalassic"),
        (ContentKind::Class, "Witch"),
    ] {
        assert!(catalog.entry(kind, added).is_some(), "{kind} {added} should exist");
    }

    let human = AttrString::parse(catalog.entry(ContentKind::Ancestry, "Human").unwrap()).unwrap();
    assert_eq!(
        human.values("Selectables"),
        vec![
            "1:Skilled Human:Heritage",
            "1:Versatile Human:Heritage",
            "1:Aiuvarin:Heritage",
            "1:Dromaar:Heritage",
        ]
    );
}

#[test]
fn deities_trade_alignment_for_sanctification() {
    let catalog = remaster();
    let deities = catalog.table(ContentKind::Deity).unwrap();
    for (name, attrs) in deities.iter() {
        let parsed = AttrString::parse(attrs).unwrap();
        assert!(!parsed.has("Alignment"), "{name} still has an alignment");
        assert!(!parsed.has("FollowerAlignments"), "{name}");
    }

    let iomedae = AttrString::parse(catalog.entry(ContentKind::Deity, "Iomedae").unwrap()).unwrap();
    assert_eq!(iomedae.values("Sanctification"), vec!["Holy"]);
}

#[test]
fn dedication_prerequisites_use_modifiers() {
    let catalog = remaster();
    let fighter = AttrString::parse(catalog.entry(ContentKind::Feat, "Fighter Dedication").unwrap()).unwrap();
    assert_eq!(
        fighter.values("Require"),
        vec!["strengthModifier >= 2", "dexterityModifier >= 2"]
    );
}
