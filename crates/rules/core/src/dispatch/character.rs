//! Ancestries, heritages, backgrounds, classes, deities, languages, skills,
//! and features.

use super::{Recorder, rule_prefix};
use crate::attrs::{AttrItem, AttrString, FeatureRef};
use crate::record::{
    AncestryRecord, BackgroundRecord, ClassRecord, ContentKind, DeityRecord, FeatureRecord,
    HeritageRecord, LanguageRecord, SkillRecord,
};
use crate::registry::{Expr, RuleDef, RuleOp, RuleRegistry};

/// Defines `level_var` as the character level while `source_var` is `name`.
fn level_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    level_var: &str,
    source_var: &str,
    name: &str,
) {
    rec.rule(RuleDef::new(
        level_var,
        source_var,
        RuleOp::Guard,
        Some(Expr::source_is(name)),
    ));
    rec.rule(RuleDef::new(level_var, "level", RuleOp::Set, None));
}

/// Wires an owner's `Features` and `Selectables` lists.
///
/// Each granted feature becomes `<prefix>Features.<Name>`, live once
/// `level_var` reaches the feature's level. Selectables are also offered as
/// choices in `selectableFeatures`, typed by owner and tag.
pub(crate) fn feature_list_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    owner: &str,
    level_var: &str,
    features: &[FeatureRef],
    selectables: &[FeatureRef],
) {
    let prefix = rule_prefix(owner);
    for feature in features {
        let target = format!("{prefix}Features.{}", feature.name);
        rec.rule(RuleDef::new(
            target.clone(),
            level_var,
            RuleOp::Set,
            Some(Expr::from_level(feature.level)),
        ));
        rec.rule(RuleDef::new(
            format!("features.{}", feature.name),
            target,
            RuleOp::Add,
            None,
        ));
    }

    for selectable in selectables {
        let kind = match &selectable.tag {
            Some(tag) => format!("{owner} ({tag})"),
            None => owner.to_string(),
        };
        let mut attrs = AttrString::default();
        attrs.set("Type", vec![AttrItem::new(kind)]);
        attrs.set("Level", vec![AttrItem::new(selectable.level.to_string())]);
        rec.choice("selectableFeatures", &selectable.name, &attrs.to_string());

        let target = format!("{prefix}Features.{}", selectable.name);
        rec.rule(RuleDef::new(
            target.clone(),
            format!("selectableFeatures.{}", selectable.name),
            RuleOp::Set,
            None,
        ));
        rec.rule(RuleDef::new(
            format!("features.{}", selectable.name),
            target,
            RuleOp::Add,
            None,
        ));
    }
}

pub(crate) fn ancestry_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &AncestryRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Ancestry.group(), name, attrs);

    let level_var = format!("{}Level", rule_prefix(name));
    level_rules(rec, &level_var, "ancestry", name);
    rec.rule(RuleDef::new(
        "ancestryHitPoints",
        "ancestry",
        RuleOp::Set,
        Some(Expr::when_source_is(name, record.hit_points)),
    ));
    if let Some(speed) = record.speed {
        rec.rule(RuleDef::new(
            "speed",
            "ancestry",
            RuleOp::Set,
            Some(Expr::when_source_is(name, speed)),
        ));
    }
    for language in &record.languages {
        rec.rule(RuleDef::new(
            format!("languages.{language}"),
            level_var.as_str(),
            RuleOp::Set,
            Some(Expr::number(1)),
        ));
    }

    feature_list_rules(rec, name, &level_var, &record.features, &record.selectables);
}

pub(crate) fn heritage_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &HeritageRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Heritage.group(), name, attrs);
    let level_var = format!("{}Level", rule_prefix(name));
    level_rules(rec, &level_var, "heritage", name);
    feature_list_rules(rec, name, &level_var, &record.features, &[]);
}

pub(crate) fn background_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &BackgroundRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Background.group(), name, attrs);
    let level_var = format!("{}Level", rule_prefix(name));
    level_rules(rec, &level_var, "background", name);
    feature_list_rules(rec, name, &level_var, &record.features, &record.selectables);
}

pub(crate) fn class_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &ClassRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Class.group(), name, attrs);

    let level_var = format!("{}Level", rule_prefix(name));
    level_rules(rec, &level_var, "class", name);
    rec.rule(RuleDef::new(
        "classHitPoints",
        "class",
        RuleOp::Set,
        Some(Expr::when_source_is(name, record.hit_points)),
    ));
    rec.rule(RuleDef::new(
        "keyAttribute",
        "class",
        RuleOp::Set,
        Some(Expr::when_source_is(
            name,
            Expr::literal(&record.key_attributes.join("/")),
        )),
    ));

    feature_list_rules(rec, name, &level_var, &record.features, &record.selectables);
}

pub(crate) fn deity_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &DeityRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Deity.group(), name, attrs);

    let lists = [
        ("deityFont", &record.font),
        ("deityDomains", &record.domains),
        ("deitySanctification", &record.sanctification),
    ];
    for (target, values) in lists {
        if !values.is_empty() {
            rec.rule(RuleDef::new(
                target,
                "deity",
                RuleOp::Set,
                Some(Expr::when_source_is(name, Expr::literal(&values.join("/")))),
            ));
        }
    }

    let single = [
        ("deityAlignment", &record.alignment),
        ("deitySkill", &record.skill),
        ("deityWeapon", &record.weapon),
    ];
    for (target, value) in single {
        if let Some(value) = value {
            rec.rule(RuleDef::new(
                target,
                "deity",
                RuleOp::Set,
                Some(Expr::when_source_is(name, Expr::literal(value))),
            ));
        }
    }
}

pub(crate) fn language_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    _record: &LanguageRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Language.group(), name, attrs);
}

pub(crate) fn skill_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &SkillRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Skill.group(), name, attrs);
    rec.rule(RuleDef::new(
        format!("skillModifiers.{name}"),
        format!("{}Modifier", record.attribute.to_ascii_lowercase()),
        RuleOp::Add,
        None,
    ));
}

/// Registers a feature of any feature kind; each section gets a note rule
/// keyed by the feature's prefix.
pub(crate) fn feature_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    kind: ContentKind,
    name: &str,
    record: &FeatureRecord,
    attrs: &str,
) {
    rec.choice(kind.group(), name, attrs);

    let prefix = rule_prefix(name);
    for (section, _) in record.section_notes() {
        rec.rule(RuleDef::new(
            format!("{section}Notes.{prefix}"),
            format!("features.{name}"),
            RuleOp::Set,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::choice_rules;
    use crate::record::ContentKind;
    use crate::registry::{ChoiceRegistry, RuleOp, RuleRegistry};

    const ELF: &str = r#"HitPoints=6 Size=Medium Speed=30 Features="1:Attribute Boosts","1:Low-Light Vision" Selectables="1:Ancient Elf:Heritage","1:Arctic Elf:Heritage" Languages=Common,Elven Traits=Elf,Humanoid"#;

    #[test]
    fn ancestry_features_and_selectables() {
        let mut registry = ChoiceRegistry::new();
        let registration = choice_rules(&mut registry, ContentKind::Ancestry, "Elf", ELF).unwrap();

        assert!(registration.has_choice("ancestrys", "Elf"));
        assert_eq!(
            registration.in_group("selectableFeatures").collect::<Vec<_>>(),
            vec!["Ancient Elf", "Arctic Elf"]
        );
        assert_eq!(
            registry.choice("selectableFeatures", "Ancient Elf"),
            Some(r#"Type="Elf (Heritage)" Level=1"#)
        );

        let vision: Vec<_> = registry.rules_for("elfFeatures.Low-Light Vision").collect();
        assert_eq!(vision.len(), 1);
        assert_eq!(vision[0].source, "elfLevel");
        assert_eq!(
            vision[0].formula.as_ref().map(|f| f.as_str()),
            Some("source >= 1 ? 1 : null")
        );

        let hit_points: Vec<_> = registry.rules_for("ancestryHitPoints").collect();
        assert_eq!(
            hit_points[0].formula.as_ref().map(|f| f.as_str()),
            Some("source == 'Elf' ? 6 : null")
        );
        assert_eq!(registry.rules_for("languages.Elven").count(), 1);
        assert_eq!(registration.rules, registry.rule_count());
    }

    #[test]
    fn class_level_is_gated_on_class() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Class,
            "Fighter",
            r#"HitPoints=10 Attribute=strength,dexterity Features="1:Attack Of Opportunity","5:Fighter Weapon Mastery""#,
        )
        .unwrap();

        let level: Vec<_> = registry.rules_for("fighterLevel").collect();
        assert_eq!(level.len(), 2);
        assert_eq!(level[0].op, RuleOp::Guard);
        assert_eq!(level[0].source, "class");
        assert_eq!(
            registry
                .rules_for("fighterFeatures.Fighter Weapon Mastery")
                .next()
                .and_then(|r| r.formula.as_ref())
                .map(|f| f.as_str()),
            Some("source >= 5 ? 1 : null")
        );
        assert_eq!(
            registry
                .rules_for("keyAttribute")
                .next()
                .and_then(|r| r.formula.as_ref())
                .map(|f| f.to_string()),
            Some("source == 'Fighter' ? 'strength/dexterity' : null".to_string())
        );
    }

    #[test]
    fn level_guard_escapes_apostrophes() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Background,
            "Gambler's Apprentice",
            r#"Features="1:Skill Trained (Deception; Games Lore)""#,
        )
        .unwrap();

        let guard = registry
            .rules()
            .iter()
            .find(|rule| rule.op == RuleOp::Guard && rule.source == "background")
            .and_then(|rule| rule.formula.as_ref())
            .map(|f| f.as_str());
        assert_eq!(guard, Some(r"source == 'Gambler\'s Apprentice'"));
    }

    #[test]
    fn feature_sections_become_note_rules() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::ClassFeature,
            "Shield Block",
            r#"Class=Fighter Section=combat,feature Note="Can use Shield Block","Has the Shield Block feature""#,
        )
        .unwrap();

        assert!(registry.has_choice("features", "Shield Block"));
        assert_eq!(registry.rules_for("combatNotes.shieldBlock").count(), 1);
        assert_eq!(registry.rules_for("featureNotes.shieldBlock").count(), 1);
    }

    #[test]
    fn skills_read_legacy_ability_field() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(&mut registry, ContentKind::Skill, "Athletics", "Ability=Strength").unwrap();
        let rule = registry.rules_for("skillModifiers.Athletics").next().unwrap();
        assert_eq!(rule.source, "strengthModifier");
    }
}
