use super::Recorder;
use crate::record::{ArmorRecord, ContentKind, GoodyEffect, GoodyRecord, ShieldRecord, WeaponRecord};
use crate::registry::{Expr, RuleDef, RuleOp, RuleRegistry};

/// Defines `target` from `source` when the selection is `name`.
fn stat_rule<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    target: &str,
    source: &str,
    name: &str,
    value: i64,
) {
    rec.rule(RuleDef::new(
        target,
        source,
        RuleOp::Set,
        Some(Expr::when_source_is(name, value)),
    ));
}

pub(crate) fn armor_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &ArmorRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Armor.group(), name, attrs);

    stat_rule(rec, "armorACBonus", "armor", name, record.ac_bonus);
    let optional = [
        ("armorDexCap", record.dex_cap),
        ("armorStrengthRequirement", record.strength),
        ("armorCheckPenalty", record.check_penalty),
        ("armorSpeedPenalty", record.speed_penalty),
    ];
    for (target, value) in optional {
        if let Some(value) = value {
            stat_rule(rec, target, "armor", name, value);
        }
    }
}

pub(crate) fn shield_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &ShieldRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Shield.group(), name, attrs);

    stat_rule(rec, "shieldACBonus", "shield", name, record.ac_bonus);
    stat_rule(rec, "shieldHardness", "shield", name, record.hardness);
    stat_rule(rec, "shieldHitPoints", "shield", name, record.hit_points);
    if let Some(penalty) = record.speed_penalty {
        stat_rule(rec, "shieldSpeedPenalty", "shield", name, penalty);
    }
}

pub(crate) fn weapon_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &WeaponRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Weapon.group(), name, attrs);
    if record.is_advanced() {
        rec.choice("advancedWeapons", name, attrs);
    }

    rec.rule(RuleDef::new(
        format!("weaponDamage.{name}"),
        format!("weapons.{name}"),
        RuleOp::Set,
        Some(Expr::literal(&record.damage)),
    ));
    if let Some(range) = record.range {
        rec.rule(RuleDef::new(
            format!("weaponRange.{name}"),
            format!("weapons.{name}"),
            RuleOp::Set,
            Some(Expr::number(range)),
        ));
    }
}

/// A goody adjusts each of its attributes by its captured value whenever
/// the character's notes match its pattern.
pub(crate) fn goody_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &GoodyRecord,
    attrs: &str,
) {
    rec.choice(ContentKind::Goody.group(), name, attrs);

    let op = match record.effect {
        GoodyEffect::Add => RuleOp::Add,
        GoodyEffect::Lower => RuleOp::Min,
        GoodyEffect::Raise => RuleOp::Max,
        GoodyEffect::Set => RuleOp::Set,
    };
    for attribute in &record.attributes {
        rec.rule(RuleDef::new(
            attribute.as_str(),
            format!("goodies.{name}"),
            op,
            Some(Expr::new(record.value.as_str())),
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::choice_rules;
    use crate::record::ContentKind;
    use crate::registry::{ChoiceRegistry, RuleOp, RuleRegistry};

    #[test]
    fn advanced_weapons_get_second_group() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Weapon,
            "Bastard Sword",
            "Category=Martial Price=4 Damage=1d8S Bulk=1 Hands=1 Group=Sword Traits=Two-Hand-d12",
        )
        .unwrap();
        let registration = choice_rules(
            &mut registry,
            ContentKind::Weapon,
            "Dwarven Dorn-Dergar",
            "Category=Advanced Price=5 Damage=1d10B Bulk=2 Hands=2 Group=Flail Traits=Dwarf,Reach",
        )
        .unwrap();

        assert!(registration.has_choice("advancedWeapons", "Dwarven Dorn-Dergar"));
        assert!(!registry.has_choice("advancedWeapons", "Bastard Sword"));
        assert_eq!(registry.choice_names("weapons").len(), 2);
        assert_eq!(
            registry
                .rules_for("weaponDamage.Bastard Sword")
                .next()
                .and_then(|r| r.formula.as_ref())
                .map(|f| f.as_str()),
            Some("'1d8S'")
        );
    }

    #[test]
    fn armor_rules_skip_absent_stats() {
        let mut registry = ChoiceRegistry::new();
        let registration = choice_rules(
            &mut registry,
            ContentKind::Armor,
            "Leather",
            "Category=Light Price=2 AC=1 Dex=4 Str=0 Check=-1 Bulk=1 Group=Leather",
        )
        .unwrap();
        // AC, Dex, Str, Check; no speed penalty.
        assert_eq!(registration.rules, 4);
        assert_eq!(registry.rules_for("armorSpeedPenalty").count(), 0);
    }

    #[test]
    fn goody_effect_selects_operator() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Goody,
            "Armor Potency",
            r#"Pattern="([-+]\d)\s+armor\s+potency" Effect=add Value="$1" Attribute=armorItemBonus Section=combat Note="%V Armor class""#,
        )
        .unwrap();
        let rule = registry.rules_for("armorItemBonus").next().unwrap();
        assert_eq!(rule.op, RuleOp::Add);
        assert_eq!(rule.source, "goodies.Armor Potency");
        assert_eq!(rule.formula.as_ref().map(|f| f.as_str()), Some("$1"));
    }
}
