use super::Recorder;
use crate::attrs::{AttrItem, AttrString};
use crate::record::{ContentKind, SpellRecord};
use crate::registry::RuleRegistry;

/// Registers one variant per tradition.
///
/// Each variant's attributes name only its own tradition. Focus spells go to
/// `focusSpells`; only listed spells (non-focus, or focus cantrips) go to
/// `spells`. A focus spell without traditions gets one untagged variant.
pub(crate) fn spell_rules<R: RuleRegistry + ?Sized>(
    rec: &mut Recorder<'_, R>,
    name: &str,
    record: &SpellRecord,
    attrs: &AttrString,
) {
    let mut register = |variant: &str, attrs: &str| {
        if record.is_focus() {
            rec.choice("focusSpells", variant, attrs);
        }
        if record.is_listed() {
            rec.choice(ContentKind::Spell.group(), variant, attrs);
        }
    };

    if record.traditions.is_empty() {
        register(&record.variant_name(name, ""), &attrs.to_string());
        return;
    }

    for tradition in &record.traditions {
        let mut variant = attrs.clone();
        variant.set("Traditions", vec![AttrItem::new(tradition.as_str())]);
        register(&record.variant_name(name, tradition), &variant.to_string());
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::choice_rules;
    use crate::record::ContentKind;
    use crate::registry::{ChoiceRegistry, RuleRegistry};

    #[test]
    fn one_variant_per_tradition() {
        let mut registry = ChoiceRegistry::new();
        let registration = choice_rules(
            &mut registry,
            ContentKind::Spell,
            "Fireball",
            r#"Level=3 Traits=Fire Traditions=Arcane,Primal Cast=2 Description="Deals 6d6 HP fire""#,
        )
        .unwrap();

        assert_eq!(
            registration.in_group("spells").collect::<Vec<_>>(),
            vec!["Fireball (A3)", "Fireball (P3)"]
        );
        assert_eq!(registration.in_group("focusSpells").count(), 0);
        assert_eq!(
            registry.choice("spells", "Fireball (P3)"),
            Some(r#"Level=3 Traits=Fire Traditions=Primal Cast=2 Description="Deals 6d6 HP fire""#)
        );
    }

    #[test]
    fn focus_spells_stay_out_of_the_spell_list() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Spell,
            "Lay On Hands",
            r#"Level=1 Traits=Uncommon,Champion,Focus,Healing,Manipulate Traditions=Arcane,Divine Cast=1 Description="Heals""#,
        )
        .unwrap();

        assert!(registry.choice_names("spells").is_empty());
        assert_eq!(
            registry.choice_names("focusSpells"),
            vec!["Lay On Hands (A1)", "Lay On Hands (D1)"]
        );
    }

    #[test]
    fn focus_cantrips_are_listed_too() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Spell,
            "Shield",
            r#"Level=1 Traits=Cantrip,Focus,Force Traditions=Divine Cast=1 Description="+1 AC""#,
        )
        .unwrap();
        assert!(registry.has_choice("spells", "Shield (DC1)"));
        assert!(registry.has_choice("focusSpells", "Shield (DC1)"));
    }

    #[test]
    fn untagged_focus_spell() {
        let mut registry = ChoiceRegistry::new();
        choice_rules(
            &mut registry,
            ContentKind::Spell,
            "Hymn Of Healing",
            r#"Level=1 Traits=Uncommon,Bard,Composition,Focus,Healing Cast=2 Description="Heals""#,
        )
        .unwrap();
        assert_eq!(registry.choice_names("focusSpells"), vec!["Hymn Of Healing (1)"]);
        assert!(registry.choice_names("spells").is_empty());
    }
}
