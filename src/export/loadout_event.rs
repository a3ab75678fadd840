//! Journal-style `Loadout` event for a tested loadout, the format fitting tools import.

use serde_json::{json, Map, Value};

use crate::data::{GeneratorStats, ShieldBoosterVariant, ShieldGenerator};
use crate::error::{Error, Result};
use crate::optimizer::Loadout;

/// (label, value, shown as percentage, less is good)
fn modifier_fields(stats: &GeneratorStats) -> [(&'static str, f64, bool, u8); 9] {
    [
        ("Integrity", stats.integrity, false, 0),
        ("PowerDraw", stats.power, false, 1),
        ("ShieldGenStrength", stats.optmul, true, 0),
        ("EnergyPerRegen", stats.distdraw, false, 1),
        ("BrokenRegenRate", stats.brokenregen, false, 0),
        ("RegenRate", stats.regen, false, 0),
        ("KineticResistance", stats.kinres, true, 0),
        ("ThermicResistance", stats.thermres, true, 0),
        ("ExplosiveResistance", stats.explres, true, 0),
    ]
}

/// Stats the engineering changed, relative to the unengineered generator.
pub fn generator_modifiers(generator: &ShieldGenerator) -> Vec<Value> {
    modifier_fields(&generator.base_stats)
        .into_iter()
        .zip(modifier_fields(&generator.stats))
        .filter(|((_, original, _, _), (_, value, _, _))| original != value)
        .map(|((label, original, percentage, less_is_good), (_, value, _, _))| {
            let scale = if percentage { 100.0 } else { 1.0 };
            json!({
                "Label": label,
                "Value": value * scale,
                "OriginalValue": original * scale,
                "LessIsGood": less_is_good,
            })
        })
        .collect()
}

pub fn generator_module(generator: &ShieldGenerator, slot: u8, slot_class: u8) -> Value {
    let mut module = json!({
        "Item": generator.symbol,
        "Slot": format!("slot{slot:02}_size{slot_class}"),
        "On": true,
        "Priority": 0,
    });
    if let Some(blueprint) = &generator.blueprint {
        module["Engineering"] = json!({
            "BlueprintName": blueprint.symbol,
            "Level": 5,
            "Quality": 1,
            "Modifiers": generator_modifiers(generator),
            "ExperimentalEffect": generator.experimental.as_ref().map(|effect| effect.symbol.as_str()),
        });
    }
    module
}

pub fn booster_module(booster: &ShieldBoosterVariant, slot: u8) -> Value {
    let mut module = match &booster.loadout_template {
        Value::Object(template) => Value::Object(template.clone()),
        _ => Value::Object(Map::new()),
    };
    module["Slot"] = Value::from(format!("tinyhardpoint{slot}"));
    module
}

/// Ship template plus the generator (in the highest-numbered internal slot that fits) and the
/// boosters (in free utility slots, ascending).
pub fn loadout_event(loadout: &Loadout) -> Result<Value> {
    let ship = &loadout.ship;
    let mut event = match &ship.loadout_template {
        Value::Object(template) => Value::Object(template.clone()),
        _ => json!({"event": "Loadout", "Ship": ship.symbol}),
    };
    if !event.get("Modules").is_some_and(Value::is_array) {
        event["Modules"] = Value::Array(Vec::new());
    }

    let generator = &loadout.generator;
    let (slot, slot_class) = ship
        .available_internal_slot(generator.module_class, true)
        .ok_or_else(|| {
            Error::Export(format!(
                "{} has no internal slot for a class {} shield generator",
                ship.display_name(),
                generator.module_class
            ))
        })?;
    if loadout.boosters.len() > ship.utility_slots_free.len() {
        return Err(Error::Export(format!(
            "{} boosters do not fit in {} free utility slots",
            loadout.boosters.len(),
            ship.utility_slots_free.len()
        )));
    }

    let mut modules = vec![generator_module(generator, slot, slot_class)];
    modules.extend(
        loadout
            .boosters
            .iter()
            .zip(&ship.utility_slots_free)
            .map(|(booster, slot)| booster_module(booster, *slot)),
    );
    if let Some(Value::Array(existing)) = event.get_mut("Modules") {
        existing.extend(modules);
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generator::{GeneratorRecord, Modification};
    use crate::data::GeneratorKind;

    fn generator() -> ShieldGenerator {
        let record = GeneratorRecord {
            symbol: "int_shieldgenerator_size6_class3_fast".to_string(),
            name: "Bi-Weave Shield Generator".to_string(),
            module_class: 6,
            rating: 'C',
            stats: GeneratorStats {
                integrity: 150.0,
                power: 2.1,
                explres: 0.5,
                kinres: 0.4,
                thermres: -0.2,
                regen: 5.8,
                brokenregen: 9.6,
                distdraw: 1.2,
                minmass: 270.0,
                optmass: 540.0,
                maxmass: 1350.0,
                minmul: 0.4,
                optmul: 0.9,
                maxmul: 1.4,
            },
        };
        ShieldGenerator::unengineered(&record, GeneratorKind::BiWeave)
    }

    #[test]
    fn unengineered_generator_has_no_engineering_block() {
        let module = generator_module(&generator(), 4, 6);
        assert_eq!(module["Slot"], "slot04_size6");
        assert!(module.get("Engineering").is_none());
    }

    #[test]
    fn modifiers_list_changed_stats_only() {
        let mut engineered = generator();
        engineered.stats.kinres = 0.58;
        engineered.stats.integrity = 165.0;
        engineered.blueprint = Some(Modification {
            symbol: "ShieldGenerator_Kinetic".to_string(),
            name: "Kinetic Resistant".to_string(),
        });
        let module = generator_module(&engineered, 2, 6);
        let modifiers = module["Engineering"]["Modifiers"].as_array().expect("modifiers");
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[0]["Label"], "Integrity");
        assert_eq!(modifiers[1]["Label"], "KineticResistance");
        assert!((modifiers[1]["Value"].as_f64().unwrap_or_default() - 58.0).abs() < 1e-9);
        assert_eq!(module["Engineering"]["ExperimentalEffect"], Value::Null);
    }
}
