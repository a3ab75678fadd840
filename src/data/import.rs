//! Derive an imported ship from a journal `Loadout` event.
//!
//! The event's modules become the ship's export template. Fitted shield boosters and the
//! shield generator are dropped from the template (they are what gets tested); every other
//! utility or internal module keeps its slot occupied.

use serde_json::Value;

use crate::data::ship::Ship;
use crate::error::CatalogError;

const BOOSTER_ITEM_PREFIX: &str = "hpt_shieldbooster_size0";
const GENERATOR_ITEM_PREFIX: &str = "int_shieldgenerator_size";
const UTILITY_SLOT_PREFIX: &str = "tinyhardpoint";

/// Parse `slotNN_sizeM` (case-insensitive) into `(NN, M)`.
fn parse_internal_slot(slot: &str) -> Option<(u8, u8)> {
    let slot = slot.to_ascii_lowercase();
    let rest = slot.strip_prefix("slot")?;
    let (number, size) = rest.split_once("_size")?;
    if number.len() != 2 || size.len() != 1 {
        return None;
    }
    Some((number.parse().ok()?, size.parse().ok()?))
}

fn trailing_digit(slot: &str) -> Option<u8> {
    slot.chars().last()?.to_digit(10).map(|digit| digit as u8)
}

fn field<'v>(module: &'v Value, key: &str) -> &'v str {
    module.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub fn derive_imported_ship(base: &Ship, event: &Value) -> Result<Ship, CatalogError> {
    let modules = event
        .get("Modules")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::Import("missing 'Modules' array".to_string()))?;

    let mut ship = base.clone();
    if !ship.loadout_template.is_object() {
        ship.loadout_template = Value::Object(Default::default());
    }

    let name = match event.get("ShipName").and_then(Value::as_str) {
        Some(name) => {
            ship.loadout_template["ShipName"] = Value::from(name);
            name.to_string()
        }
        None => base.name.clone(),
    };
    let ident = match event.get("ShipIdent").and_then(Value::as_str) {
        Some(ident) => {
            ship.loadout_template["ShipIdent"] = Value::from(ident);
            ident.to_string()
        }
        None => "Imported".to_string(),
    };
    ship.custom_name = Some(format!("{name} ({ident})"));

    let mut kept = Vec::with_capacity(modules.len());
    for module in modules {
        let slot = field(module, "Slot");
        let item = field(module, "Item").to_ascii_lowercase();

        if slot.to_ascii_lowercase().starts_with(UTILITY_SLOT_PREFIX) {
            if item.starts_with(BOOSTER_ITEM_PREFIX) {
                continue;
            }
            let number = trailing_digit(slot).ok_or_else(|| {
                CatalogError::Import(format!("unrecognised utility slot '{slot}'"))
            })?;
            ship.utility_slots_free.retain(|free| *free != number);
        } else if item.starts_with(GENERATOR_ITEM_PREFIX) {
            // the generator's slot stays free; its size caps the classes we test
            if let Some(size) = trailing_digit(slot) {
                ship.highest_internal = size;
            }
            continue;
        } else if let Some((number, _)) = parse_internal_slot(slot) {
            ship.internal_slots.remove(&number);
        }
        kept.push(module.clone());
    }

    ship.utility_slots_free.sort_unstable();
    ship.loadout_template["Modules"] = Value::Array(kept);
    Ok(ship)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ship::{InternalSlot, ShipRecord, SlotLayout};
    use crate::data::Resistances;
    use serde_json::json;

    fn python() -> Ship {
        Ship::from(ShipRecord {
            name: "Python".to_string(),
            symbol: "Python".to_string(),
            base_shield_strength: 260.0,
            hull_mass: 350.0,
            utility_slots: 4,
            highest_internal: 6,
            slot_layout: SlotLayout {
                internal: [6, 5, 5, 4, 3].into_iter().map(InternalSlot::Standard).collect(),
            },
            base_resistances: Resistances::default(),
            loadout_template: json!({"event": "Loadout", "Ship": "Python", "Modules": []}),
        })
    }

    #[test]
    fn parses_internal_slot_names() {
        assert_eq!(parse_internal_slot("Slot03_Size5"), Some((3, 5)));
        assert_eq!(parse_internal_slot("slot10_size2"), Some((10, 2)));
        assert_eq!(parse_internal_slot("Military01"), None);
        assert_eq!(parse_internal_slot("TinyHardpoint1"), None);
    }

    #[test]
    fn import_frees_boosters_and_generator_but_keeps_other_modules() {
        let event = json!({
            "event": "Loadout",
            "Ship": "python",
            "ShipName": "Serpent",
            "ShipIdent": "PY-01",
            "Modules": [
                {"Slot": "TinyHardpoint1", "Item": "Hpt_ShieldBooster_Size0_Class5"},
                {"Slot": "TinyHardpoint2", "Item": "Hpt_ChaffLauncher_Tiny"},
                {"Slot": "Slot01_Size6", "Item": "Int_ShieldGenerator_Size5_Class3_Fast"},
                {"Slot": "Slot02_Size5", "Item": "Int_CargoRack_Size5_Class1"},
            ]
        });
        let ship = derive_imported_ship(&python(), &event).expect("import");

        assert_eq!(ship.display_name(), "Serpent (PY-01)");
        assert_eq!(ship.utility_slots_free, vec![1, 3, 4]);
        assert_eq!(ship.highest_internal, 6);
        assert!(ship.internal_slots.contains_key(&1));
        assert!(!ship.internal_slots.contains_key(&2));

        let modules = ship.loadout_template["Modules"].as_array().expect("modules");
        assert_eq!(modules.len(), 2);
        assert_eq!(ship.loadout_template["ShipName"], "Serpent");
    }

    #[test]
    fn import_without_name_uses_ship_name_and_imported_ident() {
        let event = json!({"Ship": "Python", "Modules": []});
        let ship = derive_imported_ship(&python(), &event).expect("import");
        assert_eq!(ship.display_name(), "Python (Imported)");
    }

    #[test]
    fn import_requires_modules() {
        let err = derive_imported_ship(&python(), &json!({"Ship": "Python"})).unwrap_err();
        assert!(matches!(err, CatalogError::Import(_)));
    }
}
