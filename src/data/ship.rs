//! Ship data: hull, utility slots and internal layout as stored in the catalog.
//! `ShipRecord` is the on-disk shape; `Ship` is the resolved, read-only view the engine uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::generator::GeneratorStats;
use crate::data::Resistances;

/// Ship record as written in the catalog JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipRecord {
    #[serde(rename = "ship")]
    pub name: String,
    pub symbol: String,
    #[serde(rename = "baseShieldStrength")]
    pub base_shield_strength: f64,
    #[serde(rename = "hullMass")]
    pub hull_mass: f64,
    pub utility_slots: u8,
    /// Largest internal slot a shield generator may use.
    pub highest_internal: u8,
    pub slot_layout: SlotLayout,
    #[serde(default)]
    pub base_resistances: Resistances,
    /// Journal `Loadout` event used as the starting point for export links.
    #[serde(default)]
    pub loadout_template: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotLayout {
    pub internal: Vec<InternalSlot>,
}

/// Internal slots are either a plain class or a restricted slot (e.g. "military")
/// that cannot hold a shield generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InternalSlot {
    Standard(u8),
    Restricted(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ship {
    pub name: String,
    /// Set for ships created from an imported loadout ("ShipName (ShipIdent)").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub symbol: String,
    pub base_shield_strength: f64,
    pub hull_mass: f64,
    /// Free utility slot numbers (1-based), ascending.
    pub utility_slots_free: Vec<u8>,
    pub highest_internal: u8,
    /// Internal slot number (1-based) -> slot class. Restricted slots are left out.
    pub internal_slots: BTreeMap<u8, u8>,
    pub base_resistances: Resistances,
    #[serde(skip_serializing)]
    pub loadout_template: Value,
}

impl From<ShipRecord> for Ship {
    fn from(record: ShipRecord) -> Self {
        let internal_slots = record
            .slot_layout
            .internal
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                InternalSlot::Standard(class) => Some((index as u8 + 1, *class)),
                InternalSlot::Restricted(_) => None,
            })
            .collect();

        Ship {
            name: record.name,
            custom_name: None,
            symbol: record.symbol,
            base_shield_strength: record.base_shield_strength,
            hull_mass: record.hull_mass,
            utility_slots_free: (1..=record.utility_slots).collect(),
            highest_internal: record.highest_internal,
            internal_slots,
            base_resistances: record.base_resistances,
            loadout_template: record.loadout_template,
        }
    }
}

impl Ship {
    pub fn utility_slots(&self) -> usize {
        self.utility_slots_free.len()
    }

    /// Custom name for imported ships, catalog name otherwise.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }

    /// First internal slot (by slot number, descending when `reverse`) able to hold a module of
    /// `module_class`, capped at the ship's highest internal class. Returns `(slot, slot_class)`.
    pub fn available_internal_slot(&self, module_class: u8, reverse: bool) -> Option<(u8, u8)> {
        let needed = module_class.min(self.highest_internal);
        let fits = |(slot, class): (&u8, &u8)| (*class >= needed).then_some((*slot, *class));
        if reverse {
            self.internal_slots.iter().rev().find_map(fits)
        } else {
            self.internal_slots.iter().find_map(fits)
        }
    }

    /// Shield strength a generator provides on this hull (mass-curve interpolation).
    pub fn shield_strength(&self, stats: &GeneratorStats) -> f64 {
        let mass_range = stats.maxmass - stats.minmass;
        let xnorm = ((stats.maxmass - self.hull_mass) / mass_range).min(1.0);
        let exponent = ((stats.optmul - stats.minmul) / (stats.maxmul - stats.minmul)).ln()
            / ((stats.maxmass - stats.optmass) / mass_range).min(1.0).ln();
        let ynorm = xnorm.powf(exponent);
        let multiplier = stats.minmul + ynorm * (stats.maxmul - stats.minmul);
        round4(self.base_shield_strength * multiplier)
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(internal: Vec<InternalSlot>) -> ShipRecord {
        ShipRecord {
            name: "Python".to_string(),
            symbol: "Python".to_string(),
            base_shield_strength: 260.0,
            hull_mass: 350.0,
            utility_slots: 4,
            highest_internal: 6,
            slot_layout: SlotLayout { internal },
            base_resistances: Resistances::default(),
            loadout_template: Value::Null,
        }
    }

    fn stats() -> GeneratorStats {
        GeneratorStats {
            integrity: 150.0,
            power: 1.86,
            explres: 0.5,
            kinres: 0.4,
            thermres: -0.2,
            regen: 2.8,
            brokenregen: 4.6,
            distdraw: 0.6,
            minmass: 270.0,
            optmass: 540.0,
            maxmass: 1350.0,
            minmul: 0.7,
            optmul: 1.2,
            maxmul: 1.7,
        }
    }

    #[test]
    fn restricted_internal_slots_are_skipped() {
        let ship = Ship::from(record(vec![
            InternalSlot::Standard(6),
            InternalSlot::Restricted("military".to_string()),
            InternalSlot::Standard(5),
        ]));
        assert_eq!(ship.internal_slots.len(), 2);
        assert_eq!(ship.internal_slots.get(&3), Some(&5));
        assert_eq!(ship.utility_slots_free, vec![1, 2, 3, 4]);
    }

    #[test]
    fn available_internal_slot_respects_direction() {
        let ship = Ship::from(record(vec![
            InternalSlot::Standard(6),
            InternalSlot::Standard(5),
            InternalSlot::Standard(5),
            InternalSlot::Standard(3),
        ]));
        assert_eq!(ship.available_internal_slot(6, false), Some((1, 6)));
        assert_eq!(ship.available_internal_slot(5, true), Some((3, 5)));
        assert_eq!(ship.available_internal_slot(2, true), Some((4, 3)));
    }

    #[test]
    fn shield_strength_matches_mass_curve_at_optimal_mass() {
        let mut ship = Ship::from(record(vec![InternalSlot::Standard(6)]));
        ship.hull_mass = 540.0;
        let strength = ship.shield_strength(&stats());
        assert!((strength - 260.0 * 1.2).abs() < 1e-3, "got {strength}");
    }

    #[test]
    fn lighter_hull_gets_more_shield() {
        let ship = Ship::from(record(vec![InternalSlot::Standard(6)]));
        let mut heavy = ship.clone();
        heavy.hull_mass = 1000.0;
        assert!(ship.shield_strength(&stats()) > heavy.shield_strength(&stats()));
    }
}
