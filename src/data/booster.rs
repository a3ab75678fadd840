use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::Resistances;

/// Booster variant as written in the catalog. Bonuses are fractions (0.27 = +27%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoosterRecord {
    pub engineering: String,
    pub experimental: String,
    pub shield_strength_bonus: f64,
    pub exp_res_bonus: f64,
    pub kin_res_bonus: f64,
    pub therm_res_bonus: f64,
    #[serde(default)]
    pub can_skip: bool,
    #[serde(default)]
    pub loadout_template: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShieldBoosterVariant {
    pub engineering: String,
    pub experimental: String,
    /// Shield hitpoint bonus as a fraction of generator strength.
    pub hitpoint_bonus: f64,
    pub resistance: Resistances,
    /// Left out of the short list.
    pub can_skip: bool,
    #[serde(skip_serializing)]
    pub loadout_template: Value,
}

/// Fields that influence scoring, compared by bit pattern.
pub type BoosterStatKey = [u64; 4];

impl From<BoosterRecord> for ShieldBoosterVariant {
    fn from(record: BoosterRecord) -> Self {
        ShieldBoosterVariant {
            engineering: record.engineering,
            experimental: record.experimental,
            hitpoint_bonus: record.shield_strength_bonus,
            resistance: Resistances {
                explosive: record.exp_res_bonus,
                kinetic: record.kin_res_bonus,
                thermal: record.therm_res_bonus,
            },
            can_skip: record.can_skip,
            loadout_template: record.loadout_template,
        }
    }
}

impl ShieldBoosterVariant {
    pub fn stat_key(&self) -> BoosterStatKey {
        [
            self.hitpoint_bonus.to_bits(),
            self.resistance.explosive.to_bits(),
            self.resistance.kinetic.to_bits(),
            self.resistance.thermal.to_bits(),
        ]
    }
}

impl std::fmt::Display for ShieldBoosterVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.engineering, self.experimental)
    }
}
