pub mod booster;
pub mod catalog;
pub mod generator;
pub mod import;
pub mod ship;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use booster::{BoosterStatKey, ShieldBoosterVariant};
pub use catalog::{DataCatalog, DEFAULT_CATALOG_PATH};
pub use generator::{GeneratorKind, GeneratorStats, ShieldGenerator};
pub use ship::Ship;

/// Per-damage-type resistance values as fractions (0.3 = 30%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    #[serde(default)]
    pub explosive: f64,
    #[serde(default)]
    pub kinetic: f64,
    #[serde(default)]
    pub thermal: f64,
}

impl Resistances {
    pub const fn new(explosive: f64, kinetic: f64, thermal: f64) -> Self {
        Self {
            explosive,
            kinetic,
            thermal,
        }
    }
}
