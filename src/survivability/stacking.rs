use crate::data::ShieldBoosterVariant;
use crate::survivability::ModelParameters;

/// Combined effect of a booster set: remaining damage fraction per type after diminishing
/// returns, and the shield hitpoint multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoosterBonuses {
    pub explosive: f64,
    pub kinetic: f64,
    pub thermal: f64,
    pub hitpoint_multiplier: f64,
}

impl BoosterBonuses {
    /// No boosters fitted.
    pub const NONE: BoosterBonuses = BoosterBonuses {
        explosive: 1.0,
        kinetic: 1.0,
        thermal: 1.0,
        hitpoint_multiplier: 1.0,
    };

    pub fn stack<'b, I>(boosters: I, params: &ModelParameters) -> Self
    where
        I: IntoIterator<Item = &'b ShieldBoosterVariant>,
    {
        let mut stacked = Self::NONE;
        for booster in boosters {
            stacked.explosive *= 1.0 - booster.resistance.explosive;
            stacked.kinetic *= 1.0 - booster.resistance.kinetic;
            stacked.thermal *= 1.0 - booster.resistance.thermal;
            stacked.hitpoint_multiplier += booster.hitpoint_bonus;
        }
        stacked.explosive = diminish(stacked.explosive, params);
        stacked.kinetic = diminish(stacked.kinetic, params);
        stacked.thermal = diminish(stacked.thermal, params);
        stacked
    }

    /// Hitpoint bonus on top of the generator's own strength (0.5 = +50%).
    pub fn hitpoint_bonus(&self) -> f64 {
        self.hitpoint_multiplier - 1.0
    }
}

/// Below the threshold only `stacking_factor` of further reduction applies.
pub fn diminish(remaining: f64, params: &ModelParameters) -> f64 {
    let threshold = params.stacking_threshold;
    if remaining < threshold {
        threshold - (threshold - remaining) * params.stacking_factor
    } else {
        remaining
    }
}
