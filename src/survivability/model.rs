use serde::{Deserialize, Serialize};

use crate::data::{Resistances, Ship, ShieldBoosterVariant, ShieldGenerator};
use crate::survivability::BoosterBonuses;

/// Incoming damage per second by type, and the share of it that actually lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    pub explosive: f64,
    pub kinetic: f64,
    pub thermal: f64,
    pub absolute: f64,
    /// 0.0..=1.0; also the share of time the shield cannot regenerate.
    pub effectiveness: f64,
}

/// Flat hitpoint sources outside the generator/booster stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitpointBonuses {
    pub guardian: f64,
    pub shield_cell_bank: f64,
}

/// Where the guardian shield reinforcement enters the hitpoint calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianPlacement {
    /// Added after the booster multiplier.
    #[default]
    Flat,
    /// Added to the generator strength, so boosters multiply it too.
    Boosted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Booster products below this remaining fraction are subject to diminishing returns.
    pub stacking_threshold: f64,
    /// Share of the reduction past the threshold that still applies.
    pub stacking_factor: f64,
    /// Resistance cap per damage type.
    pub max_resistance: f64,
    pub guardian_placement: GuardianPlacement,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            stacking_threshold: 0.7,
            stacking_factor: 0.5,
            max_resistance: 0.99,
            guardian_placement: GuardianPlacement::Flat,
        }
    }
}

/// Per-generator values the model needs, resolved once against the ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldInputs {
    pub strength: f64,
    pub generator_resistances: Resistances,
    pub ship_resistances: Resistances,
    pub regen: f64,
}

impl ShieldInputs {
    pub fn new(ship: &Ship, generator: &ShieldGenerator) -> Self {
        Self {
            strength: ship.shield_strength(&generator.stats),
            generator_resistances: Resistances::new(
                generator.stats.explres,
                generator.stats.kinres,
                generator.stats.thermres,
            ),
            ship_resistances: ship.base_resistances,
            regen: generator.stats.regen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveHitpoints {
    pub absolute: f64,
    pub explosive: f64,
    pub kinetic: f64,
    pub thermal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivabilityMetrics {
    /// Seconds until the shield drops; `f64::INFINITY` when it never does.
    pub survival_time: f64,
    /// Net drain in MJ/s after regeneration. Zero or negative means the shield holds.
    pub incoming_dps: f64,
    /// Generator strength times the booster multiplier (guardian included when boosted).
    pub shield_hitpoints: f64,
    /// Hitpoints contributed by boosters alone.
    pub booster_hitpoints: f64,
    /// Shield pool before shield cell banks: shield hitpoints plus a flat guardian bonus.
    pub total_hitpoints: f64,
    /// Regeneration while under fire.
    pub regen: f64,
    pub resistances: Resistances,
    pub effective_hitpoints: EffectiveHitpoints,
}

impl SurvivabilityMetrics {
    pub fn depletes(&self) -> bool {
        self.incoming_dps > 0.0
    }

    /// False for NaN anywhere, or an infinite survival time on a shield that does deplete.
    pub fn is_finite(&self) -> bool {
        self.incoming_dps.is_finite()
            && self.total_hitpoints.is_finite()
            && self.booster_hitpoints.is_finite()
            && !self.survival_time.is_nan()
            && (self.survival_time.is_finite() || !self.depletes())
    }
}

pub fn score(
    shield: &ShieldInputs,
    boosters: &[&ShieldBoosterVariant],
    damage: &DamageProfile,
    bonuses: &HitpointBonuses,
    params: &ModelParameters,
) -> SurvivabilityMetrics {
    let stacked = BoosterBonuses::stack(boosters.iter().copied(), params);
    score_stacked(shield, &stacked, damage, bonuses, params)
}

/// [score] with the booster set already stacked; the search stacks once per booster combination.
pub fn score_stacked(
    shield: &ShieldInputs,
    stacked: &BoosterBonuses,
    damage: &DamageProfile,
    bonuses: &HitpointBonuses,
    params: &ModelParameters,
) -> SurvivabilityMetrics {
    let floor = 1.0 - params.max_resistance;
    let remaining = |ship: f64, generator: f64, boosters: f64| {
        ((1.0 - ship) * (1.0 - generator) * boosters).max(floor)
    };
    let ship_res = &shield.ship_resistances;
    let gen_res = &shield.generator_resistances;
    let rem_explosive = remaining(ship_res.explosive, gen_res.explosive, stacked.explosive);
    let rem_kinetic = remaining(ship_res.kinetic, gen_res.kinetic, stacked.kinetic);
    let rem_thermal = remaining(ship_res.thermal, gen_res.thermal, stacked.thermal);

    let (base, flat_guardian) = match params.guardian_placement {
        GuardianPlacement::Flat => (shield.strength, bonuses.guardian),
        GuardianPlacement::Boosted => (shield.strength + bonuses.guardian, 0.0),
    };
    let shield_hitpoints = base * stacked.hitpoint_multiplier;
    let booster_hitpoints = base * stacked.hitpoint_bonus();
    let total_hitpoints = shield_hitpoints + flat_guardian;

    let regen = shield.regen * (1.0 - damage.effectiveness);
    let incoming_dps = damage.effectiveness
        * (damage.explosive * rem_explosive
            + damage.kinetic * rem_kinetic
            + damage.thermal * rem_thermal
            + damage.absolute)
        - regen;

    let survival_time = if incoming_dps > 0.0 {
        (total_hitpoints + bonuses.shield_cell_bank) / incoming_dps
    } else {
        f64::INFINITY
    };

    SurvivabilityMetrics {
        survival_time,
        incoming_dps,
        shield_hitpoints,
        booster_hitpoints,
        total_hitpoints,
        regen,
        resistances: Resistances::new(1.0 - rem_explosive, 1.0 - rem_kinetic, 1.0 - rem_thermal),
        effective_hitpoints: EffectiveHitpoints {
            absolute: total_hitpoints,
            explosive: total_hitpoints / rem_explosive,
            kinetic: total_hitpoints / rem_kinetic,
            thermal: total_hitpoints / rem_thermal,
        },
    }
}
