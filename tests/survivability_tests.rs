use proptest::prelude::*;
use serde_json::Value;

use shieldtester::data::{Resistances, ShieldBoosterVariant};
use shieldtester::survivability::{
    score, BoosterBonuses, DamageProfile, HitpointBonuses, ModelParameters, ShieldInputs,
};

fn booster(hitpoints: f64, explosive: f64, kinetic: f64, thermal: f64) -> ShieldBoosterVariant {
    ShieldBoosterVariant {
        engineering: "Test".to_string(),
        experimental: "Test".to_string(),
        hitpoint_bonus: hitpoints,
        resistance: Resistances::new(explosive, kinetic, thermal),
        can_skip: false,
        loadout_template: Value::Null,
    }
}

fn booster_strategy() -> impl Strategy<Value = ShieldBoosterVariant> {
    (0.0..0.7f64, 0.0..0.4f64, 0.0..0.4f64, 0.0..0.4f64)
        .prop_map(|(hp, exp, kin, therm)| booster(hp, exp, kin, therm))
}

fn shield() -> ShieldInputs {
    ShieldInputs {
        strength: 600.0,
        generator_resistances: Resistances::new(0.5, 0.4, -0.2),
        ship_resistances: Resistances::default(),
        regen: 2.4,
    }
}

fn damage_strategy() -> impl Strategy<Value = DamageProfile> {
    (0.0..200.0f64, 0.0..200.0f64, 0.0..200.0f64, 0.0..50.0f64, 0.0..=1.0f64).prop_map(
        |(explosive, kinetic, thermal, absolute, effectiveness)| DamageProfile {
            explosive,
            kinetic,
            thermal,
            absolute,
            effectiveness,
        },
    )
}

proptest! {
    #[test]
    fn adding_a_booster_never_raises_remaining_damage(
        boosters in prop::collection::vec(booster_strategy(), 0..8),
        extra in booster_strategy(),
    ) {
        let params = ModelParameters::default();
        let before = BoosterBonuses::stack(&boosters, &params);
        let after = BoosterBonuses::stack(boosters.iter().chain([&extra]), &params);
        prop_assert!(after.explosive <= before.explosive);
        prop_assert!(after.kinetic <= before.kinetic);
        prop_assert!(after.thermal <= before.thermal);
        prop_assert!(after.hitpoint_multiplier >= before.hitpoint_multiplier);
    }

    #[test]
    fn diminishing_returns_bound_the_stack(
        boosters in prop::collection::vec(booster_strategy(), 0..8),
    ) {
        let params = ModelParameters::default();
        let stacked = BoosterBonuses::stack(&boosters, &params);
        let floor = params.stacking_threshold * (1.0 - params.stacking_factor);
        for remaining in [stacked.explosive, stacked.kinetic, stacked.thermal] {
            prop_assert!(remaining >= floor);
            prop_assert!(remaining <= 1.0);
        }
    }

    #[test]
    fn adding_a_booster_never_shortens_survival(
        boosters in prop::collection::vec(booster_strategy(), 0..6),
        extra in booster_strategy(),
        damage in damage_strategy(),
    ) {
        let params = ModelParameters::default();
        let bonuses = HitpointBonuses::default();
        let fitted: Vec<&ShieldBoosterVariant> = boosters.iter().collect();
        let mut more = fitted.clone();
        more.push(&extra);

        let before = score(&shield(), &fitted, &damage, &bonuses, &params);
        let after = score(&shield(), &more, &damage, &bonuses, &params);
        prop_assert!(after.incoming_dps <= before.incoming_dps);
        prop_assert!(after.survival_time >= before.survival_time);
    }

    #[test]
    fn survival_time_matches_its_definition(
        boosters in prop::collection::vec(booster_strategy(), 0..4),
        damage in damage_strategy(),
        scb in 0.0..500.0f64,
    ) {
        let params = ModelParameters::default();
        let bonuses = HitpointBonuses { guardian: 0.0, shield_cell_bank: scb };
        let fitted: Vec<&ShieldBoosterVariant> = boosters.iter().collect();
        let metrics = score(&shield(), &fitted, &damage, &bonuses, &params);
        if metrics.depletes() {
            let expected = (metrics.total_hitpoints + scb) / metrics.incoming_dps;
            prop_assert!((metrics.survival_time - expected).abs() <= 1e-9 * expected.max(1.0));
        } else {
            prop_assert!(metrics.survival_time.is_infinite());
        }
    }
}
