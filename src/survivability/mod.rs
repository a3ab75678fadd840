//! Steady-state shield survivability: how long a shield holds against a damage profile.
//!
//! Everything here is a pure function of its inputs; the search engine calls it millions of
//! times from many threads.

pub mod model;
pub mod stacking;

pub use model::{
    score, score_stacked, DamageProfile, EffectiveHitpoints, GuardianPlacement, HitpointBonuses,
    ModelParameters, ShieldInputs, SurvivabilityMetrics,
};
pub use stacking::BoosterBonuses;
