use serde::Serialize;

use crate::data::{Ship, ShieldBoosterVariant, ShieldGenerator};
use crate::report::format::{format_output_string, OutputLine};
use crate::survivability::SurvivabilityMetrics;

/// A shield generator and its boosters on a ship. Owns copies of everything it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loadout {
    pub ship: Ship,
    pub generator: ShieldGenerator,
    pub boosters: Vec<ShieldBoosterVariant>,
    /// Generator strength on this hull, before boosters.
    pub shield_strength: f64,
}

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub loadout: Loadout,
    pub metrics: SurvivabilityMetrics,
    pub combinations_evaluated: u64,
    pub guardian_hitpoints: f64,
    pub scb_hitpoints: f64,
    /// Set when only the best generators of a preliminary pass were searched.
    pub preliminary: bool,
}

impl TestResult {
    pub fn summary(&self) -> String {
        let metrics = &self.metrics;
        let generator = &self.loadout.generator;
        let mut lines = vec![OutputLine::text("------------ TEST RESULTS ------------")];

        if metrics.depletes() {
            lines.push(OutputLine::pair(
                "Survival Time [s]: ",
                format!("[{:.2}]", metrics.survival_time),
            ));
        } else {
            lines.push(OutputLine::pair("Survival Time [s]: ", "[Didn't die]"));
        }
        lines.push(OutputLine::pair(
            "Drain Rate [MJ/s]: ",
            format!("[{:.2}]", metrics.incoming_dps),
        ));
        lines.push(OutputLine::pair(
            "Shield Generator: ",
            format!(
                "[{}] - [{}] - [{}]",
                generator.name,
                generator.engineered_name(),
                generator.experimental_name()
            ),
        ));
        for (index, booster) in self.loadout.boosters.iter().enumerate() {
            let label = if index == 0 {
                "Shield Booster 1: ".to_string()
            } else {
                format!("{}: ", index + 1)
            };
            lines.push(OutputLine::pair(
                label,
                format!("[{}] - [{}]", booster.engineering, booster.experimental),
            ));
        }

        let hitpoints = metrics.total_hitpoints;
        let resistance = |value: f64, effective: f64| format!("[{:.2}] ({effective:.0} MJ)", value * 100.0);
        lines.extend([
            OutputLine::text(""),
            OutputLine::pair("Shield Hitpoints [MJ]: ", format!("[{hitpoints:.2}]")),
            OutputLine::pair(
                "Shield Regen [MJ/s]: ",
                format!(
                    "[{}] ({:.2}s from 50%)",
                    generator.stats.regen,
                    hitpoints / (2.0 * generator.stats.regen)
                ),
            ),
            OutputLine::pair(
                "Explosive Resistance [%]: ",
                resistance(metrics.resistances.explosive, metrics.effective_hitpoints.explosive),
            ),
            OutputLine::pair(
                "Kinetic Resistance [%]: ",
                resistance(metrics.resistances.kinetic, metrics.effective_hitpoints.kinetic),
            ),
            OutputLine::pair(
                "Thermal Resistance [%]: ",
                resistance(metrics.resistances.thermal, metrics.effective_hitpoints.thermal),
            ),
        ]);
        if self.preliminary {
            lines.push(OutputLine::text("(quick test: only the best generators were searched)"));
        }
        format_output_string(&lines)
    }
}
