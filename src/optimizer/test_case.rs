//! Caller-owned search configuration for one ship.
//!
//! A [TestCase] borrows the catalog and the selected ship. Generator and booster candidate lists
//! are cached and rebuilt only when a setter changes the filters that shape them; the search
//! engine reads the test case and never modifies it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::data::{DataCatalog, Ship, ShieldBoosterVariant, ShieldGenerator};
use crate::error::ConfigError;
use crate::optimizer::loadout_generator::{booster_candidates, generator_candidates, number_of_tests};
use crate::report::format::{format_output_string, OutputLine};
use crate::survivability::{DamageProfile, HitpointBonuses};

const VALID_RATINGS: &str = "ABCDE";

#[derive(Debug, Clone)]
pub struct TestCase<'a> {
    catalog: &'a DataCatalog,
    ship: &'a Ship,
    compatible_classes: (u8, u8),
    class_range: (u8, u8),
    use_prismatics: bool,
    ratings: Option<BTreeSet<char>>,
    short_list: bool,
    generators: Vec<&'a ShieldGenerator>,
    boosters: Vec<&'a ShieldBoosterVariant>,

    /// Boosters per loadout. More than the ship has slots yields an empty candidate space;
    /// [TestCase::set_number_of_boosters] rejects that up front.
    pub number_of_boosters_to_test: usize,
    pub explosive_dps: f64,
    pub kinetic_dps: f64,
    pub thermal_dps: f64,
    pub absolute_dps: f64,
    /// Share of incoming damage that lands, 0.0..=1.0.
    pub damage_effectiveness: f64,
    pub guardian_hitpoints: f64,
    pub scb_hitpoints: f64,
}

impl<'a> TestCase<'a> {
    /// Prefer [DataCatalog::select_ship]; `compatible_classes` must come from
    /// [DataCatalog::compatible_generator_classes] for this ship.
    pub fn new(catalog: &'a DataCatalog, ship: &'a Ship, compatible_classes: (u8, u8)) -> Self {
        let mut test_case = Self {
            catalog,
            ship,
            compatible_classes,
            class_range: (compatible_classes.1, compatible_classes.1),
            use_prismatics: true,
            ratings: None,
            short_list: true,
            generators: Vec::new(),
            boosters: Vec::new(),
            number_of_boosters_to_test: ship.utility_slots(),
            explosive_dps: 0.0,
            kinetic_dps: 0.0,
            thermal_dps: 0.0,
            absolute_dps: 0.0,
            damage_effectiveness: 0.0,
            guardian_hitpoints: 0.0,
            scb_hitpoints: 0.0,
        };
        test_case.rebuild_generators();
        test_case.rebuild_boosters();
        test_case
    }

    pub fn catalog(&self) -> &'a DataCatalog {
        self.catalog
    }

    pub fn ship(&self) -> &'a Ship {
        self.ship
    }

    pub fn compatible_classes(&self) -> (u8, u8) {
        self.compatible_classes
    }

    pub fn class_range(&self) -> (u8, u8) {
        self.class_range
    }

    pub fn use_prismatics(&self) -> bool {
        self.use_prismatics
    }

    pub fn short_list(&self) -> bool {
        self.short_list
    }

    pub fn rating_filter(&self) -> Option<&BTreeSet<char>> {
        self.ratings.as_ref()
    }

    /// Candidate generators in generation order.
    pub fn generators(&self) -> &[&'a ShieldGenerator] {
        &self.generators
    }

    pub fn boosters(&self) -> &[&'a ShieldBoosterVariant] {
        &self.boosters
    }

    pub fn set_generator_class(&mut self, module_class: u8) -> Result<(), ConfigError> {
        self.set_generator_class_range(module_class, module_class)
    }

    pub fn set_generator_class_range(&mut self, min: u8, max: u8) -> Result<(), ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidClassRange { min, max });
        }
        let (lowest, highest) = self.compatible_classes;
        for class in [min, max] {
            if class < lowest || class > highest {
                return Err(ConfigError::GeneratorClassOutOfRange {
                    class,
                    min: lowest,
                    max: highest,
                });
            }
        }
        if self.class_range != (min, max) {
            self.class_range = (min, max);
            self.rebuild_generators();
        }
        Ok(())
    }

    pub fn set_prismatics(&mut self, use_prismatics: bool) {
        if self.use_prismatics != use_prismatics {
            self.use_prismatics = use_prismatics;
            self.rebuild_generators();
        }
    }

    /// Only test generators with one of these ratings.
    pub fn set_rating_filter<I>(&mut self, ratings: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut filter = BTreeSet::new();
        for rating in ratings {
            let rating = rating.to_ascii_uppercase();
            if !VALID_RATINGS.contains(rating) {
                return Err(ConfigError::UnknownRating { rating });
            }
            filter.insert(rating);
        }
        if self.ratings.as_ref() != Some(&filter) {
            self.ratings = Some(filter);
            self.rebuild_generators();
        }
        Ok(())
    }

    pub fn clear_rating_filter(&mut self) {
        if self.ratings.take().is_some() {
            self.rebuild_generators();
        }
    }

    pub fn set_short_list(&mut self, short_list: bool) {
        if self.short_list != short_list {
            self.short_list = short_list;
            self.rebuild_boosters();
        }
    }

    pub fn set_number_of_boosters(&mut self, count: usize) -> Result<(), ConfigError> {
        let slots = self.ship.utility_slots();
        if count > slots {
            return Err(ConfigError::TooManyBoosters {
                requested: count,
                slots,
            });
        }
        self.number_of_boosters_to_test = count;
        Ok(())
    }

    pub fn set_damage_profile(&mut self, damage: DamageProfile) -> Result<(), ConfigError> {
        check_damage(&damage)?;
        self.explosive_dps = damage.explosive;
        self.kinetic_dps = damage.kinetic;
        self.thermal_dps = damage.thermal;
        self.absolute_dps = damage.absolute;
        self.damage_effectiveness = damage.effectiveness;
        Ok(())
    }

    pub fn set_hitpoint_bonuses(&mut self, bonuses: HitpointBonuses) -> Result<(), ConfigError> {
        check_bonuses(&bonuses)?;
        self.guardian_hitpoints = bonuses.guardian;
        self.scb_hitpoints = bonuses.shield_cell_bank;
        Ok(())
    }

    pub fn damage_profile(&self) -> DamageProfile {
        DamageProfile {
            explosive: self.explosive_dps,
            kinetic: self.kinetic_dps,
            thermal: self.thermal_dps,
            absolute: self.absolute_dps,
            effectiveness: self.damage_effectiveness,
        }
    }

    pub fn hitpoint_bonuses(&self) -> HitpointBonuses {
        HitpointBonuses {
            guardian: self.guardian_hitpoints,
            shield_cell_bank: self.scb_hitpoints,
        }
    }

    /// Recheck the public attacker/defender fields before a search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_damage(&self.damage_profile())?;
        check_bonuses(&self.hitpoint_bonuses())
    }

    pub fn number_of_tests(&self, prelim: Option<usize>) -> u64 {
        number_of_tests(self, prelim)
    }

    pub fn summary(&self) -> String {
        let (min_class, max_class) = self.class_range;
        let class = if min_class == max_class {
            format!("[{min_class}]")
        } else {
            format!("[{min_class}-{max_class}]")
        };
        let mut lines = vec![
            OutputLine::text("------------ TEST SETUP ------------"),
            OutputLine::pair("Ship Type: ", format!("[{}]", self.ship.name)),
        ];
        if let Some(custom_name) = &self.ship.custom_name {
            lines.push(OutputLine::pair("Custom name: ", format!("[{custom_name}]")));
        }
        lines.extend([
            OutputLine::pair("Shield Generator Size: ", class),
            OutputLine::pair(
                "Shield Booster Count: ",
                format!("[{}]", self.number_of_boosters_to_test),
            ),
            OutputLine::pair("Shield Cell Bank: ", format!("[{}]", self.scb_hitpoints)),
            OutputLine::pair(
                "Guardian Shield Reinforcement: ",
                format!("[{}]", self.guardian_hitpoints),
            ),
            OutputLine::pair(
                "Access to Prismatic Shields: ",
                format!("[{}]", if self.use_prismatics { "Yes" } else { "No" }),
            ),
            OutputLine::pair("Explosive DPS: ", format!("[{}]", self.explosive_dps)),
            OutputLine::pair("Kinetic DPS: ", format!("[{}]", self.kinetic_dps)),
            OutputLine::pair("Thermal DPS: ", format!("[{}]", self.thermal_dps)),
            OutputLine::pair("Absolute DPS: ", format!("[{}]", self.absolute_dps)),
            OutputLine::pair(
                "Damage Effectiveness: ",
                format!("[{:.0}%]", self.damage_effectiveness * 100.0),
            ),
            OutputLine::text(""),
        ]);
        format_output_string(&lines)
    }

    fn rebuild_generators(&mut self) {
        self.generators = generator_candidates(
            self.catalog,
            self.ship,
            self.class_range,
            self.use_prismatics,
            self.ratings.as_ref(),
        );
        debug!(
            ship = %self.ship.display_name(),
            classes = ?self.class_range,
            prismatics = self.use_prismatics,
            generators = self.generators.len(),
            "rebuilt generator candidates"
        );
    }

    fn rebuild_boosters(&mut self) {
        self.boosters = booster_candidates(self.catalog, self.short_list);
        debug!(
            short_list = self.short_list,
            boosters = self.boosters.len(),
            "rebuilt booster candidates"
        );
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn check_damage(damage: &DamageProfile) -> Result<(), ConfigError> {
    check_non_negative("explosive DPS", damage.explosive)?;
    check_non_negative("kinetic DPS", damage.kinetic)?;
    check_non_negative("thermal DPS", damage.thermal)?;
    check_non_negative("absolute DPS", damage.absolute)?;
    if !(0.0..=1.0).contains(&damage.effectiveness) {
        return Err(ConfigError::DamageEffectivenessOutOfRange(damage.effectiveness));
    }
    Ok(())
}

fn check_bonuses(bonuses: &HitpointBonuses) -> Result<(), ConfigError> {
    check_non_negative("guardian hitpoints", bonuses.guardian)?;
    check_non_negative("shield cell bank hitpoints", bonuses.shield_cell_bank)
}
