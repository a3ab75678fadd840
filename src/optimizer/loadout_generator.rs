//! Candidate generators, candidate boosters, and the combined search space.
//!
//! The space is booster-major: every booster multiset (by lexicographic rank) is crossed with
//! every candidate generator, so candidate `booster_rank * generator_count + generator_index`
//! has a stable position independent of how the search splits the work.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::data::{DataCatalog, GeneratorKind, ShieldBoosterVariant, ShieldGenerator, Ship};
use crate::optimizer::combinations::multichoose;
use crate::optimizer::ranking::{rank_candidates, RankedCandidate};
use crate::optimizer::TestCase;
use crate::survivability::{score_stacked, BoosterBonuses, ModelParameters, ShieldInputs};

/// Engineered generators of every class in `class_range`, bi-weave then normal then
/// (optionally) prismatic within each class. Generators whose maximum mass the hull reaches
/// cannot be fitted and are left out.
pub fn generator_candidates<'c>(
    catalog: &'c DataCatalog,
    ship: &Ship,
    class_range: (u8, u8),
    use_prismatics: bool,
    ratings: Option<&BTreeSet<char>>,
) -> Vec<&'c ShieldGenerator> {
    let (min_class, max_class) = class_range;
    let mut generators = Vec::new();
    for module_class in min_class..=max_class {
        for kind in GeneratorKind::ALL {
            if kind == GeneratorKind::Prismatic && !use_prismatics {
                continue;
            }
            generators.extend(
                catalog
                    .generators(kind, module_class)
                    .iter()
                    .filter(|generator| generator.stats.maxmass > ship.hull_mass)
                    .filter(|generator| ratings.map_or(true, |set| set.contains(&generator.rating))),
            );
        }
    }
    generators
}

/// Catalog boosters; the short list drops skippable entries and keeps the first of every
/// group with identical stats.
pub fn booster_candidates(catalog: &DataCatalog, short_list: bool) -> Vec<&ShieldBoosterVariant> {
    if !short_list {
        return catalog.boosters().iter().collect();
    }
    let mut seen = HashSet::new();
    catalog
        .boosters()
        .iter()
        .filter(|booster| !booster.can_skip)
        .filter(|booster| seen.insert(booster.stat_key()))
        .collect()
}

/// Booster multisets the test case asks for; zero when the request cannot be fitted.
pub fn booster_combination_count(test_case: &TestCase<'_>) -> u64 {
    let requested = test_case.number_of_boosters_to_test;
    if requested > test_case.ship().utility_slots() {
        return 0;
    }
    multichoose(test_case.boosters().len(), requested)
}

/// Closed-form size of the search space. With `prelim`, only that many generators take part.
pub fn number_of_tests(test_case: &TestCase<'_>, prelim: Option<usize>) -> u64 {
    let generators = test_case.generators().len();
    let generators = match prelim {
        Some(limit) if limit > 0 => generators.min(limit),
        _ => generators,
    };
    booster_combination_count(test_case).saturating_mul(generators as u64)
}

/// Everything a search worker reads: resolved generators, boosters, and scoring inputs.
#[derive(Debug, Clone)]
pub struct CandidateSpace<'a> {
    pub generators: Vec<&'a ShieldGenerator>,
    /// Parallel to `generators`.
    pub shields: Vec<ShieldInputs>,
    pub boosters: Vec<&'a ShieldBoosterVariant>,
    pub boosters_per_loadout: usize,
    pub booster_combinations: u64,
}

impl<'a> CandidateSpace<'a> {
    pub fn new(test_case: &TestCase<'a>, prelim: Option<usize>, params: &ModelParameters) -> Self {
        let ship = test_case.ship();
        let mut generators = test_case.generators().to_vec();
        let mut shields: Vec<ShieldInputs> = generators
            .iter()
            .map(|generator| ShieldInputs::new(ship, generator))
            .collect();

        if let Some(limit) = prelim.filter(|limit| *limit > 0 && *limit < generators.len()) {
            let kept = preliminary_selection(test_case, &generators, &shields, limit, params);
            generators = kept.iter().map(|&index| generators[index]).collect();
            shields = kept.iter().map(|&index| shields[index]).collect();
            debug!(kept = generators.len(), limit, "preliminary generator selection");
        }

        Self {
            generators,
            shields,
            boosters: test_case.boosters().to_vec(),
            boosters_per_loadout: test_case.number_of_boosters_to_test,
            booster_combinations: booster_combination_count(test_case),
        }
    }

    pub fn len(&self) -> u64 {
        self.booster_combinations
            .saturating_mul(self.generators.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Indices of the `limit` best generators scored without boosters, in generation order.
pub fn preliminary_selection(
    test_case: &TestCase<'_>,
    generators: &[&ShieldGenerator],
    shields: &[ShieldInputs],
    limit: usize,
    params: &ModelParameters,
) -> Vec<usize> {
    let damage = test_case.damage_profile();
    let bonuses = test_case.hitpoint_bonuses();
    let candidates: Vec<RankedCandidate> = generators
        .iter()
        .zip(shields)
        .enumerate()
        .map(|(index, (generator, shield))| RankedCandidate {
            metrics: score_stacked(shield, &BoosterBonuses::NONE, &damage, &bonuses, params),
            generator_class: generator.module_class,
            generator_index: index,
            booster_rank: 0,
            order_index: index as u64,
        })
        .collect();

    let mut kept: Vec<usize> = rank_candidates(candidates)
        .iter()
        .take(limit)
        .map(|candidate| candidate.generator_index)
        .collect();
    kept.sort_unstable();
    kept
}
