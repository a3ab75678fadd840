//! Parallel exhaustive search over the candidate space.
//!
//! The booster-combination rank space is cut into one contiguous chunk per worker. Each worker
//! unranks its first combination, walks its chunk, and keeps only its local best; the local
//! bests are reduced with the same total order afterwards, so the winner does not depend on
//! worker count or completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, SearchError};
use crate::optimizer::combinations::{advance, unrank};
use crate::optimizer::loadout_generator::{number_of_tests, CandidateSpace};
use crate::optimizer::ranking::{keep_best, RankedCandidate};
use crate::optimizer::result::{Loadout, TestResult};
use crate::optimizer::TestCase;
use crate::parallel::{batch_ranges, CancelToken, Progress, WorkerPool};
use crate::survivability::{score_stacked, BoosterBonuses, DamageProfile, HitpointBonuses, ModelParameters};

/// Booster combinations scored between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    /// Requested workers; 0 uses every core.
    pub cores: usize,
    /// Ceiling on workers regardless of `cores`; 0 for none.
    pub max_cores: usize,
    /// Search only the best `n` generators of an unboosted pre-pass.
    pub prelim: Option<usize>,
    pub params: ModelParameters,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchHooks<'h> {
    pub progress: Option<&'h Progress>,
    pub cancel: Option<&'h CancelToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Completed(TestResult),
    Cancelled,
}

struct ChunkResult {
    best: Option<RankedCandidate>,
    evaluated: u64,
}

struct Worker<'s, 'a> {
    space: &'s CandidateSpace<'a>,
    damage: DamageProfile,
    bonuses: HitpointBonuses,
    params: ModelParameters,
    hooks: SearchHooks<'s>,
    abort: &'s AtomicBool,
}

impl Worker<'_, '_> {
    fn should_stop(&self) -> bool {
        self.abort.load(Ordering::Relaxed) || self.hooks.cancel.is_some_and(CancelToken::is_cancelled)
    }

    fn report(&self, scored: u64) {
        if let Some(progress) = self.hooks.progress {
            progress.advance(scored);
        }
    }

    fn run(&self, start: u64, end: u64) -> std::result::Result<ChunkResult, SearchError> {
        let space = self.space;
        let per_combination = space.generators.len() as u64;
        let mut best = None;
        let mut evaluated = 0;
        let mut pending = 0;
        let mut combination = unrank(start, space.boosters.len(), space.boosters_per_loadout);

        for rank in start..end {
            if (rank - start) % CANCEL_CHECK_INTERVAL == 0 {
                self.report(pending);
                pending = 0;
                if self.should_stop() {
                    break;
                }
            }
            if rank > start {
                advance(&mut combination, space.boosters.len());
            }

            let stacked = BoosterBonuses::stack(
                combination.iter().map(|&index| space.boosters[index]),
                &self.params,
            );
            for (generator_index, shield) in space.shields.iter().enumerate() {
                let metrics = score_stacked(shield, &stacked, &self.damage, &self.bonuses, &self.params);
                if !metrics.is_finite() {
                    self.abort.store(true, Ordering::Relaxed);
                    return Err(SearchError::NonFiniteScore {
                        generator: space.generators[generator_index].to_string(),
                        boosters: combination.clone(),
                    });
                }
                keep_best(
                    &mut best,
                    RankedCandidate {
                        metrics,
                        generator_class: space.generators[generator_index].module_class,
                        generator_index,
                        booster_rank: rank,
                        order_index: rank * per_combination + generator_index as u64,
                    },
                );
            }
            evaluated += per_combination;
            pending += per_combination;
        }
        self.report(pending);
        debug!(start, end, evaluated, "search chunk finished");
        Ok(ChunkResult { best, evaluated })
    }
}

/// Search the whole space and return the best loadout.
pub fn compute(test_case: &TestCase<'_>, options: &SearchOptions) -> Result<TestResult> {
    match compute_with_hooks(test_case, options, SearchHooks::default())? {
        SearchOutcome::Completed(result) => Ok(result),
        SearchOutcome::Cancelled => Err(Error::Cancelled),
    }
}

/// [compute] with progress reporting and cooperative cancellation.
pub fn compute_with_hooks(
    test_case: &TestCase<'_>,
    options: &SearchOptions,
    hooks: SearchHooks<'_>,
) -> Result<SearchOutcome> {
    if hooks.cancel.is_some_and(CancelToken::is_cancelled) {
        warn!("search cancelled before it started");
        return Ok(SearchOutcome::Cancelled);
    }
    if number_of_tests(test_case, options.prelim) == 0 {
        return Err(Error::NoValidLoadout);
    }
    test_case.validate()?;

    let started = Instant::now();
    let space = CandidateSpace::new(test_case, options.prelim, &options.params);
    let total = space.len();
    if let Some(progress) = hooks.progress {
        progress.reset(total);
    }

    let pool = WorkerPool::with_workers(options.cores).with_ceiling(options.max_cores);
    let workers = pool.resolved_workers();
    let ranges = batch_ranges(space.booster_combinations, workers);
    info!(
        ship = %test_case.ship().display_name(),
        generators = space.generators.len(),
        boosters = space.boosters.len(),
        boosters_per_loadout = space.boosters_per_loadout,
        total,
        workers,
        "starting loadout search"
    );

    let abort = AtomicBool::new(false);
    let worker = Worker {
        space: &space,
        damage: test_case.damage_profile(),
        bonuses: test_case.hitpoint_bonuses(),
        params: options.params,
        hooks,
        abort: &abort,
    };
    let chunks: Vec<std::result::Result<ChunkResult, SearchError>> = pool.install(|| {
        ranges
            .par_iter()
            .map(|&(start, end)| worker.run(start, end))
            .collect()
    })?;

    let mut best: Option<RankedCandidate> = None;
    let mut evaluated = 0;
    for chunk in chunks {
        let chunk = chunk?;
        evaluated += chunk.evaluated;
        if let Some(candidate) = chunk.best {
            keep_best(&mut best, candidate);
        }
    }

    if hooks.cancel.is_some_and(CancelToken::is_cancelled) {
        warn!(evaluated, total, "search cancelled");
        return Ok(SearchOutcome::Cancelled);
    }
    let winner = best.ok_or(Error::NoValidLoadout)?;

    let combination = unrank(winner.booster_rank, space.boosters.len(), space.boosters_per_loadout);
    let generator = space.generators[winner.generator_index];
    let result = TestResult {
        loadout: Loadout {
            ship: test_case.ship().clone(),
            generator: generator.clone(),
            boosters: combination
                .iter()
                .map(|&index| space.boosters[index].clone())
                .collect(),
            shield_strength: space.shields[winner.generator_index].strength,
        },
        metrics: winner.metrics,
        combinations_evaluated: evaluated,
        guardian_hitpoints: test_case.guardian_hitpoints,
        scb_hitpoints: test_case.scb_hitpoints,
        preliminary: space.generators.len() < test_case.generators().len(),
    };
    info!(
        evaluated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        survival_time = result.metrics.survival_time,
        generator = %generator,
        "loadout search finished"
    );
    Ok(SearchOutcome::Completed(result))
}

/// Score every candidate on the calling thread, in order. Reference for the parallel search.
pub fn compute_sequential(test_case: &TestCase<'_>, options: &SearchOptions) -> Result<TestResult> {
    compute(
        test_case,
        &SearchOptions {
            cores: 1,
            ..*options
        },
    )
}
