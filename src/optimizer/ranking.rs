use std::cmp::Ordering;

use serde::Serialize;

use crate::survivability::SurvivabilityMetrics;

/// A scored candidate, identified by its position in the candidate space.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankedCandidate {
    pub metrics: SurvivabilityMetrics,
    pub generator_class: u8,
    pub generator_index: usize,
    pub booster_rank: u64,
    /// `booster_rank * generator_count + generator_index`
    pub order_index: u64,
}

/// Best candidate first: `Less` means `left` ranks above `right`.
///
/// A shield that never depletes beats one that does. Depleting shields compare by survival
/// time, non-depleting ones by net incoming DPS and then shield hitpoints. Exact ties go to
/// the smaller generator, fewer booster hitpoints, and finally the earlier candidate.
pub fn compare_candidates(left: &RankedCandidate, right: &RankedCandidate) -> Ordering {
    let (l, r) = (&left.metrics, &right.metrics);
    let by_metrics = match (l.depletes(), r.depletes()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => r.survival_time.total_cmp(&l.survival_time),
        (false, false) => l
            .incoming_dps
            .total_cmp(&r.incoming_dps)
            .then_with(|| r.shield_hitpoints.total_cmp(&l.shield_hitpoints)),
    };
    by_metrics
        .then_with(|| left.generator_class.cmp(&right.generator_class))
        .then_with(|| l.booster_hitpoints.total_cmp(&r.booster_hitpoints))
        .then_with(|| left.order_index.cmp(&right.order_index))
}

/// Keep the better of `best` and `candidate`.
pub fn keep_best(best: &mut Option<RankedCandidate>, candidate: RankedCandidate) {
    match best {
        Some(current) if compare_candidates(&candidate, current).is_ge() => {}
        _ => *best = Some(candidate),
    }
}

pub fn rank_candidates(mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    candidates.sort_by(compare_candidates);
    candidates
}
