//! Multisets of booster indices in lexicographic order.
//!
//! A booster loadout of size `k` drawn with repetition from `n` variants is a non-decreasing
//! index sequence; `[0, 0]`, `[0, 1]`, ... `[n-1, n-1]`. Ranks let workers jump straight to the
//! start of their chunk without enumerating what comes before it.

/// Binomial coefficient, saturating at `u64::MAX`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // exact: result is C(n, i) here
        result = result * u128::from(n - i) / u128::from(i + 1);
        if result > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    result as u64
}

/// Number of multisets of size `k` over `n` items: `C(n + k - 1, k)`.
pub fn multichoose(n: usize, k: usize) -> u64 {
    if k == 0 {
        return 1;
    }
    if n == 0 {
        return 0;
    }
    binomial((n + k - 1) as u64, k as u64)
}

/// The multiset at `rank` (0-based, lexicographic). `rank` must be below `multichoose(n, k)`.
pub fn unrank(mut rank: u64, n: usize, k: usize) -> Vec<usize> {
    let mut combination = Vec::with_capacity(k);
    let mut start = 0;
    for position in 0..k {
        let remaining = k - position - 1;
        for value in start..n {
            let with_prefix = multichoose(n - value, remaining);
            if rank < with_prefix {
                combination.push(value);
                start = value;
                break;
            }
            rank -= with_prefix;
        }
    }
    combination
}

/// Step to the next multiset in place. Returns false (leaving `combination` untouched) after
/// the last one.
pub fn advance(combination: &mut [usize], n: usize) -> bool {
    let Some(position) = combination.iter().rposition(|&value| value + 1 < n) else {
        return false;
    };
    let next = combination[position] + 1;
    for value in &mut combination[position..] {
        *value = next;
    }
    true
}
