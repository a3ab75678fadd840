//! Batch distribution for the parallel search.
//!
//! Splits the booster-combination rank space into contiguous chunks, one per worker. Chunk
//! boundaries never influence the search result; they only decide who scores what.

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use shieldtester::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: u64, num_batches: usize) -> Vec<(u64, u64)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = (num_batches as u64).min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches as usize);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + u64::from(i < remainder);
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_the_first_chunks() {
        // 21 short-list booster pairs over 4 workers
        assert_eq!(batch_ranges(21, 4), vec![(0, 6), (6, 11), (11, 16), (16, 21)]);
    }

    #[test]
    fn never_more_chunks_than_ranks() {
        assert_eq!(batch_ranges(2, 8), vec![(0, 1), (1, 2)]);
        assert_eq!(batch_ranges(1, 1), vec![(0, 1)]);
    }

    #[test]
    fn nothing_to_split() {
        assert!(batch_ranges(0, 4).is_empty());
        assert!(batch_ranges(21, 0).is_empty());
    }

    #[test]
    fn chunks_tile_large_rank_spaces() {
        // 18 boosters choose 8 with repetition
        let total = 1_081_575;
        let r = batch_ranges(total, 7);
        assert_eq!(r.first().map(|range| range.0), Some(0));
        assert_eq!(r.last().map(|range| range.1), Some(total));
        assert!(r.windows(2).all(|pair| pair[0].1 == pair[1].0));
        let sizes: Vec<u64> = r.iter().map(|(start, end)| end - start).collect();
        assert!(sizes.iter().max().zip(sizes.iter().min()).is_some_and(|(max, min)| max - min <= 1));
    }
}
