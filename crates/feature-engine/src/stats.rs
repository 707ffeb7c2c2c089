//! Order-Statistic Engine
//!
//! Rank-based statistics (min, max, quartiles, IQR) over one window of
//! signed 8-bit samples. The primary path buckets values into a 256-slot
//! counting histogram and walks it in ascending order; a sort-based path
//! computes the same ranks independently and must agree bit-for-bit.

/// Number of counting buckets: one per possible i8 value
pub const NUM_BUCKETS: usize = 256;

/// Rank statistics of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSummary {
    pub min: i8,
    pub max: i8,
    pub q25: i8,
    pub median: i8,
    pub q75: i8,
    pub iqr: i16,
}

/// Quartile rank positions for a window of length `len`, 1-indexed.
///
/// Floor division is deliberate: it defines which sample is reported at each
/// quartile boundary and must match between the counting and sorting paths.
fn quartile_ranks(len: usize) -> (usize, usize, usize) {
    (len / 4, len / 2, len * 3 / 4)
}

/// Counting histogram of `value + 128` over the window
pub fn histogram(window: &[i8]) -> [u32; NUM_BUCKETS] {
    let mut counts = [0u32; NUM_BUCKETS];
    for &v in window {
        counts[(v as i16 + 128) as usize] += 1;
    }
    counts
}

/// The `rank`-th smallest value (1-indexed) via histogram bucket walking.
///
/// O(W + 256): the first bucket whose cumulative count reaches `rank` holds
/// the answer; ties land in the same bucket and resolve to the same value.
pub fn select_nth(window: &[i8], rank: usize) -> i8 {
    debug_assert!(rank >= 1 && rank <= window.len());
    let counts = histogram(window);
    let mut remaining = rank as u32;
    for (bucket, &count) in counts.iter().enumerate() {
        if count >= remaining {
            return (bucket as i16 - 128) as i8;
        }
        remaining -= count;
    }
    // unreachable for a valid rank; the top bucket closes the walk
    127
}

/// Minimum of a window (dedicated linear scan)
pub fn window_min(window: &[i8]) -> i8 {
    window.iter().copied().min().unwrap_or(0)
}

/// Maximum of a window (dedicated linear scan)
pub fn window_max(window: &[i8]) -> i8 {
    window.iter().copied().max().unwrap_or(0)
}

/// Full rank summary from one histogram pass.
///
/// Min and max come from the lowest and highest nonempty buckets; the
/// quartiles from a single cumulative walk.
pub fn counting_summary(window: &[i8]) -> RankSummary {
    debug_assert!(window.len() >= 4);
    let counts = histogram(window);
    let (q25_rank, median_rank, q75_rank) = quartile_ranks(window.len());

    let mut min = 0i8;
    let mut max = 0i8;
    let mut q25 = 0i8;
    let mut median = 0i8;
    let mut q75 = 0i8;
    let mut q25_set = false;
    let mut median_set = false;
    let mut q75_set = false;

    let mut cumulative = 0u32;
    for (bucket, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let value = (bucket as i16 - 128) as i8;
        if cumulative == 0 {
            min = value;
        }
        max = value;
        cumulative += count;
        if cumulative >= q25_rank as u32 && !q25_set {
            q25_set = true;
            q25 = value;
        }
        if cumulative >= median_rank as u32 && !median_set {
            median_set = true;
            median = value;
        }
        if cumulative >= q75_rank as u32 && !q75_set {
            q75_set = true;
            q75 = value;
        }
    }

    RankSummary {
        min,
        max,
        q25,
        median,
        q75,
        iqr: q75 as i16 - q25 as i16,
    }
}

/// Rank summary via a full stable sort, indexing the sorted buffer at the
/// same 1-indexed rank positions. Cross-check path for `counting_summary`;
/// O(W log W).
pub fn sorted_summary(window: &[i8]) -> RankSummary {
    debug_assert!(window.len() >= 4);
    let mut buffer = window.to_vec();
    buffer.sort();
    let (q25_rank, median_rank, q75_rank) = quartile_ranks(window.len());

    let q25 = buffer[q25_rank - 1];
    let median = buffer[median_rank - 1];
    let q75 = buffer[q75_rank - 1];
    RankSummary {
        min: buffer[0],
        max: buffer[buffer.len() - 1],
        q25,
        median,
        q75,
        iqr: q75 as i16 - q25 as i16,
    }
}
