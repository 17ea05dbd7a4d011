//! Division of active elements into equal work ranges.
//!
//! Element numbering may have gaps, so ranges are cut over the ordered list of
//! active elements rather than over the id space. Every range holds the same
//! number of elements except the last, which also takes the remainder.

use std::ops::Range;

use log::debug;

/// Cuts `active` ordered elements into at most `num_workers` ranges of positions.
///
/// Fewer elements than workers reduces the worker count; no active elements
/// gives a single empty range.
pub fn partition_ranges(active: usize, num_workers: usize) -> Vec<Range<usize>> {
    if active == 0 {
        debug!("no active elements, using a single empty range");
        return vec![0..0];
    }
    let workers = num_workers.clamp(1, active);
    let delta = active / workers;

    (0..workers)
        .map(|i| {
            let start = i * delta;
            let end = if i == workers - 1 { active } else { start + delta };
            start..end
        })
        .collect()
}
