//! Splits a total capacity into geometrically shrinking sub-table sizes.

/// Below this size the remainder is folded into a single final sub-table.
const TAIL_THRESHOLD: usize = 4;

/// Returns the sub-table capacities for a table of `total` slots.
///
/// `total` is first clamped up to `min_capacity`. Each step takes half of
/// what remains (at least one slot). Once both the half and the remainder are
/// below four, the remainder becomes the last sub-table, unless that would
/// make it larger than the one before it. The result sums to the clamped
/// total, every entry is at least one and the list never increases.
pub fn partition(total: usize, min_capacity: usize) -> Vec<usize> {
    let total: usize = total.max(min_capacity).max(1);
    let mut capacities: Vec<usize> = Vec::with_capacity(usize::BITS as usize);
    let mut remaining: usize = total;
    let mut previous: usize = usize::MAX;
    while remaining > 0 {
        let mut sub_cap: usize = (remaining / 2).max(1);
        if sub_cap < TAIL_THRESHOLD && remaining < TAIL_THRESHOLD && remaining <= previous {
            sub_cap = remaining;
        }
        sub_cap = sub_cap.min(previous);
        capacities.push(sub_cap);
        remaining -= sub_cap;
        previous = sub_cap;
    }
    capacities
}
