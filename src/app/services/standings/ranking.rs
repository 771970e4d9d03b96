//! Standings order and rank assignment
//!
//! Tie-break chain: points descending, best race finish ascending, previously
//! stored position ascending. The sort is stable, so entries tied on all
//! three keep their input order.

use super::stats::EntityStats;
use std::cmp::Ordering;

/// Ordering of two standings entries under the tie-break chain.
///
/// A best finish of 0 (never classified) and a stored position of 0 (never
/// ranked) both mean "no value" and sort after every real value.
pub fn compare_standings(a: &EntityStats, b: &EntityStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| missing_last(a.race.best_finish).cmp(&missing_last(b.race.best_finish)))
        .then_with(|| missing_last(a.position).cmp(&missing_last(b.position)))
}

/// Sort by the tie-break chain and overwrite `position` with the 1-based rank
pub fn rank_standings(entries: &mut [EntityStats]) {
    entries.sort_by(compare_standings);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.position = index as u32 + 1;
    }
}

fn missing_last(value: u32) -> u32 {
    if value == 0 { u32::MAX } else { value }
}
