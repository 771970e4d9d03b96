//! Tests for the standings tie-break chain

use crate::app::services::standings::ranking::{compare_standings, rank_standings};
use crate::app::services::standings::stats::EntityStats;
use std::cmp::Ordering;

fn entry(id: &str, points: u32, best_finish: u32, position: u32) -> EntityStats {
    let mut stats = EntityStats {
        standings_id: id.to_string(),
        points,
        position,
        ..Default::default()
    };
    stats.race.best_finish = best_finish;
    stats
}

fn ids(entries: &[EntityStats]) -> Vec<&str> {
    entries.iter().map(|e| e.standings_id.as_str()).collect()
}

#[test]
fn test_points_descending() {
    let mut entries = vec![entry("a", 10, 1, 1), entry("b", 30, 5, 2), entry("c", 20, 2, 3)];
    rank_standings(&mut entries);

    assert_eq!(ids(&entries), ["b", "c", "a"]);
    assert_eq!(entries.iter().map(|e| e.position).collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn test_equal_points_ordered_by_best_finish() {
    let mut entries = vec![entry("a", 25, 3, 1), entry("b", 25, 1, 2)];
    rank_standings(&mut entries);

    assert_eq!(ids(&entries), ["b", "a"]);
}

#[test]
fn test_full_tie_falls_back_to_stored_position() {
    let mut entries = vec![entry("a", 25, 2, 7), entry("b", 25, 2, 3)];
    rank_standings(&mut entries);

    assert_eq!(ids(&entries), ["b", "a"]);
    assert_eq!(entries[0].position, 1);
}

#[test]
fn test_missing_values_sort_last() {
    let never_classified = entry("a", 0, 0, 1);
    let classified = entry("b", 0, 15, 2);
    assert_eq!(compare_standings(&classified, &never_classified), Ordering::Less);

    let unranked = entry("c", 0, 15, 0);
    assert_eq!(compare_standings(&classified, &unranked), Ordering::Less);
}

#[test]
fn test_ranking_is_stable_and_repeatable() {
    let input = vec![
        entry("a", 0, 0, 0),
        entry("b", 0, 0, 0),
        entry("c", 12, 4, 5),
        entry("d", 0, 0, 0),
    ];

    let mut first = input.clone();
    rank_standings(&mut first);
    assert_eq!(ids(&first), ["c", "a", "b", "d"]);

    let mut second = first.clone();
    rank_standings(&mut second);
    assert_eq!(first, second);
}
