//! Tests for the season recompute

use super::*;
use crate::Error;
use crate::app::models::SessionKind;
use crate::app::services::standings::aggregator::SeasonStandingsAggregator;

#[test]
fn test_single_grand_prix_with_a_dnf() {
    let mut results: Vec<StoredRaceResult> = (1..=10)
        .map(|p| result(&format!("g{}", p), SessionKind::Race, p, "gp-1"))
        .collect();
    let mut retired = dnf("g11", SessionKind::Race, 11, "gp-1");
    retired.row.points = 0;
    results.push(retired);

    let drivers: Vec<DriverStandingRecord> = (1..=11)
        .map(|p| driver(&format!("d{}", p), 0, &format!("g{}", p), &[]))
        .collect();

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &[]);

    let expected = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1, 0];
    for (p, points) in expected.iter().enumerate() {
        let stats = report.driver(&format!("d{}", p + 1)).unwrap();
        assert_eq!(stats.points, *points, "driver d{}", p + 1);
        assert_eq!(stats.position as usize, p + 1);
        assert_eq!(stats.grand_prix_count, 1);
    }
    assert_eq!(report.driver("d11").unwrap().race.dnfs, 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_result_without_session_aborts() {
    let mut orphan = result("g1", SessionKind::Race, 1, "gp-1");
    orphan.session_kind = None;
    let results = vec![result("g2", SessionKind::Race, 2, "gp-1"), orphan];

    let err = SeasonStandingsAggregator::new("2024", &results).unwrap_err();

    assert!(matches!(err, Error::InvariantViolation { .. }));
}

#[test]
fn test_multi_grid_driver_ranked_on_merged_stats() {
    let results = vec![
        result("g-old", SessionKind::Race, 1, "gp-1"),
        result("g-b", SessionKind::Race, 3, "gp-1"),
        result("g-new", SessionKind::Race, 2, "gp-2"),
        result("g-b", SessionKind::Race, 1, "gp-2"),
    ];
    let drivers = vec![
        driver("beta", 1, "g-b", &[]),
        driver("alpha", 2, "g-new", &["g-old", "g-new"]),
    ];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &[]);

    // 25 + 18 beats 15 + 25
    let alpha = report.driver("alpha").unwrap();
    assert_eq!(alpha.points, 43);
    assert_eq!(alpha.position, 1);
    assert_eq!(alpha.grand_prix_count, 2);
    assert_eq!(alpha.race.best_finish, 1);
    assert_eq!(report.driver("beta").unwrap().position, 2);

    // Each grid stays queryable on its own
    let old = report.grid_stats("g-old").unwrap();
    assert_eq!(old.points, 25);
    assert!(!old.is_primary_grid);
    let new = report.grid_stats("g-new").unwrap();
    assert_eq!(new.points, 18);
    assert!(new.is_primary_grid);
    assert_eq!(report.merged_stats("g-new").unwrap().points, 43);
    assert!(report.merged_stats("g-b").is_none());
}

#[test]
fn test_secondary_grid_does_not_replace_primary_stats() {
    let results = vec![
        result("g-shared", SessionKind::Race, 1, "gp-1"),
        result("g-own", SessionKind::Race, 2, "gp-1"),
    ];
    // Bad data: "second" lists another driver's primary grid among its own
    let drivers = vec![
        driver("first", 1, "g-shared", &[]),
        driver("second", 2, "g-own", &["g-shared"]),
    ];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &[]);

    let shared = report.grid_stats("g-shared").unwrap();
    assert_eq!(shared.standings_id, "first");
    assert!(shared.is_primary_grid);
}

#[test]
fn test_tied_drivers_keep_a_deterministic_order() {
    let results = vec![
        result("g1", SessionKind::Race, 2, "gp-1"),
        result("g2", SessionKind::Race, 2, "gp-2"),
    ];
    let drivers = vec![driver("d1", 9, "g1", &[]), driver("d2", 4, "g2", &[])];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &[]);

    let order: Vec<&str> = report.drivers.iter().map(|d| d.standings_id.as_str()).collect();
    assert_eq!(order, ["d2", "d1"]);
}

#[test]
fn test_aggregation_is_idempotent() {
    let results = vec![
        result("g1", SessionKind::Race, 1, "gp-1"),
        result("g2", SessionKind::Race, 2, "gp-1"),
        result("g1", SessionKind::Qualifying3, 2, "gp-1"),
        result("g2", SessionKind::Qualifying3, 1, "gp-1"),
        result("g2", SessionKind::Sprint, 1, "gp-1"),
    ];
    let drivers = vec![driver("d1", 2, "g1", &[]), driver("d2", 1, "g2", &["g1"])];
    let teams = vec![team("t1", 1, &["g1", "g2"])];

    let aggregator = SeasonStandingsAggregator::new("2024", &results).unwrap();
    let first = aggregator.aggregate(&drivers, &teams);
    let second = aggregator.aggregate(&drivers, &teams);
    let fresh = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &teams);

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn test_team_with_missing_driver_stats() {
    let results = vec![
        result("g1", SessionKind::Race, 1, "gp-1"),
        result("g1", SessionKind::Race, 3, "gp-2"),
        result("g2", SessionKind::Race, 2, "gp-1"),
    ];
    let drivers = vec![driver("d1", 1, "g1", &[]), driver("d2", 2, "g2", &[])];
    let teams = vec![
        team("t1", 1, &["g1", "g-missing"]),
        team("t2", 2, &["g2"]),
    ];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &teams);

    let t1 = report.team("t1").unwrap();
    assert_eq!(t1.points, 40);
    assert_eq!(t1.position, 1);
    assert!((t1.race.avg_points - 20.0).abs() < 1e-9);
    assert_eq!(report.team("t2").unwrap().points, 18);
    assert!(report.warnings.iter().any(|w| w.contains("g-missing")));
}

#[test]
fn test_team_averages_sum_driver_averages() {
    let results = vec![
        result("g1", SessionKind::Race, 1, "gp-1"),
        result("g1", SessionKind::Race, 3, "gp-2"),
        result("g2", SessionKind::Race, 2, "gp-1"),
    ];
    let drivers = vec![driver("d1", 1, "g1", &[]), driver("d2", 2, "g2", &[])];
    let teams = vec![team("t1", 1, &["g1", "g2"])];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &teams);

    let t1 = report.team("t1").unwrap();
    // 20 per race for g1 plus 18 per race for g2
    assert!((t1.race.avg_points - 38.0).abs() < 1e-9);
    assert_eq!(t1.points, 58);
    assert_eq!(t1.season_grid_id, None);
}

#[test]
fn test_driver_without_results_gets_zero_stats_and_a_warning() {
    let results = vec![result("g1", SessionKind::Race, 1, "gp-1")];
    let drivers = vec![driver("d1", 1, "g1", &[]), driver("reserve", 2, "g9", &[])];

    let report = SeasonStandingsAggregator::new("2024", &results)
        .unwrap()
        .aggregate(&drivers, &[]);

    let reserve = report.driver("reserve").unwrap();
    assert_eq!(reserve.points, 0);
    assert!(!reserve.has_results());
    assert_eq!(reserve.race.avg_finish, None);
    assert_eq!(report.warnings.len(), 1);
}
