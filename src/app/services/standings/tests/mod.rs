//! Test fixtures for standings aggregation
//!
//! Builders for stored results and standings records. Every result belongs to
//! a grid id and a grand prix; positions double as driver numbers.

use crate::app::models::{
    DriverStandingRecord, RaceResultRow, SessionKind, StoredRaceResult, TeamStandingRecord,
};
use crate::app::services::result_normalizer::points_for;

mod aggregator_tests;
mod ranking_tests;

/// A stored result with points taken from the championship tables
pub fn result(grid: &str, kind: SessionKind, position: u32, gp: &str) -> StoredRaceResult {
    StoredRaceResult::new(
        RaceResultRow {
            position,
            driver_number: position.to_string(),
            driver_name: format!("Driver {}", grid),
            season_grid_id: Some(grid.to_string()),
            race_id: format!("{}-{}", gp, kind.cli_name()),
            laps: 57,
            points: points_for(kind, position),
            time: String::new(),
            dnf: false,
        },
        kind,
        Some(gp.to_string()),
    )
}

pub fn dnf(grid: &str, kind: SessionKind, position: u32, gp: &str) -> StoredRaceResult {
    let mut stored = result(grid, kind, position, gp);
    stored.row.dnf = true;
    stored
}

pub fn driver(id: &str, position: u32, primary: &str, grids: &[&str]) -> DriverStandingRecord {
    DriverStandingRecord {
        id: id.to_string(),
        position,
        driver_name: None,
        season_grid_id: Some(primary.to_string()),
        grids: grids.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn team(id: &str, position: u32, grids: &[&str]) -> TeamStandingRecord {
    TeamStandingRecord {
        id: id.to_string(),
        position,
        name: format!("Team {}", id),
        season_grid_ids: grids.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn refs(results: &[StoredRaceResult]) -> Vec<&StoredRaceResult> {
    results.iter().collect()
}

pub fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}
