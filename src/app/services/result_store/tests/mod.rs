//! Test fixtures for the file-backed result store

use crate::app::models::{
    DriverStandingRecord, RaceInfo, RaceResultRow, SeasonGridEntry, SessionKind,
    TeamStandingRecord,
};
use crate::app::services::result_store::{
    JsonFileStore, SeasonDocument, StoredDriverStanding, StoredTeamStanding,
};
use tempfile::TempDir;


pub const SEASON: &str = "2024";

/// A season with one race weekend (race + qualifying) and two drivers in one team
pub fn season_document() -> SeasonDocument {
    SeasonDocument {
        races: vec![
            race("race-1", SessionKind::Race, "gp-bahrain"),
            race("q3-1", SessionKind::Qualifying3, "gp-bahrain"),
            race("q2-1", SessionKind::Qualifying2, "gp-bahrain"),
        ],
        grid: vec![
            grid_entry("grid-1", 1, false),
            grid_entry("grid-11", 11, false),
            grid_entry("grid-old", 11, true),
        ],
        driver_standings: vec![
            StoredDriverStanding {
                record: DriverStandingRecord {
                    id: "ver".to_string(),
                    position: 1,
                    driver_name: Some("Max Verstappen".to_string()),
                    season_grid_id: Some("grid-1".to_string()),
                    grids: vec![],
                },
                stats: None,
            },
            StoredDriverStanding {
                record: DriverStandingRecord {
                    id: "per".to_string(),
                    position: 2,
                    driver_name: Some("Sergio Perez".to_string()),
                    season_grid_id: Some("grid-11".to_string()),
                    grids: vec!["grid-old".to_string()],
                },
                stats: None,
            },
        ],
        team_standings: vec![StoredTeamStanding {
            record: TeamStandingRecord {
                id: "rbr".to_string(),
                position: 1,
                name: "Red Bull Racing".to_string(),
                season_grid_ids: vec!["grid-1".to_string(), "grid-11".to_string()],
            },
            stats: None,
        }],
    }
}

pub fn race(id: &str, kind: SessionKind, gp: &str) -> RaceInfo {
    RaceInfo {
        id: id.to_string(),
        kind,
        grand_prix_id: gp.to_string(),
    }
}

pub fn grid_entry(id: &str, number: u32, is_old_grid: bool) -> SeasonGridEntry {
    SeasonGridEntry {
        id: id.to_string(),
        driver_number: number,
        is_old_grid,
    }
}

pub fn row(race_id: &str, position: u32, number: u32) -> RaceResultRow {
    RaceResultRow {
        position,
        driver_number: number.to_string(),
        driver_name: format!("Driver {}", number),
        season_grid_id: Some(format!("grid-{}", number)),
        race_id: race_id.to_string(),
        laps: 57,
        points: 0,
        time: String::new(),
        dnf: false,
    }
}

/// Store over a fresh temp directory with the season document already saved
pub fn seeded_store(page_size: usize) -> (TempDir, JsonFileStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path(), page_size).unwrap();
    store.save_season(SEASON, &season_document()).unwrap();
    (temp_dir, store)
}
