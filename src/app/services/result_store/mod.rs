//! Result store abstraction
//!
//! The store owns a season's schedule, grid entries, result rows and
//! standings. Ingest writes result rows into it; the standings recompute
//! reads everything back and writes ranked standings.
//!
//! ## Architecture
//!
//! - [`ResultStore`] - the operations the pipeline needs, synchronous
//! - [`json_store`] - a file-backed store: one season document plus paged result files

pub mod json_store;

#[cfg(test)]
pub mod tests;

pub use json_store::{JsonFileStore, SeasonDocument, StoredDriverStanding, StoredTeamStanding};

use crate::Result;
use crate::app::models::{
    DriverStandingRecord, RaceInfo, RaceResultRow, SeasonGridEntry, StoredRaceResult,
    TeamStandingRecord,
};
use crate::app::services::standings::EntityStats;

/// Standings records of one season, as stored before a recompute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonStandings {
    pub drivers: Vec<DriverStandingRecord>,
    pub teams: Vec<TeamStandingRecord>,
}

/// Persistence operations used by ingest and the standings recompute
pub trait ResultStore {
    /// All grid entries of the season, superseded ones included
    fn season_grid(&self, season: &str) -> Result<Vec<SeasonGridEntry>>;

    /// Scheduled session `race_id`; an error if the season does not have it
    fn race_info(&self, season: &str, race_id: &str) -> Result<RaceInfo>;

    /// Persist one normalized result row
    fn create(&self, season: &str, row: &RaceResultRow) -> Result<()>;

    /// Persist several rows; returns how many were written
    fn create_batch(&self, season: &str, rows: &[RaceResultRow]) -> Result<usize> {
        for row in rows {
            self.create(season, row)?;
        }
        Ok(rows.len())
    }

    /// Number of rows already stored for `race_id`
    fn existing_result_count(&self, season: &str, race_id: &str) -> Result<usize>;

    /// Every result of the season, joined with its session type and grand prix
    fn fetch_all_results(&self, season: &str) -> Result<Vec<StoredRaceResult>>;

    fn fetch_standings(&self, season: &str) -> Result<SeasonStandings>;

    /// Store a driver's recomputed stats and rank under `stats.standings_id`
    fn update_driver_standing(&self, season: &str, stats: &EntityStats) -> Result<()>;

    fn update_team_standing(&self, season: &str, stats: &EntityStats) -> Result<()>;
}
