//! Season standings aggregation
//!
//! Recomputes every driver and team statistic from one snapshot of the
//! season's stored results. Nothing is updated incrementally: each run starts
//! from the full result set and the stored standings records.

use super::ranking::rank_standings;
use super::stats::{EntityStats, StatsIdentity, compute_entity_stats};
use crate::app::models::{DriverStandingRecord, StoredRaceResult, TeamStandingRecord};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Everything one aggregation run produces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsReport {
    pub season: String,
    /// Ranked drivers, one entry per driver standing (merged stats when the
    /// driver held several grid entries)
    pub drivers: Vec<EntityStats>,
    /// Ranked teams
    pub teams: Vec<EntityStats>,
    /// Single-grid statistics for every primary and secondary grid entry
    pub per_grid: BTreeMap<String, EntityStats>,
    /// Merged statistics of multi-grid drivers, keyed by primary grid id
    pub merged: BTreeMap<String, EntityStats>,
    /// Data gaps found during the run
    pub warnings: Vec<String>,
}

impl StandingsReport {
    /// Single-grid statistics, whether or not the grid is a driver's primary one
    pub fn grid_stats(&self, grid_id: &str) -> Option<&EntityStats> {
        self.per_grid.get(grid_id)
    }

    pub fn merged_stats(&self, primary_grid_id: &str) -> Option<&EntityStats> {
        self.merged.get(primary_grid_id)
    }

    pub fn driver(&self, standings_id: &str) -> Option<&EntityStats> {
        self.drivers.iter().find(|d| d.standings_id == standings_id)
    }

    pub fn team(&self, standings_id: &str) -> Option<&EntityStats> {
        self.teams.iter().find(|t| t.standings_id == standings_id)
    }
}

/// Aggregates one season's results into driver and team standings
#[derive(Debug)]
pub struct SeasonStandingsAggregator<'a> {
    season: String,
    results: &'a [StoredRaceResult],
    by_grid: HashMap<&'a str, Vec<&'a StoredRaceResult>>,
}

impl<'a> SeasonStandingsAggregator<'a> {
    /// Index the season's results by grid entry.
    ///
    /// Fails when a result is not attached to any session: the run cannot
    /// tell races from qualifying for it and its totals would be wrong.
    pub fn new(season: impl Into<String>, results: &'a [StoredRaceResult]) -> Result<Self> {
        let season = season.into();

        if let Some(orphan) = results.iter().find(|r| r.session_kind.is_none()) {
            return Err(Error::invariant_violation(format!(
                "season {}: result for driver #{} in race '{}' has no session type",
                season, orphan.row.driver_number, orphan.row.race_id
            )));
        }

        let mut by_grid: HashMap<&str, Vec<&StoredRaceResult>> = HashMap::new();
        let mut unattributed = 0usize;
        for result in results {
            match result.season_grid_id() {
                Some(grid_id) => by_grid.entry(grid_id).or_default().push(result),
                None => unattributed += 1,
            }
        }

        if unattributed > 0 {
            warn!(
                "Season {}: {} results have no grid entry and count for nobody",
                season, unattributed
            );
        }
        debug!(
            "Season {}: {} results across {} grid entries",
            season,
            results.len(),
            by_grid.len()
        );

        Ok(Self {
            season,
            results,
            by_grid,
        })
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    /// Results owned by any of `grid_ids`, in stored order
    fn rows_for(&self, grid_ids: &[&str]) -> Vec<&'a StoredRaceResult> {
        if let [single] = grid_ids {
            return self.by_grid.get(single).cloned().unwrap_or_default();
        }
        let wanted: HashSet<&str> = grid_ids.iter().copied().collect();
        self.results
            .iter()
            .filter(|r| r.season_grid_id().is_some_and(|id| wanted.contains(id)))
            .collect()
    }

    /// Run the full recompute
    pub fn aggregate(
        &self,
        driver_standings: &[DriverStandingRecord],
        team_standings: &[TeamStandingRecord],
    ) -> StandingsReport {
        info!(
            "Aggregating season {}: {} results, {} drivers, {} teams",
            self.season,
            self.results.len(),
            driver_standings.len(),
            team_standings.len()
        );

        let mut report = StandingsReport {
            season: self.season.clone(),
            ..Default::default()
        };

        let primary_stats: Vec<EntityStats> = driver_standings
            .iter()
            .map(|standing| self.primary_grid_stats(standing, &mut report))
            .collect();

        for standing in driver_standings {
            self.secondary_grid_stats(standing, &mut report);
        }

        for standing in driver_standings.iter().filter(|s| s.has_multiple_grids()) {
            self.merged_driver_stats(standing, &mut report);
        }

        let mut drivers: Vec<EntityStats> = driver_standings
            .iter()
            .zip(primary_stats)
            .map(|(standing, single)| {
                standing
                    .season_grid_id
                    .as_deref()
                    .and_then(|grid_id| report.merged.get(grid_id))
                    .cloned()
                    .unwrap_or(single)
            })
            .collect();
        rank_standings(&mut drivers);
        report.drivers = drivers;

        let mut teams: Vec<EntityStats> = team_standings
            .iter()
            .map(|team| self.team_stats(team, &mut report))
            .collect();
        rank_standings(&mut teams);
        report.teams = teams;

        info!(
            "Season {}: ranked {} drivers and {} teams ({} warnings)",
            self.season,
            report.drivers.len(),
            report.teams.len(),
            report.warnings.len()
        );

        report
    }

    fn primary_grid_stats(
        &self,
        standing: &DriverStandingRecord,
        report: &mut StandingsReport,
    ) -> EntityStats {
        let grid_ids: Vec<&str> = standing.season_grid_id.as_deref().into_iter().collect();
        let rows = self.rows_for(&grid_ids);

        if rows.is_empty() {
            let message = match &standing.season_grid_id {
                Some(grid_id) => format!(
                    "driver {} ({}): no results on grid {}",
                    standing.display_name(),
                    standing.id,
                    grid_id
                ),
                None => format!(
                    "driver {} ({}): standing has no grid entry",
                    standing.display_name(),
                    standing.id
                ),
            };
            warn!("Season {}: {}", self.season, message);
            report.warnings.push(message);
        }

        let stats = compute_entity_stats(
            StatsIdentity {
                standings_id: standing.id.clone(),
                season_grid_id: standing.season_grid_id.clone(),
                is_primary_grid: true,
                position: standing.position,
            },
            &rows,
        );

        if let Some(grid_id) = &standing.season_grid_id {
            report.per_grid.insert(grid_id.clone(), stats.clone());
        }
        stats
    }

    /// Bookkeeping stats for grids the driver no longer races on. A grid that
    /// is another standing's primary keeps its primary stats.
    fn secondary_grid_stats(&self, standing: &DriverStandingRecord, report: &mut StandingsReport) {
        for grid_id in standing.secondary_grid_ids() {
            if report.per_grid.contains_key(grid_id) {
                debug!(
                    "Grid {} already has stats, not overwriting with driver {}'s secondary view",
                    grid_id, standing.id
                );
                continue;
            }

            let rows = self.rows_for(&[grid_id]);
            let stats = compute_entity_stats(
                StatsIdentity {
                    standings_id: standing.id.clone(),
                    season_grid_id: Some(grid_id.to_string()),
                    is_primary_grid: false,
                    position: standing.position,
                },
                &rows,
            );
            report.per_grid.insert(grid_id.to_string(), stats);
        }
    }

    fn merged_driver_stats(&self, standing: &DriverStandingRecord, report: &mut StandingsReport) {
        let Some(primary) = standing.season_grid_id.as_deref() else {
            let message = format!(
                "driver {} ({}): several grids but no primary grid, merged stats not ranked",
                standing.display_name(),
                standing.id
            );
            warn!("Season {}: {}", self.season, message);
            report.warnings.push(message);
            return;
        };

        let grid_ids = standing.grid_ids();
        let rows = self.rows_for(&grid_ids);
        debug!(
            "Driver {}: merging {} results across grids {:?}",
            standing.id,
            rows.len(),
            grid_ids
        );

        let stats = compute_entity_stats(
            StatsIdentity {
                standings_id: standing.id.clone(),
                season_grid_id: Some(primary.to_string()),
                is_primary_grid: true,
                position: standing.position,
            },
            &rows,
        );
        report.merged.insert(primary.to_string(), stats);
    }

    fn team_stats(&self, team: &TeamStandingRecord, report: &mut StandingsReport) -> EntityStats {
        let grid_ids: Vec<&str> = team.season_grid_ids.iter().map(String::as_str).collect();

        let mut avg_points_per_race = 0.0;
        let mut avg_points_per_sprint = 0.0;
        for grid_id in &grid_ids {
            match report.per_grid.get(*grid_id) {
                Some(driver) => {
                    avg_points_per_race += driver.race.avg_points;
                    avg_points_per_sprint += driver.sprint.avg_points;
                }
                None => {
                    let message = format!(
                        "team {} ({}): no driver stats for grid {}, left out of team averages",
                        team.display_name(),
                        team.id,
                        grid_id
                    );
                    warn!("Season {}: {}", self.season, message);
                    report.warnings.push(message);
                }
            }
        }

        let rows = self.rows_for(&grid_ids);
        if rows.is_empty() {
            let message = format!(
                "team {} ({}): no results across {} grid entries",
                team.display_name(),
                team.id,
                grid_ids.len()
            );
            warn!("Season {}: {}", self.season, message);
            report.warnings.push(message);
        }

        let mut stats = compute_entity_stats(
            StatsIdentity {
                standings_id: team.id.clone(),
                season_grid_id: None,
                is_primary_grid: true,
                position: team.position,
            },
            &rows,
        );
        stats.race.avg_points = avg_points_per_race;
        stats.sprint.avg_points = avg_points_per_sprint;
        stats
    }
}
