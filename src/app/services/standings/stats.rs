//! Per-entity season statistics
//!
//! One strongly typed statistics set per driver, grid entry or team, produced
//! by pure functions over the entity's stored result rows. Averages that have
//! nothing to average over are `None`, never a magic number.

use crate::app::models::{SessionKind, StoredRaceResult};
use crate::constants::{
    FINAL_SEGMENT_LIMIT, FIRST_ROW_LIMIT, PODIUM_LIMIT, RACE_TOP_FINISH_LIMIT, RACE_TOP5_LIMIT,
    SPRINT_TOP_FINISH_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which rows a finishing block is computed from and its top-N window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishingWindow {
    pub kind: SessionKind,
    pub top_limit: u32,
    pub track_top5: bool,
}

impl FinishingWindow {
    pub const RACE: FinishingWindow = FinishingWindow {
        kind: SessionKind::Race,
        top_limit: RACE_TOP_FINISH_LIMIT,
        track_top5: true,
    };

    pub const SPRINT: FinishingWindow = FinishingWindow {
        kind: SessionKind::Sprint,
        top_limit: SPRINT_TOP_FINISH_LIMIT,
        track_top5: false,
    };
}

/// Race or sprint results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishingStats {
    pub points: u32,
    /// Points over number of sessions; 0.0 without sessions
    pub avg_points: f64,
    pub wins: u32,
    pub podiums: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top5_finishes: Option<u32>,
    /// Finishes inside the window (top 10 race, top 8 sprint)
    pub top_finishes: u32,
    pub fastest_laps: u32,
    pub dnfs: u32,
    /// Best classified position; 0 when never classified
    pub best_finish: u32,
    pub avg_finish: Option<f64>,
}

/// Final qualifying segment results, read as the starting grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingStats {
    pub poles: u32,
    pub first_row_starts: u32,
    /// Times inside the top 10 of the final segment
    pub final_segment_appearances: u32,
    /// Best raw qualifying position; 0 without data
    pub best_position: u32,
    pub avg_position: Option<f64>,
    pub avg_start_grid_position: Option<f64>,
    /// Average start position minus average finish position
    pub avg_positions_gained: Option<f64>,
}

/// Full statistics set for one driver, grid entry or team
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    pub standings_id: String,
    /// Grid entry the stats are keyed by; `None` for teams
    pub season_grid_id: Option<String>,
    pub is_primary_grid: bool,
    /// Stored rank on input, final rank after ranking
    pub position: u32,
    /// Race plus sprint points
    pub points: u32,
    pub race: FinishingStats,
    pub sprint: FinishingStats,
    pub race_qualifying: QualifyingStats,
    pub sprint_qualifying: QualifyingStats,
    /// Distinct grand prix entered
    pub grand_prix_count: usize,
    /// Rows the statistics were computed from
    pub result_count: usize,
}

impl EntityStats {
    pub fn has_results(&self) -> bool {
        self.result_count > 0
    }
}

/// Identity fields stamped onto a computed statistics set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsIdentity {
    pub standings_id: String,
    pub season_grid_id: Option<String>,
    pub is_primary_grid: bool,
    pub position: u32,
}

/// Compute the full statistics set over `rows`
pub fn compute_entity_stats(identity: StatsIdentity, rows: &[&StoredRaceResult]) -> EntityStats {
    let race = aggregate_finishing(rows, FinishingWindow::RACE);
    let sprint = aggregate_finishing(rows, FinishingWindow::SPRINT);
    let race_qualifying = aggregate_qualifying(rows, SessionKind::Qualifying3, race.avg_finish);
    let sprint_qualifying =
        aggregate_qualifying(rows, SessionKind::SprintQualifying3, sprint.avg_finish);

    EntityStats {
        standings_id: identity.standings_id,
        season_grid_id: identity.season_grid_id,
        is_primary_grid: identity.is_primary_grid,
        position: identity.position,
        points: race.points + sprint.points,
        race,
        sprint,
        race_qualifying,
        sprint_qualifying,
        grand_prix_count: count_grand_prix(rows),
        result_count: rows.len(),
    }
}

/// Race-like block: same routine for races and sprints, parameterized by window
pub fn aggregate_finishing(rows: &[&StoredRaceResult], window: FinishingWindow) -> FinishingStats {
    let sessions: Vec<&StoredRaceResult> = of_kind(rows, window.kind);
    let within = |limit: u32| count(&sessions, |r| (1..=limit).contains(&r.effective_position()));

    let points: u32 = sessions.iter().map(|r| r.row.points).sum();
    let positions: Vec<u32> = sessions
        .iter()
        .map(|r| r.effective_position())
        .filter(|&pos| pos > 0)
        .collect();

    FinishingStats {
        points,
        avg_points: if sessions.is_empty() {
            0.0
        } else {
            points as f64 / sessions.len() as f64
        },
        wins: count(&sessions, |r| r.effective_position() == 1),
        podiums: within(PODIUM_LIMIT),
        top5_finishes: window.track_top5.then(|| within(RACE_TOP5_LIMIT)),
        top_finishes: within(window.top_limit),
        fastest_laps: count(&sessions, |r| r.fastest_lap),
        dnfs: count(&sessions, |r| r.is_dnf()),
        best_finish: positions.iter().copied().min().unwrap_or(0),
        // Averaged over every session, classified or not
        avg_finish: average_over(&positions, sessions.len()),
    }
}

/// Qualifying block from the final segment rows of `kind`
pub fn aggregate_qualifying(
    rows: &[&StoredRaceResult],
    kind: SessionKind,
    avg_finish: Option<f64>,
) -> QualifyingStats {
    let sessions: Vec<&StoredRaceResult> = of_kind(rows, kind);

    let raw_positions: Vec<u32> = sessions
        .iter()
        .map(|r| r.row.position)
        .filter(|&pos| pos > 0)
        .collect();
    let grid_positions: Vec<u32> = sessions.iter().map(|r| r.effective_position()).collect();

    let avg_start_grid_position = average_over(&grid_positions, sessions.len());

    QualifyingStats {
        poles: count(&sessions, |r| r.effective_position() == 1),
        first_row_starts: count(&sessions, |r| {
            (1..=FIRST_ROW_LIMIT).contains(&r.effective_position())
        }),
        final_segment_appearances: count(&sessions, |r| {
            r.row.position > 0 && r.effective_position() <= FINAL_SEGMENT_LIMIT
        }),
        best_position: raw_positions.iter().copied().min().unwrap_or(0),
        avg_position: average_over(&raw_positions, sessions.len()),
        avg_start_grid_position,
        avg_positions_gained: match (avg_start_grid_position, avg_finish) {
            (Some(start), Some(finish)) => Some(start - finish),
            _ => None,
        },
    }
}

/// Distinct grand prix referenced by `rows`
pub fn count_grand_prix(rows: &[&StoredRaceResult]) -> usize {
    rows.iter()
        .filter_map(|r| r.grand_prix_id.as_deref())
        .filter(|id| !id.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

fn of_kind<'a>(rows: &[&'a StoredRaceResult], kind: SessionKind) -> Vec<&'a StoredRaceResult> {
    rows.iter()
        .copied()
        .filter(|r| r.session_kind == Some(kind))
        .collect()
}

fn count(rows: &[&StoredRaceResult], predicate: impl Fn(&StoredRaceResult) -> bool) -> u32 {
    rows.iter().filter(|r| predicate(r)).count() as u32
}

/// Sum of `values` over `denominator`; `None` when either side is empty
fn average_over(values: &[u32], denominator: usize) -> Option<f64> {
    if values.is_empty() || denominator == 0 {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / denominator as f64)
}
