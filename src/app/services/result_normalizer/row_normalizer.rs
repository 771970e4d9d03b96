//! Classification row normalization
//!
//! Turns the column texts of one classification row into a [`RaceResultRow`].
//! Rows of a table depend on each other only through the leader time, which
//! is threaded through the calls explicitly as a [`LeaderTime`] value.

use super::points::points_for;
use super::stats::{NormalizeResult, ParseStats};
use super::time_gap::{GapResolution, resolve_absolute_time, resolve_time_gap};
use crate::app::models::{RaceResultRow, SessionContext, SessionKind};
use crate::app::services::season_grid::GridLookup;
use crate::constants::{columns, practice_layout, qualifying_layout, race_layout};
use tracing::{debug, warn};

/// Row 0 of every table is its header
pub const FIRST_DATA_ROW: usize = 1;

/// How a layout's time column is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    /// Leader row holds an absolute time, every other row a gap to it
    GapToLeader,
    /// Every row holds its own absolute time
    Absolute,
}

/// Column layout of a session's classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Rows with fewer cells are header or filler rows and are dropped
    pub min_columns: usize,
    pub time_column: usize,
    pub laps_column: usize,
    pub time_mode: TimeMode,
}

impl RowLayout {
    pub fn practice() -> Self {
        Self {
            min_columns: practice_layout::MIN_COLUMNS,
            time_column: practice_layout::TIME,
            laps_column: practice_layout::LAPS,
            time_mode: TimeMode::GapToLeader,
        }
    }

    pub fn race() -> Self {
        Self {
            min_columns: race_layout::MIN_COLUMNS,
            time_column: race_layout::TIME,
            laps_column: race_layout::LAPS,
            time_mode: TimeMode::GapToLeader,
        }
    }

    /// One knockout segment of a qualifying table, read from `time_column`
    pub fn qualifying_segment(time_column: usize) -> Self {
        Self {
            min_columns: qualifying_layout::MIN_COLUMNS,
            time_column,
            laps_column: qualifying_layout::LAPS,
            time_mode: TimeMode::Absolute,
        }
    }

    /// Layout for a session read as a single table; `None` for sessions that
    /// are not normalized row by row (fastest laps)
    pub fn for_session(kind: SessionKind) -> Option<Self> {
        match kind {
            k if k.is_practice() => Some(Self::practice()),
            k if k.is_points_scoring() => Some(Self::race()),
            SessionKind::Qualifying1 | SessionKind::SprintQualifying1 => {
                Some(Self::qualifying_segment(qualifying_layout::Q1_TIME))
            }
            SessionKind::Qualifying2 | SessionKind::SprintQualifying2 => {
                Some(Self::qualifying_segment(qualifying_layout::Q2_TIME))
            }
            SessionKind::Qualifying3 | SessionKind::SprintQualifying3 => {
                Some(Self::qualifying_segment(qualifying_layout::Q3_TIME))
            }
            _ => None,
        }
    }
}

/// Leader time accumulator for one pass over a table.
///
/// Unseeded until a row resolves to a non-empty time; that row is the
/// reference and every later row is resolved as reference + own gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderTime(Option<String>);

impl LeaderTime {
    pub fn new() -> Self {
        Self(None)
    }

    /// Empty string while unseeded
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    pub fn is_seeded(&self) -> bool {
        self.0.is_some()
    }

    /// Seed with `time` unless already seeded or `time` is empty
    pub fn seeded_with(self, time: &str) -> Self {
        if self.is_seeded() || time.is_empty() {
            self
        } else {
            Self(Some(time.to_string()))
        }
    }
}

/// Result of normalizing a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Normalized(RaceResultRow),
    Skipped { reason: String },
}

/// Normalizes rows of one session's table
pub struct RowNormalizer<'a, G: GridLookup + ?Sized> {
    layout: RowLayout,
    context: &'a SessionContext,
    grid: &'a G,
}

impl<'a, G: GridLookup + ?Sized> RowNormalizer<'a, G> {
    pub fn new(layout: RowLayout, context: &'a SessionContext, grid: &'a G) -> Self {
        Self {
            layout,
            context,
            grid,
        }
    }

    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Normalize one row.
    ///
    /// `row_index` is the row's index in the table (header at 0). When the
    /// position cell is not a number (`NC`, `DQ`, blank) the row index is used
    /// instead: tables are published in classification order, so the index is
    /// the row's place in that order.
    pub fn normalize_row<S: AsRef<str>>(
        &self,
        cells: &[S],
        row_index: usize,
        leader: LeaderTime,
    ) -> (RowOutcome, LeaderTime) {
        if cells.len() < self.layout.min_columns {
            let reason = format!(
                "{} row {}: {} columns, expected at least {}",
                self.context.race_id,
                row_index,
                cells.len(),
                self.layout.min_columns
            );
            debug!("Skipping malformed row: {}", reason);
            return (RowOutcome::Skipped { reason }, leader);
        }

        let cell = |index: usize| cells.get(index).map(|c| c.as_ref().trim()).unwrap_or("");

        let position = cell(columns::POSITION)
            .parse::<u32>()
            .unwrap_or(row_index as u32);
        let driver_number = cell(columns::DRIVER_NUMBER).to_string();
        let driver_name = cell(columns::DRIVER_NAME).to_string();
        let laps = cell(self.layout.laps_column).parse::<u32>().unwrap_or(0);

        let season_grid_id = self.lookup_grid(&driver_number);

        let GapResolution { dnf, time } = match self.layout.time_mode {
            TimeMode::GapToLeader => resolve_time_gap(cell(self.layout.time_column), leader.as_str()),
            TimeMode::Absolute => resolve_absolute_time(cell(self.layout.time_column)),
        };
        let leader = match self.layout.time_mode {
            TimeMode::GapToLeader => leader.seeded_with(&time),
            TimeMode::Absolute => leader,
        };

        let row = RaceResultRow {
            position,
            driver_number,
            driver_name,
            season_grid_id,
            race_id: self.context.race_id.clone(),
            laps,
            points: points_for(self.context.session_kind, position),
            time,
            dnf,
        };

        (RowOutcome::Normalized(row), leader)
    }

    /// Normalize every data row of a table (row 0 is the header)
    pub fn normalize_table<S: AsRef<str>>(&self, table: &[Vec<S>]) -> NormalizeResult {
        let mut rows = Vec::with_capacity(table.len().saturating_sub(FIRST_DATA_ROW));
        let mut stats = ParseStats::new();
        let mut leader = LeaderTime::new();

        for (row_index, cells) in table.iter().enumerate().skip(FIRST_DATA_ROW) {
            stats.total_rows += 1;
            let (outcome, next_leader) = self.normalize_row(cells, row_index, leader);
            leader = next_leader;

            match outcome {
                RowOutcome::Normalized(row) => {
                    if row.season_grid_id.is_none() {
                        stats.add_warning(format!(
                            "{} row {}: no grid entry for driver #{}",
                            self.context.race_id, row_index, row.driver_number
                        ));
                    }
                    stats.rows_normalized += 1;
                    rows.push(row);
                }
                RowOutcome::Skipped { reason } => stats.record_skip(reason),
            }
        }

        debug!(
            "{} ({}): normalized {}/{} rows",
            self.context.race_id, self.context.session_kind, stats.rows_normalized, stats.total_rows
        );

        NormalizeResult::new(rows, stats)
    }

    fn lookup_grid(&self, driver_number: &str) -> Option<String> {
        let Ok(number) = driver_number.parse::<u32>() else {
            warn!(
                "{}: driver number '{}' is not numeric, row has no grid entry",
                self.context.race_id, driver_number
            );
            return None;
        };

        let grid_id = self.grid.grid_id(number).map(str::to_string);
        if grid_id.is_none() {
            warn!(
                "Season {}: no active grid entry for driver #{} ({})",
                self.context.season_year, number, self.context.race_id
            );
        }
        grid_id
    }
}
