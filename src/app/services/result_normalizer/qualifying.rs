//! Knockout segment extraction from a qualifying table
//!
//! A qualifying classification is published as one table carrying a time
//! column per knockout segment. Each segment is cut out of that table by one
//! parametrized pass: its own time column, its own row range and its own
//! session id.

use super::row_normalizer::{FIRST_DATA_ROW, LeaderTime, RowLayout, RowNormalizer, RowOutcome};
use super::stats::{NormalizeResult, ParseStats};
use crate::app::models::{SessionContext, SessionKind};
use crate::app::services::season_grid::GridLookup;
use crate::constants::qualifying_layout;
use tracing::{debug, info, warn};

/// The three eliminating stages of a qualifying session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnockoutSegment {
    /// Earliest-eliminated segment (Q1/SQ1)
    First,
    /// Middle segment (Q2/SQ2)
    Middle,
    /// Final segment (Q3/SQ3); its id is the qualifying session's own id
    Final,
}

impl KnockoutSegment {
    pub fn time_column(&self) -> usize {
        match self {
            KnockoutSegment::First => qualifying_layout::Q1_TIME,
            KnockoutSegment::Middle => qualifying_layout::Q2_TIME,
            KnockoutSegment::Final => qualifying_layout::Q3_TIME,
        }
    }

    /// Rows at the end of the table this segment never reads
    pub fn trailing_rows_excluded(&self) -> usize {
        match self {
            KnockoutSegment::Middle => qualifying_layout::Q2_EXCLUDED_TRAILING_ROWS,
            KnockoutSegment::First | KnockoutSegment::Final => 0,
        }
    }

    /// Session kind of this segment in a main or sprint weekend format
    pub fn session_kind(&self, sprint: bool) -> SessionKind {
        match (self, sprint) {
            (KnockoutSegment::First, false) => SessionKind::Qualifying1,
            (KnockoutSegment::Middle, false) => SessionKind::Qualifying2,
            (KnockoutSegment::Final, false) => SessionKind::Qualifying3,
            (KnockoutSegment::First, true) => SessionKind::SprintQualifying1,
            (KnockoutSegment::Middle, true) => SessionKind::SprintQualifying2,
            (KnockoutSegment::Final, true) => SessionKind::SprintQualifying3,
        }
    }
}

/// Parameters of one extraction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPass {
    pub segment: KnockoutSegment,
    pub time_column: usize,
    pub trailing_rows_excluded: usize,
    /// Session id every row of this pass is attributed to
    pub race_id: String,
    /// Drop the whole pass when the first data row has no time: the segment
    /// did not run at this event
    pub discard_when_first_row_untimed: bool,
}

impl SegmentPass {
    pub fn new(segment: KnockoutSegment, race_id: impl Into<String>) -> Self {
        Self {
            segment,
            time_column: segment.time_column(),
            trailing_rows_excluded: segment.trailing_rows_excluded(),
            race_id: race_id.into(),
            discard_when_first_row_untimed: true,
        }
    }

    /// Exclusive end of the row range this pass reads
    pub fn row_end(&self, table_len: usize) -> usize {
        table_len.saturating_sub(self.trailing_rows_excluded)
    }
}

/// Session ids for the three segments of one qualifying session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingSessionIds {
    pub first: Option<String>,
    pub middle: Option<String>,
    /// The overall qualifying session id
    pub final_segment: String,
}

/// Rows of all three segments, each list carrying its own session id
#[derive(Debug, Clone, Default)]
pub struct QualifyingSegments {
    pub first: NormalizeResult,
    pub middle: NormalizeResult,
    pub final_segment: NormalizeResult,
}

impl QualifyingSegments {
    pub fn total_rows(&self) -> usize {
        self.first.row_count() + self.middle.row_count() + self.final_segment.row_count()
    }

    pub fn combined_stats(&self) -> ParseStats {
        let mut stats = self.first.stats.clone();
        stats.merge(&self.middle.stats);
        stats.merge(&self.final_segment.stats);
        stats
    }

    /// All rows, earliest segment first
    pub fn into_rows(self) -> Vec<crate::app::models::RaceResultRow> {
        let mut rows = self.first.rows;
        rows.extend(self.middle.rows);
        rows.extend(self.final_segment.rows);
        rows
    }
}

/// Run one extraction pass over a qualifying table
pub fn extract_segment<S: AsRef<str>, G: GridLookup + ?Sized>(
    table: &[Vec<S>],
    pass: &SegmentPass,
    context: &SessionContext,
    grid: &G,
) -> NormalizeResult {
    let segment_context = context.with_race_id(pass.race_id.clone());
    let normalizer = RowNormalizer::new(
        RowLayout::qualifying_segment(pass.time_column),
        &segment_context,
        grid,
    );

    let mut rows = Vec::new();
    let mut stats = ParseStats::new();
    let mut leader = LeaderTime::new();

    for row_index in FIRST_DATA_ROW..pass.row_end(table.len()) {
        stats.total_rows += 1;
        let (outcome, next_leader) = normalizer.normalize_row(&table[row_index], row_index, leader);
        leader = next_leader;

        let row = match outcome {
            RowOutcome::Normalized(row) => row,
            RowOutcome::Skipped { reason } => {
                stats.record_skip(reason);
                continue;
            }
        };

        if row_index == FIRST_DATA_ROW && pass.discard_when_first_row_untimed && row.time.is_empty()
        {
            info!(
                "{:?} segment ({}) has no time on its first row, discarding segment",
                pass.segment, pass.race_id
            );
            rows.clear();
            stats.rows_normalized = 0;
            break;
        }

        stats.rows_normalized += 1;
        rows.push(row);
    }

    debug!(
        "{:?} segment ({}): {} rows from column {}",
        pass.segment,
        pass.race_id,
        rows.len(),
        pass.time_column
    );

    NormalizeResult::new(rows, stats)
}

/// Split a qualifying table into its three knockout segments.
///
/// `context` is the final segment's (the qualifying session's) context; a
/// segment whose id is missing is not extracted.
pub fn assign_segments<S: AsRef<str>, G: GridLookup + ?Sized>(
    table: &[Vec<S>],
    ids: &QualifyingSessionIds,
    context: &SessionContext,
    grid: &G,
) -> QualifyingSegments {
    let sprint = matches!(
        context.session_kind,
        SessionKind::SprintQualifying1
            | SessionKind::SprintQualifying2
            | SessionKind::SprintQualifying3
    );

    let run = |segment: KnockoutSegment, race_id: Option<&String>| -> NormalizeResult {
        let Some(race_id) = race_id else {
            warn!(
                "No session id for {:?} segment of {}, skipping it",
                segment, ids.final_segment
            );
            return NormalizeResult::default();
        };
        let segment_context = SessionContext::new(
            segment.session_kind(sprint),
            context.season_year.clone(),
            race_id.clone(),
        );
        extract_segment(table, &SegmentPass::new(segment, race_id.clone()), &segment_context, grid)
    };

    QualifyingSegments {
        first: run(KnockoutSegment::First, ids.first.as_ref()),
        middle: run(KnockoutSegment::Middle, ids.middle.as_ref()),
        final_segment: run(KnockoutSegment::Final, Some(&ids.final_segment)),
    }
}
