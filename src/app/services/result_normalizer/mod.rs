//! Classification table normalization
//!
//! Turns raw classification tables (rows of column texts, header first) into
//! typed [`RaceResultRow`](crate::app::models::RaceResultRow)s.
//!
//! ## Architecture
//!
//! - [`time_gap`] - gap-to-leader resolution and millisecond-exact time arithmetic
//! - [`points`] - race and sprint points tables
//! - [`row_normalizer`] - per-row column extraction with an explicit leader-time accumulator
//! - [`qualifying`] - three-pass knockout segment extraction from one qualifying table
//! - [`stats`] - normalization statistics
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use standings_processor::app::models::{SessionContext, SessionKind};
//! use standings_processor::app::services::result_normalizer::{RowLayout, RowNormalizer};
//!
//! let grid: HashMap<u32, String> = [(1, "grid-ver".to_string())].into_iter().collect();
//! let context = SessionContext::new(SessionKind::Race, "2024", "race-1");
//! let table = vec![
//!     vec!["POS", "NO", "DRIVER", "CAR", "LAPS", "TIME", "PTS"],
//!     vec!["1", "1", "Max Verstappen", "Red Bull", "57", "1:31:44.742", "25"],
//! ];
//!
//! let normalizer = RowNormalizer::new(RowLayout::race(), &context, &grid);
//! let result = normalizer.normalize_table(&table);
//! assert_eq!(result.rows[0].points, 25);
//! ```

pub mod points;
pub mod qualifying;
pub mod row_normalizer;
pub mod stats;
pub mod time_gap;

#[cfg(test)]
pub mod tests;

pub use points::{points_for, race_points, sprint_points};
pub use qualifying::{
    KnockoutSegment, QualifyingSegments, QualifyingSessionIds, SegmentPass, assign_segments,
    extract_segment,
};
pub use row_normalizer::{LeaderTime, RowLayout, RowNormalizer, RowOutcome, TimeMode};
pub use stats::{NormalizeResult, ParseStats};
pub use time_gap::{GapResolution, resolve_absolute_time, resolve_time_gap};
