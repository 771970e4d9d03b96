//! Data models for standings processing
//!
//! This module contains the session vocabulary, the normalized result row
//! produced from a classification table, the stored form of that row as the
//! result store hands it back, and the season grid and standings records the
//! aggregator works from.

use crate::constants::{session_labels, table_slugs};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Session Kinds
// =============================================================================

/// Kind of session a classification table (and every row in it) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionKind {
    #[serde(rename = "FP1")]
    Practice1,
    #[serde(rename = "FP2")]
    Practice2,
    #[serde(rename = "FP3")]
    Practice3,
    #[serde(rename = "Q1")]
    Qualifying1,
    #[serde(rename = "Q2")]
    Qualifying2,
    #[serde(rename = "Q3")]
    Qualifying3,
    #[serde(rename = "SQ1")]
    SprintQualifying1,
    #[serde(rename = "SQ2")]
    SprintQualifying2,
    #[serde(rename = "SQ3")]
    SprintQualifying3,
    Sprint,
    Race,
    #[serde(rename = "Fastest Laps")]
    FastestLaps,
}

impl SessionKind {
    pub const ALL: [SessionKind; 12] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::Qualifying1,
        SessionKind::Qualifying2,
        SessionKind::Qualifying3,
        SessionKind::SprintQualifying1,
        SessionKind::SprintQualifying2,
        SessionKind::SprintQualifying3,
        SessionKind::Sprint,
        SessionKind::Race,
        SessionKind::FastestLaps,
    ];

    /// Label used by the content store for this session type
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => session_labels::PRACTICE_1,
            SessionKind::Practice2 => session_labels::PRACTICE_2,
            SessionKind::Practice3 => session_labels::PRACTICE_3,
            SessionKind::Qualifying1 => session_labels::QUALIFYING_1,
            SessionKind::Qualifying2 => session_labels::QUALIFYING_2,
            SessionKind::Qualifying3 => session_labels::QUALIFYING_3,
            SessionKind::SprintQualifying1 => session_labels::SPRINT_QUALIFYING_1,
            SessionKind::SprintQualifying2 => session_labels::SPRINT_QUALIFYING_2,
            SessionKind::SprintQualifying3 => session_labels::SPRINT_QUALIFYING_3,
            SessionKind::Sprint => session_labels::SPRINT,
            SessionKind::Race => session_labels::RACE,
            SessionKind::FastestLaps => session_labels::FASTEST_LAPS,
        }
    }

    /// Command-line friendly name (`practice-1`, `qualifying-3`, ...)
    pub fn cli_name(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "practice-1",
            SessionKind::Practice2 => "practice-2",
            SessionKind::Practice3 => "practice-3",
            SessionKind::Qualifying1 => "qualifying-1",
            SessionKind::Qualifying2 => "qualifying-2",
            SessionKind::Qualifying3 => "qualifying-3",
            SessionKind::SprintQualifying1 => "sprint-qualifying-1",
            SessionKind::SprintQualifying2 => "sprint-qualifying-2",
            SessionKind::SprintQualifying3 => "sprint-qualifying-3",
            SessionKind::Sprint => "sprint",
            SessionKind::Race => "race",
            SessionKind::FastestLaps => "fastest-laps",
        }
    }

    /// Slug of the classification page this session's table is published under.
    ///
    /// Intermediate knockout segments have no page of their own; they are cut
    /// out of the final segment's table.
    pub fn table_slug(&self) -> Option<&'static str> {
        match self {
            SessionKind::Practice1 => Some(table_slugs::PRACTICE_1),
            SessionKind::Practice2 => Some(table_slugs::PRACTICE_2),
            SessionKind::Practice3 => Some(table_slugs::PRACTICE_3),
            SessionKind::Qualifying3 => Some(table_slugs::QUALIFYING),
            SessionKind::SprintQualifying3 => Some(table_slugs::SPRINT_QUALIFYING),
            SessionKind::Sprint => Some(table_slugs::SPRINT),
            SessionKind::Race => Some(table_slugs::RACE),
            SessionKind::FastestLaps => Some(table_slugs::FASTEST_LAPS),
            SessionKind::Qualifying1
            | SessionKind::Qualifying2
            | SessionKind::SprintQualifying1
            | SessionKind::SprintQualifying2 => None,
        }
    }

    pub fn is_practice(&self) -> bool {
        matches!(
            self,
            SessionKind::Practice1 | SessionKind::Practice2 | SessionKind::Practice3
        )
    }

    pub fn is_qualifying(&self) -> bool {
        matches!(
            self,
            SessionKind::Qualifying1
                | SessionKind::Qualifying2
                | SessionKind::Qualifying3
                | SessionKind::SprintQualifying1
                | SessionKind::SprintQualifying2
                | SessionKind::SprintQualifying3
        )
    }

    /// Earlier knockout segments, which are derived from the final segment's table
    pub fn is_intermediate_segment(&self) -> bool {
        matches!(
            self,
            SessionKind::Qualifying1
                | SessionKind::Qualifying2
                | SessionKind::SprintQualifying1
                | SessionKind::SprintQualifying2
        )
    }

    /// Race-like sessions award points and use the race table layout
    pub fn is_points_scoring(&self) -> bool {
        matches!(self, SessionKind::Race | SessionKind::Sprint)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionKind {
    type Err = Error;

    /// Accepts either the store label (`Q3`, `Fastest Laps`) or the CLI name (`qualifying-3`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        SessionKind::ALL
            .iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(trimmed)
                    || kind.cli_name().eq_ignore_ascii_case(trimmed)
            })
            .copied()
            .ok_or_else(|| Error::unknown_session_kind(trimmed))
    }
}

/// Where a row came from: the session it belongs to and its season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub session_kind: SessionKind,
    pub season_year: String,
    /// Externally assigned id of the session; each knockout segment has its own
    pub race_id: String,
}

impl SessionContext {
    pub fn new(
        session_kind: SessionKind,
        season_year: impl Into<String>,
        race_id: impl Into<String>,
    ) -> Self {
        Self {
            session_kind,
            season_year: season_year.into(),
            race_id: race_id.into(),
        }
    }

    /// Same season and kind, different session id
    pub fn with_race_id(&self, race_id: impl Into<String>) -> Self {
        Self {
            session_kind: self.session_kind,
            season_year: self.season_year.clone(),
            race_id: race_id.into(),
        }
    }
}

// =============================================================================
// Result Rows
// =============================================================================

/// One normalized classification row, ready to be handed to the result store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResultRow {
    pub position: u32,
    pub driver_number: String,
    pub driver_name: String,
    /// `None` when the driver number has no active grid entry this season
    pub season_grid_id: Option<String>,
    pub race_id: String,
    pub laps: u32,
    pub points: u32,
    /// Formatted elapsed time; empty when not available
    pub time: String,
    pub dnf: bool,
}

/// A result row as fetched back from the store, joined with its session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRaceResult {
    #[serde(flatten)]
    pub row: RaceResultRow,

    /// Type of the race this result is attached to
    #[serde(default)]
    pub session_kind: Option<SessionKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_prix_id: Option<String>,

    /// Official final position, when it differs from the scraped one (penalties)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_pos: Option<u32>,

    #[serde(default)]
    pub fastest_lap: bool,

    /// Non-finish classification label (DSQ, DNS, ...); any value counts as a DNF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl StoredRaceResult {
    pub fn new(row: RaceResultRow, session_kind: SessionKind, grand_prix_id: Option<String>) -> Self {
        Self {
            row,
            session_kind: Some(session_kind),
            grand_prix_id,
            final_pos: None,
            fastest_lap: false,
            classification: None,
        }
    }

    /// Finishing or grid position: `finalPos` when set, else the scraped position
    pub fn effective_position(&self) -> u32 {
        self.final_pos
            .filter(|&pos| pos > 0)
            .unwrap_or(self.row.position)
    }

    pub fn is_dnf(&self) -> bool {
        self.row.dnf || self.classification.is_some()
    }

    pub fn season_grid_id(&self) -> Option<&str> {
        self.row.season_grid_id.as_deref()
    }
}

// =============================================================================
// Season Structure
// =============================================================================

/// A driver's car/number identity within one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonGridEntry {
    pub id: String,
    pub driver_number: u32,
    /// Superseded entries keep their results but never resolve number lookups
    #[serde(default)]
    pub is_old_grid: bool,
}

/// A scheduled session within a season, as known to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceInfo {
    pub id: String,
    pub kind: SessionKind,
    pub grand_prix_id: String,
}

/// Stored driver standing, as read at the start of an aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStandingRecord {
    pub id: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Primary (current) grid entry
    pub season_grid_id: Option<String>,
    /// Every grid entry the driver held this season, possibly including the primary
    #[serde(default)]
    pub grids: Vec<String>,
}

impl DriverStandingRecord {
    /// Primary grid first, then the other grids in stored order, without repeats
    pub fn grid_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.grids.len() + 1);
        for id in self
            .season_grid_id
            .iter()
            .chain(self.grids.iter())
            .map(String::as_str)
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Grids other than the primary one
    pub fn secondary_grid_ids(&self) -> Vec<&str> {
        let primary = self.season_grid_id.as_deref();
        self.grid_ids()
            .into_iter()
            .filter(|id| Some(*id) != primary)
            .collect()
    }

    pub fn has_multiple_grids(&self) -> bool {
        self.grid_ids().len() > 1
    }

    pub fn display_name(&self) -> &str {
        self.driver_name.as_deref().unwrap_or(&self.id)
    }
}

/// Stored team (constructor) standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStandingRecord {
    pub id: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub name: String,
    /// Grid entries of every driver who drove for the team this season
    #[serde(default)]
    pub season_grid_ids: Vec<String>,
}

impl TeamStandingRecord {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
