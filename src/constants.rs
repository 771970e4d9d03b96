//! Application constants for the standings processor
//!
//! Session labels, points tables, classification table layouts and the
//! default values used by configuration and the CLI.

// =============================================================================
// Session Labels
// =============================================================================

/// Session type labels as stored with each race in the content store
pub mod session_labels {
    pub const PRACTICE_1: &str = "FP1";
    pub const PRACTICE_2: &str = "FP2";
    pub const PRACTICE_3: &str = "FP3";
    pub const QUALIFYING_1: &str = "Q1";
    pub const QUALIFYING_2: &str = "Q2";
    pub const QUALIFYING_3: &str = "Q3";
    pub const SPRINT_QUALIFYING_1: &str = "SQ1";
    pub const SPRINT_QUALIFYING_2: &str = "SQ2";
    pub const SPRINT_QUALIFYING_3: &str = "SQ3";
    pub const SPRINT: &str = "Sprint";
    pub const RACE: &str = "Race";
    pub const FASTEST_LAPS: &str = "Fastest Laps";
}

/// Classification page slugs per session, relative to an event's result pages
pub mod table_slugs {
    pub const PRACTICE_1: &str = "practice-1";
    pub const PRACTICE_2: &str = "practice-2";
    pub const PRACTICE_3: &str = "practice-3";
    pub const QUALIFYING: &str = "qualifying";
    pub const SPRINT_QUALIFYING: &str = "sprint-qualifying";
    pub const SPRINT: &str = "sprint-results";
    pub const RACE: &str = "race-result";
    pub const FASTEST_LAPS: &str = "fastest-laps";
}

// =============================================================================
// Points
// =============================================================================

/// Points for finishing positions 1..=10 in a main race
pub const RACE_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Points for finishing positions 1..=8 in a sprint
pub const SPRINT_POINTS: [u32; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

// =============================================================================
// Classification Table Layouts
// =============================================================================

/// Column offsets shared by every classification table
pub mod columns {
    pub const POSITION: usize = 0;
    pub const DRIVER_NUMBER: usize = 1;
    pub const DRIVER_NAME: usize = 2;
}

/// Practice tables: POS, NO, DRIVER, CAR, TIME/GAP, LAPS
pub mod practice_layout {
    pub const MIN_COLUMNS: usize = 6;
    pub const TIME: usize = 4;
    pub const LAPS: usize = 5;
}

/// Race and sprint tables: POS, NO, DRIVER, CAR, LAPS, TIME/RETIRED, PTS
pub mod race_layout {
    pub const MIN_COLUMNS: usize = 7;
    pub const LAPS: usize = 4;
    pub const TIME: usize = 5;
}

/// Qualifying tables: POS, NO, DRIVER, CAR, Q1, Q2, Q3, LAPS
pub mod qualifying_layout {
    pub const MIN_COLUMNS: usize = 3;
    pub const LAPS: usize = 7;
    pub const Q1_TIME: usize = 4;
    pub const Q2_TIME: usize = 5;
    pub const Q3_TIME: usize = 6;

    /// Rows at the bottom of the table that never reach the middle segment
    pub const Q2_EXCLUDED_TRAILING_ROWS: usize = 5;
}

/// Gap tokens that mean the car did not finish
pub const DNF_TOKENS: &[&str] = &["DNF", "+0 lap"];

// =============================================================================
// Standings Windows
// =============================================================================

pub const RACE_TOP_FINISH_LIMIT: u32 = 10;
pub const RACE_TOP5_LIMIT: u32 = 5;
pub const SPRINT_TOP_FINISH_LIMIT: u32 = 8;
pub const PODIUM_LIMIT: u32 = 3;
pub const FIRST_ROW_LIMIT: u32 = 2;
pub const FINAL_SEGMENT_LIMIT: u32 = 10;

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "standings-processor";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Number of results per page file in the JSON result store
pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Environment variables that override configuration file values
pub mod env_vars {
    pub const DATA_DIR: &str = "STANDINGS_DATA_DIR";
    pub const TABLES_DIR: &str = "STANDINGS_TABLES_DIR";
    pub const PAGE_SIZE: &str = "STANDINGS_PAGE_SIZE";
    pub const LOG_LEVEL: &str = "STANDINGS_LOG_LEVEL";
}

// =============================================================================
// JSON Store Layout
// =============================================================================

pub const SEASON_FILE_NAME: &str = "season.json";
pub const RESULTS_DIR_NAME: &str = "results";
pub const RESULT_PAGE_PATTERN: &str = "page-*.json";
