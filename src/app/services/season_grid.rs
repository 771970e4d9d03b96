//! Driver-number to season-grid lookup
//!
//! A season's grid entries map car numbers to stable grid identifiers. Only
//! entries that have not been superseded take part in number lookups; old
//! entries still own their historical results but never receive new ones.

use crate::app::models::SeasonGridEntry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolves a driver number to the grid entry that should own a new result row
pub trait GridLookup {
    fn grid_id(&self, driver_number: u32) -> Option<&str>;
}

impl GridLookup for HashMap<u32, String> {
    fn grid_id(&self, driver_number: u32) -> Option<&str> {
        self.get(&driver_number).map(String::as_str)
    }
}

/// Number lookup over a season's active grid entries
#[derive(Debug, Clone, Default)]
pub struct SeasonGrid {
    season: String,
    by_number: HashMap<u32, String>,
}

impl SeasonGrid {
    /// Build the lookup, ignoring entries flagged `is_old_grid`.
    ///
    /// Two active entries with the same number is a data problem upstream;
    /// the later entry wins and a warning is logged.
    pub fn from_entries(season: impl Into<String>, entries: &[SeasonGridEntry]) -> Self {
        let season = season.into();
        let mut by_number = HashMap::with_capacity(entries.len());

        for entry in entries.iter().filter(|entry| !entry.is_old_grid) {
            if let Some(previous) = by_number.insert(entry.driver_number, entry.id.clone()) {
                warn!(
                    "Season {}: driver number {} has more than one active grid entry ({} replaced by {})",
                    season, entry.driver_number, previous, entry.id
                );
            }
        }

        debug!(
            "Season {}: {} active grid entries ({} superseded)",
            season,
            by_number.len(),
            entries.iter().filter(|entry| entry.is_old_grid).count()
        );

        Self { season, by_number }
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}

impl GridLookup for SeasonGrid {
    fn grid_id(&self, driver_number: u32) -> Option<&str> {
        self.by_number.get(&driver_number).map(String::as_str)
    }
}
