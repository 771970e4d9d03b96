//! Standings Processor Library
//!
//! Turns scraped motorsport session classification tables into normalized
//! result rows and recomputes season driver and team standings from them.
//!
//! This library provides tools for:
//! - Resolving gap-to-leader tokens into absolute elapsed times at millisecond precision
//! - Awarding race and sprint points by finishing position
//! - Splitting one qualifying table into its three knockout segments
//! - Storing result rows in a paged, atomically written JSON store
//! - Aggregating per-driver, per-grid-entry and per-team statistics and ranking them

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{RaceResultRow, SessionContext, SessionKind, StoredRaceResult};
pub use config::Config;
pub use error::{Error, Result};
