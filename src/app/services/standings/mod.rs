//! Season standings recomputation
//!
//! Rebuilds driver and team championship statistics from the complete set of
//! a season's stored results.
//!
//! ## Architecture
//!
//! - [`stats`] - the statistics set and the pure functions that compute it from result rows
//! - [`ranking`] - the points / best finish / stored position tie-break chain
//! - [`aggregator`] - the full recompute over drivers, grid entries and teams
//!
//! Every run reads one snapshot and produces a fresh [`StandingsReport`], so
//! running twice over the same data yields the same report.

pub mod aggregator;
pub mod ranking;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use aggregator::{SeasonStandingsAggregator, StandingsReport};
pub use ranking::{compare_standings, rank_standings};
pub use stats::{
    EntityStats, FinishingStats, FinishingWindow, QualifyingStats, StatsIdentity,
    aggregate_finishing, aggregate_qualifying, compute_entity_stats, count_grand_prix,
};
