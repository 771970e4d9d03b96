//! Command implementations for the standings processor CLI
//!
//! - `ingest`: normalize one session's table into the result store, then recompute standings
//! - `standings`: recompute and report a season's standings

pub mod ingest;
pub mod shared;
pub mod standings;

pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.command {
        Some(Commands::Ingest(ingest_args)) => ingest::run_ingest(ingest_args).await,
        Some(Commands::Standings(standings_args)) => {
            standings::run_standings(standings_args).await
        }
        None => Ok(ProcessingStats::default()),
    }
}
