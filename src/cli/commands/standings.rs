//! `standings` command

use super::shared::{
    ProcessingStats, load_configuration, open_store, print_report_json, print_standings,
    print_summary, recompute_standings, setup_logging,
};
use crate::cli::args::{OutputFormat, StandingsArgs};
use crate::{Error, Result};
use std::time::Instant;

pub async fn run_standings(args: StandingsArgs) -> Result<ProcessingStats> {
    tokio::task::spawn_blocking(move || standings_blocking(&args))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Standings task failed: {}", e)))?
}

fn standings_blocking(args: &StandingsArgs) -> Result<ProcessingStats> {
    let start = Instant::now();
    args.validate()?;

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config)?;

    let season = args.season();
    let store = open_store(&config)?;
    let dry_run = args.dry_run || config.standings.dry_run;

    let (report, written) = recompute_standings(&store, &season, dry_run, args.show_progress())?;

    let mut stats = ProcessingStats::default();
    stats.record_report(&report, written);
    stats.processing_time = start.elapsed();

    match args.format {
        OutputFormat::Json => print_report_json(&report)?,
        OutputFormat::Human => {
            print_standings(&report);
            if !args.common.quiet {
                print_summary(&stats);
            }
        }
    }
    Ok(stats)
}
