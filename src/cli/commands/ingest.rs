//! `ingest` command
//!
//! Store work is synchronous file I/O, so the whole command body runs on the
//! blocking pool.

use super::shared::{
    ProcessingStats, load_configuration, open_store, print_summary, recompute_standings,
    setup_logging,
};
use crate::app::services::session_ingest::{IngestOutcome, IngestRequest, SessionIngest};
use crate::app::services::table_source::CsvTableSource;
use crate::cli::args::IngestArgs;
use crate::{Error, Result};
use std::time::Instant;
use tracing::{info, warn};

pub async fn run_ingest(args: IngestArgs) -> Result<ProcessingStats> {
    tokio::task::spawn_blocking(move || ingest_blocking(&args))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Ingest task failed: {}", e)))?
}

fn ingest_blocking(args: &IngestArgs) -> Result<ProcessingStats> {
    let start = Instant::now();
    args.validate()?;

    let mut config = load_configuration(&args.common)?;
    if let Some(tables_dir) = &args.tables_dir {
        config.tables.tables_dir = tables_dir.clone();
    }
    setup_logging(&args.common, &config)?;

    let season = args.season();
    let store = open_store(&config)?;
    let tables = CsvTableSource::new(&config.tables.tables_dir);

    let request = IngestRequest::new(&season, &args.race_id, args.session, &args.event)
        .with_segment_ids(args.q1_id.clone(), args.q2_id.clone());

    let mut stats = ProcessingStats::default();
    match SessionIngest::new(&tables, &store).ingest(&request)? {
        IngestOutcome::AlreadyProcessed { existing } => {
            println!(
                "Session {} already has {} stored results, nothing ingested",
                args.race_id, existing
            );
        }
        IngestOutcome::Skipped { reason } => {
            println!("Session {} skipped: {}", args.race_id, reason);
        }
        IngestOutcome::Uploaded { rows, stats: parse_stats } => {
            stats.sessions_ingested = 1;
            stats.rows_written = rows;
            stats.warnings += parse_stats.warnings.len();
            if !parse_stats.is_successful() {
                warn!(
                    "Session {}: only {:.1}% of table rows normalized",
                    args.race_id,
                    parse_stats.success_rate()
                );
            }
        }
    }

    if args.skip_standings {
        info!("Skipping standings recompute");
    } else {
        let dry_run = args.dry_run || config.standings.dry_run;
        let show_progress = config.standings.show_progress && !args.common.quiet;
        let (report, written) = recompute_standings(&store, &season, dry_run, show_progress)?;
        stats.record_report(&report, written);
    }

    stats.processing_time = start.elapsed();
    if !args.common.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}
