//! Command-line argument definitions for the standings processor
//!
//! Two subcommands: `ingest` normalizes one session's classification table
//! into the result store, `standings` recomputes a season's driver and team
//! standings from everything stored.

use crate::app::models::SessionKind;
use crate::{Error, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the standings processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "standings-processor",
    version,
    about = "Normalize session classifications and recompute season standings",
    long_about = "Reads scraped classification tables for practice, qualifying, sprint and race \
                  sessions, normalizes them into result rows (gap-to-leader times, points, \
                  knockout segments) and recomputes driver and team championship standings \
                  from the stored results."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Normalize one session's table and store its result rows
    Ingest(IngestArgs),
    /// Recompute driver and team standings for a season
    Standings(StandingsArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// Configuration file (defaults to <config dir>/standings-processor/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Result store directory, overrides the configured one
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level from the flags, falling back to the configured level
    pub fn get_log_level(&self, configured: &str) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => configured.to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Season year (defaults to the current year)
    #[arg(short = 's', long = "season", value_name = "YEAR")]
    pub season: Option<String>,

    /// Store id of the session being ingested (for qualifying: the final segment)
    #[arg(short = 'r', long = "race-id", value_name = "ID")]
    pub race_id: String,

    /// Session type, e.g. race, sprint, practice-2, qualifying-3, Q3
    #[arg(short = 'k', long = "session", value_name = "KIND")]
    pub session: SessionKind,

    /// Event path of the classification tables, e.g. 1229/bahrain
    #[arg(short = 'e', long = "event", value_name = "PATH")]
    pub event: String,

    /// Store id of the first knockout segment
    #[arg(long = "q1-id", value_name = "ID")]
    pub q1_id: Option<String>,

    /// Store id of the middle knockout segment
    #[arg(long = "q2-id", value_name = "ID")]
    pub q2_id: Option<String>,

    /// Directory holding the scraped tables, overrides the configured one
    #[arg(short = 't', long = "tables-dir", value_name = "PATH")]
    pub tables_dir: Option<PathBuf>,

    /// Do not recompute standings after storing the rows
    #[arg(long = "skip-standings")]
    pub skip_standings: bool,

    /// Recompute standings without writing them back
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl IngestArgs {
    pub fn validate(&self) -> Result<()> {
        validate_season(self.season.as_deref())?;
        if self.race_id.trim().is_empty() {
            return Err(Error::configuration("--race-id must not be empty"));
        }
        if self.event.trim().is_empty() {
            return Err(Error::configuration("--event must not be empty"));
        }
        if !self.session.is_qualifying() && (self.q1_id.is_some() || self.q2_id.is_some()) {
            return Err(Error::configuration(format!(
                "--q1-id/--q2-id only apply to qualifying sessions, not {}",
                self.session
            )));
        }
        Ok(())
    }

    pub fn season(&self) -> String {
        resolve_season(self.season.as_deref())
    }
}

#[derive(Debug, Clone, Parser)]
pub struct StandingsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Season year (defaults to the current year)
    #[arg(short = 's', long = "season", value_name = "YEAR")]
    pub season: Option<String>,

    /// Aggregate and print without writing standings back
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the standings report"
    )]
    pub format: OutputFormat,

    /// Hide the write-back progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl StandingsArgs {
    pub fn validate(&self) -> Result<()> {
        validate_season(self.season.as_deref())
    }

    pub fn season(&self) -> String {
        resolve_season(self.season.as_deref())
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progress && !self.common.quiet && matches!(self.format, OutputFormat::Human)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured standings tables
    Human,
    /// The full report as JSON
    Json,
}

/// The given season, or the current UTC year
pub fn resolve_season(season: Option<&str>) -> String {
    match season {
        Some(season) => season.trim().to_string(),
        None => chrono::Utc::now().year().to_string(),
    }
}

fn validate_season(season: Option<&str>) -> Result<()> {
    match season.map(str::trim) {
        Some(season) if season.len() != 4 || !season.chars().all(|c| c.is_ascii_digit()) => Err(
            Error::configuration(format!("Season must be a four digit year, got '{}'", season)),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_ingest_args() {
        let args = parse(&[
            "standings-processor",
            "ingest",
            "--season",
            "2024",
            "--race-id",
            "q3-1",
            "--session",
            "qualifying-3",
            "--event",
            "1229/bahrain",
            "--q1-id",
            "q1-1",
            "-v",
        ]);

        let Some(Commands::Ingest(ingest)) = args.command else {
            panic!("expected ingest command");
        };
        assert_eq!(ingest.session, SessionKind::Qualifying3);
        assert_eq!(ingest.q1_id.as_deref(), Some("q1-1"));
        assert_eq!(ingest.q2_id, None);
        assert_eq!(ingest.season(), "2024");
        assert_eq!(ingest.common.get_log_level("info"), "debug");
        assert!(ingest.validate().is_ok());
    }

    #[test]
    fn test_session_accepts_store_labels() {
        let args = parse(&[
            "standings-processor",
            "ingest",
            "-r",
            "fl-1",
            "-k",
            "Fastest Laps",
            "-e",
            "1229/bahrain",
        ]);
        let Some(Commands::Ingest(ingest)) = args.command else {
            panic!("expected ingest command");
        };
        assert_eq!(ingest.session, SessionKind::FastestLaps);
    }

    #[test]
    fn test_unknown_session_rejected() {
        let result = Args::try_parse_from([
            "standings-processor",
            "ingest",
            "-r",
            "x",
            "-k",
            "warmup",
            "-e",
            "e",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_segment_ids_only_for_qualifying() {
        let args = parse(&[
            "standings-processor",
            "ingest",
            "-r",
            "race-1",
            "-k",
            "race",
            "-e",
            "1229/bahrain",
            "--q2-id",
            "q2-1",
        ]);
        let Some(Commands::Ingest(ingest)) = args.command else {
            panic!("expected ingest command");
        };
        assert!(ingest.validate().is_err());
    }

    #[test]
    fn test_standings_args_defaults() {
        let args = parse(&["standings-processor", "standings", "-q"]);
        let Some(Commands::Standings(standings)) = args.command else {
            panic!("expected standings command");
        };

        assert_eq!(standings.format, OutputFormat::Human);
        assert!(!standings.dry_run);
        assert!(!standings.show_progress());
        assert_eq!(standings.common.get_log_level("info"), "error");
        assert_eq!(standings.season().len(), 4);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["standings-processor", "standings", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_season_validation() {
        assert!(validate_season(Some("2024")).is_ok());
        assert!(validate_season(None).is_ok());
        assert!(validate_season(Some("24")).is_err());
        assert!(validate_season(Some("20x4")).is_err());
    }
}
