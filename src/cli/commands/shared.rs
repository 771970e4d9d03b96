//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, the standings recompute run
//! by both commands, and summary reporting.

use crate::app::services::result_store::{JsonFileStore, ResultStore};
use crate::app::services::standings::{SeasonStandingsAggregator, StandingsReport};
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters reported at the end of a command
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub sessions_ingested: usize,
    pub rows_written: usize,
    pub drivers_ranked: usize,
    pub teams_ranked: usize,
    pub standings_written: usize,
    pub warnings: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    pub fn record_report(&mut self, report: &StandingsReport, written: usize) {
        self.drivers_ranked = report.drivers.len();
        self.teams_ranked = report.teams.len();
        self.standings_written = written;
        self.warnings += report.warnings.len();
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(common: &CommonArgs, config: &Config) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level(&config.logging.level);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("standings_processor={}", log_level)));

    let result = if common.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(common: &CommonArgs) -> Result<Config> {
    let default_config_path = match &common.config_file {
        Some(_) => None,
        None => Config::default_config_path().ok(),
    };

    let config_file = match &common.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    let mut config = Config::load_layered(config_file)?;

    if let Some(data_dir) = &common.data_dir {
        config.store.data_dir = data_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

pub fn open_store(config: &Config) -> Result<JsonFileStore> {
    info!("Using result store at {}", config.store.data_dir.display());
    JsonFileStore::new(&config.store.data_dir, config.store.page_size)
}

/// Fetch, aggregate and (unless `dry_run`) write back a season's standings.
///
/// Everything is fetched before anything is written, so a failed fetch leaves
/// the stored standings untouched. Returns the report and the number of
/// standings written.
pub fn recompute_standings<S: ResultStore + ?Sized>(
    store: &S,
    season: &str,
    dry_run: bool,
    show_progress: bool,
) -> Result<(StandingsReport, usize)> {
    let results = store
        .fetch_all_results(season)
        .map_err(|e| fetch_failure(season, "results", e))?;
    let standings = store
        .fetch_standings(season)
        .map_err(|e| fetch_failure(season, "standings", e))?;

    let report = SeasonStandingsAggregator::new(season, &results)?
        .aggregate(&standings.drivers, &standings.teams);

    if dry_run {
        info!("Dry run: standings for season {} not written", season);
        return Ok((report, 0));
    }

    let total = report.drivers.len() + report.teams.len();
    let progress = show_progress.then(|| create_progress_bar(total as u64, "Writing standings"));

    let mut written = 0;
    for stats in &report.drivers {
        store.update_driver_standing(season, stats)?;
        written += 1;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    for stats in &report.teams {
        store.update_team_standing(season, stats)?;
        written += 1;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message("Standings written");
    }

    info!("Season {}: wrote {} standings", season, written);
    Ok((report, written))
}

fn fetch_failure(season: &str, what: &str, error: Error) -> Error {
    match error {
        Error::DataFetch { .. } => error,
        other => Error::data_fetch(season, what, other.to_string()),
    }
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print the ranked standings as coloured tables
pub fn print_standings(report: &StandingsReport) {
    println!(
        "\n{}",
        format!("Season {} standings", report.season).bold()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("{}", "Drivers".bold().underline());
    println!(
        "{:>4}  {:<24} {:>6} {:>5} {:>7} {:>5} {:>5}",
        "POS", "DRIVER", "PTS", "WINS", "PODIUMS", "POLES", "GPS"
    );
    for driver in &report.drivers {
        let name = driver
            .season_grid_id
            .as_deref()
            .map(|grid| format!("{} ({})", driver.standings_id, grid))
            .unwrap_or_else(|| driver.standings_id.clone());
        let line = format!(
            "{:>4}  {:<24} {:>6} {:>5} {:>7} {:>5} {:>5}",
            driver.position,
            name,
            driver.points,
            driver.race.wins,
            driver.race.podiums,
            driver.race_qualifying.poles,
            driver.grand_prix_count
        );
        println!("{}", highlight(driver.position, line));
    }

    println!("\n{}", "Teams".bold().underline());
    println!("{:>4}  {:<24} {:>6} {:>5} {:>8}", "POS", "TEAM", "PTS", "WINS", "AVG/RACE");
    for team in &report.teams {
        let line = format!(
            "{:>4}  {:<24} {:>6} {:>5} {:>8.2}",
            team.position, team.standings_id, team.points, team.race.wins, team.race.avg_points
        );
        println!("{}", highlight(team.position, line));
    }

    if !report.warnings.is_empty() {
        println!(
            "\n{} {} data warnings (run with -v for details)",
            "⚠️ ".yellow(),
            report.warnings.len()
        );
        for message in &report.warnings {
            warn!("{}", message);
        }
    }
    println!();
}

fn highlight(position: u32, line: String) -> ColoredString {
    match position {
        1 => line.green().bold(),
        2 | 3 => line.green(),
        _ => line.normal(),
    }
}

pub fn print_report_json(report: &StandingsReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::json("<stdout>", "Failed to serialize standings report", e))?;
    println!("{}", json);
    Ok(())
}

/// Print the end-of-run summary
pub fn print_summary(stats: &ProcessingStats) {
    println!("{}", "Run summary".bold());
    if stats.sessions_ingested > 0 {
        println!("   • Sessions ingested: {}", stats.sessions_ingested);
        println!("   • Result rows written: {}", stats.rows_written);
    }
    if stats.drivers_ranked > 0 || stats.teams_ranked > 0 {
        println!("   • Drivers ranked: {}", stats.drivers_ranked);
        println!("   • Teams ranked: {}", stats.teams_ranked);
        println!("   • Standings written: {}", stats.standings_written);
    }
    if stats.warnings > 0 {
        println!("   • {}: {}", "Warnings".yellow(), stats.warnings);
    }
    println!("   • Processing time: {:.2?}", stats.processing_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{DriverStandingRecord, RaceInfo, SessionKind};
    use crate::app::services::result_store::{SeasonDocument, StoredDriverStanding};
    use tempfile::TempDir;

    fn common(data_dir: &std::path::Path, config_file: Option<std::path::PathBuf>) -> CommonArgs {
        CommonArgs {
            config_file,
            data_dir: Some(data_dir.to_path_buf()),
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_load_configuration_applies_cli_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[store]\npage_size = 7\ndata_dir = \"/elsewhere\"\n").unwrap();

        let config = load_configuration(&common(temp_dir.path(), Some(config_path))).unwrap();

        assert_eq!(config.store.page_size, 7);
        assert_eq!(config.store.data_dir, temp_dir.path());
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(load_configuration(&common(temp_dir.path(), Some(missing))).is_err());
    }

    #[test]
    fn test_recompute_fails_before_writing_when_season_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path(), 10).unwrap();

        let result = recompute_standings(&store, "2031", false, false);
        assert!(matches!(result, Err(Error::DataFetch { .. })));
    }

    #[test]
    fn test_dry_run_leaves_standings_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path(), 10).unwrap();
        let document = SeasonDocument {
            races: vec![RaceInfo {
                id: "race-1".to_string(),
                kind: SessionKind::Race,
                grand_prix_id: "gp-1".to_string(),
            }],
            driver_standings: vec![StoredDriverStanding {
                record: DriverStandingRecord {
                    id: "d1".to_string(),
                    position: 5,
                    driver_name: None,
                    season_grid_id: Some("grid-1".to_string()),
                    grids: vec![],
                },
                stats: None,
            }],
            ..Default::default()
        };
        store.save_season("2024", &document).unwrap();

        let (report, written) = recompute_standings(&store, "2024", true, false).unwrap();
        assert_eq!(written, 0);
        assert_eq!(report.drivers[0].position, 1);
        assert_eq!(store.load_season("2024").unwrap(), document);

        let (_, written) = recompute_standings(&store, "2024", false, false).unwrap();
        assert_eq!(written, 1);
        let stored = store.load_season("2024").unwrap();
        assert_eq!(stored.driver_standings[0].record.position, 1);
        assert!(stored.driver_standings[0].stats.is_some());
    }
}
