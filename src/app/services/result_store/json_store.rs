//! File-backed result store
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/<season>/season.json              schedule, grid, standings
//! <data_dir>/<season>/results/page-0000.json   result rows, `page_size` per file
//! ```
//!
//! Every write goes to a temporary file in the target directory which is then
//! persisted over the destination, so a crash never leaves a half-written file.

use super::{ResultStore, SeasonStandings};
use crate::app::models::{
    DriverStandingRecord, RaceInfo, RaceResultRow, SeasonGridEntry, StoredRaceResult,
    TeamStandingRecord,
};
use crate::app::services::standings::EntityStats;
use crate::constants::{RESULT_PAGE_PATTERN, RESULTS_DIR_NAME, SEASON_FILE_NAME};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Driver standing plus the statistics last written for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDriverStanding {
    #[serde(flatten)]
    pub record: DriverStandingRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EntityStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTeamStanding {
    #[serde(flatten)]
    pub record: TeamStandingRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EntityStats>,
}

/// Contents of `season.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDocument {
    #[serde(default)]
    pub races: Vec<RaceInfo>,
    #[serde(default)]
    pub grid: Vec<SeasonGridEntry>,
    #[serde(default)]
    pub driver_standings: Vec<StoredDriverStanding>,
    #[serde(default)]
    pub team_standings: Vec<StoredTeamStanding>,
}

impl SeasonDocument {
    pub fn race(&self, race_id: &str) -> Option<&RaceInfo> {
        self.races.iter().find(|race| race.id == race_id)
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    page_size: usize,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::configuration("Result page size must be at least 1"));
        }
        Ok(Self {
            data_dir: data_dir.into(),
            page_size,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn season_dir(&self, season: &str) -> PathBuf {
        self.data_dir.join(season)
    }

    fn season_file(&self, season: &str) -> PathBuf {
        self.season_dir(season).join(SEASON_FILE_NAME)
    }

    fn results_dir(&self, season: &str) -> PathBuf {
        self.season_dir(season).join(RESULTS_DIR_NAME)
    }

    fn page_path(&self, season: &str, index: usize) -> PathBuf {
        self.results_dir(season).join(format!("page-{:04}.json", index))
    }

    pub fn load_season(&self, season: &str) -> Result<SeasonDocument> {
        let path = self.season_file(season);
        if !path.exists() {
            return Err(Error::data_fetch(
                season,
                "season document",
                format!("{} does not exist", path.display()),
            ));
        }
        read_json(&path)
    }

    /// Replace `season.json`, creating the season directory when needed
    pub fn save_season(&self, season: &str, document: &SeasonDocument) -> Result<()> {
        write_json_atomic(&self.season_file(season), document)
    }

    /// Result page files in page order
    fn result_pages(&self, season: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.results_dir(season).join(RESULT_PAGE_PATTERN);
        let pattern = pattern.to_str().ok_or_else(|| {
            Error::configuration(format!(
                "Data directory is not valid UTF-8: {}",
                self.data_dir.display()
            ))
        })?;

        let mut pages = Vec::new();
        for entry in glob::glob(pattern)
            .map_err(|e| Error::configuration(format!("Invalid result page pattern: {}", e)))?
        {
            let path = entry.map_err(|e| {
                let message = format!("Failed to list result page {}", e.path().display());
                Error::io(message, e.into_error())
            })?;
            if path.is_file() {
                pages.push(path);
            }
        }
        pages.sort();
        Ok(pages)
    }

    fn read_page(&self, path: &Path) -> Result<Vec<StoredRaceResult>> {
        read_json(path)
    }

    /// Stored rows exactly as on disk, without the schedule join
    fn stored_rows(&self, season: &str) -> Result<Vec<StoredRaceResult>> {
        let mut rows = Vec::new();
        for page in self.result_pages(season)? {
            rows.extend(self.read_page(&page)?);
        }
        Ok(rows)
    }

    fn append_rows(&self, season: &str, rows: &[RaceResultRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let document = self.load_season(season)?;
        let mut incoming = Vec::with_capacity(rows.len());
        for row in rows {
            let race = document
                .race(&row.race_id)
                .ok_or_else(|| Error::unknown_race(&row.race_id, season))?;
            incoming.push(StoredRaceResult::new(
                row.clone(),
                race.kind,
                Some(race.grand_prix_id.clone()),
            ));
        }

        let pages = self.result_pages(season)?;
        let (mut index, mut page, previous_last) = match pages.last() {
            Some(last) => {
                let page = self.read_page(last)?;
                (pages.len() - 1, page.clone(), Some(page))
            }
            None => (0, Vec::new(), None),
        };
        let first_index = index;

        let mut staged = Vec::new();
        for stored in incoming {
            if page.len() >= self.page_size {
                let path = self.page_path(season, index);
                staged.push((stage_json(&path, &page)?, path));
                index += 1;
                page = Vec::new();
            }
            page.push(stored);
        }
        let path = self.page_path(season, index);
        staged.push((stage_json(&path, &page)?, path));

        // Every page is serialized before any is persisted; a failed persist
        // restores the pages already moved into place.
        let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (temp, path) in staged {
            if let Err(e) = temp.persist(&path) {
                let error = Error::io(format!("Failed to persist {}", path.display()), e.error);
                self.roll_back_pages(season, first_index, previous_last.as_deref(), &persisted);
                return Err(error);
            }
            persisted.push(path);
        }

        debug!(
            "Season {}: appended {} rows, last page is {}",
            season,
            rows.len(),
            index
        );
        Ok(rows.len())
    }

    fn roll_back_pages(
        &self,
        season: &str,
        first_index: usize,
        previous_last: Option<&[StoredRaceResult]>,
        persisted: &[PathBuf],
    ) {
        let reopened = self.page_path(season, first_index);
        for path in persisted {
            let restored = match previous_last {
                Some(rows) if *path == reopened => write_json_atomic(path, rows),
                _ => fs::remove_file(path)
                    .map_err(|e| Error::io(format!("Failed to remove {}", path.display()), e)),
            };
            if let Err(e) = restored {
                warn!("Season {}: could not roll back {}: {}", season, path.display(), e);
            }
        }
    }

    fn update_standing_stats(
        &self,
        season: &str,
        stats: &EntityStats,
        what: &str,
        apply: impl FnOnce(&mut SeasonDocument) -> bool,
    ) -> Result<()> {
        let mut document = self.load_season(season)?;
        if !apply(&mut document) {
            return Err(Error::store(format!(
                "season {}: no {} standing with id '{}'",
                season, what, stats.standings_id
            )));
        }
        self.save_season(season, &document)
    }
}

impl ResultStore for JsonFileStore {
    fn season_grid(&self, season: &str) -> Result<Vec<SeasonGridEntry>> {
        Ok(self.load_season(season)?.grid)
    }

    fn race_info(&self, season: &str, race_id: &str) -> Result<RaceInfo> {
        self.load_season(season)?
            .race(race_id)
            .cloned()
            .ok_or_else(|| Error::unknown_race(race_id, season))
    }

    fn create(&self, season: &str, row: &RaceResultRow) -> Result<()> {
        self.append_rows(season, std::slice::from_ref(row)).map(|_| ())
    }

    fn create_batch(&self, season: &str, rows: &[RaceResultRow]) -> Result<usize> {
        self.append_rows(season, rows)
    }

    fn existing_result_count(&self, season: &str, race_id: &str) -> Result<usize> {
        Ok(self
            .stored_rows(season)?
            .iter()
            .filter(|stored| stored.row.race_id == race_id)
            .count())
    }

    /// Session type and grand prix come from the current schedule. Rows whose
    /// race is no longer scheduled keep whatever was stored with them.
    fn fetch_all_results(&self, season: &str) -> Result<Vec<StoredRaceResult>> {
        let fetch_error = |e: Error| Error::data_fetch(season, "results", e.to_string());

        let document = self.load_season(season)?;
        let races: HashMap<&str, &RaceInfo> = document
            .races
            .iter()
            .map(|race| (race.id.as_str(), race))
            .collect();

        let mut results = self.stored_rows(season).map_err(fetch_error)?;
        for stored in &mut results {
            if let Some(race) = races.get(stored.row.race_id.as_str()) {
                stored.session_kind = Some(race.kind);
                stored.grand_prix_id = Some(race.grand_prix_id.clone());
            }
        }

        info!("Season {}: fetched {} results", season, results.len());
        Ok(results)
    }

    fn fetch_standings(&self, season: &str) -> Result<SeasonStandings> {
        let document = self.load_season(season)?;
        Ok(SeasonStandings {
            drivers: document
                .driver_standings
                .into_iter()
                .map(|standing| standing.record)
                .collect(),
            teams: document
                .team_standings
                .into_iter()
                .map(|standing| standing.record)
                .collect(),
        })
    }

    fn update_driver_standing(&self, season: &str, stats: &EntityStats) -> Result<()> {
        self.update_standing_stats(season, stats, "driver", |document| {
            match document
                .driver_standings
                .iter_mut()
                .find(|standing| standing.record.id == stats.standings_id)
            {
                Some(standing) => {
                    standing.record.position = stats.position;
                    standing.stats = Some(stats.clone());
                    true
                }
                None => false,
            }
        })
    }

    fn update_team_standing(&self, season: &str, stats: &EntityStats) -> Result<()> {
        self.update_standing_stats(season, stats, "team", |document| {
            match document
                .team_standings
                .iter_mut()
                .find(|standing| standing.record.id == stats.standings_id)
            {
                Some(standing) => {
                    standing.record.position = stats.position;
                    standing.stats = Some(stats.clone());
                    true
                }
                None => false,
            }
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::json(path, "Failed to parse JSON", e))
}

/// Serialize to a temporary sibling file of `path`, not yet persisted
fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::store(format!("{} has no parent directory", path.display())))?;
    fs::create_dir_all(dir)
        .map_err(|e| Error::io(format!("Failed to create directory {}", dir.display()), e))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::io(format!("Failed to create temp file in {}", dir.display()), e))?;
    serde_json::to_writer_pretty(&mut temp, value)
        .map_err(|e| Error::json(path, "Failed to serialize JSON", e))?;
    temp.flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))?;
    Ok(temp)
}

/// Serialize to a temporary sibling file, then rename it over `path`
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    stage_json(path, value)?
        .persist(path)
        .map_err(|e| Error::io(format!("Failed to persist {}", path.display()), e.error))?;
    Ok(())
}
