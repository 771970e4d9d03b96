//! Classification table sources
//!
//! A table is a list of rows of cell texts with the header row at index 0,
//! exactly as scraped from a results page. The CSV source reads tables that
//! were saved to disk one file per event and session page.

use crate::app::models::SessionKind;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Identifies one published classification table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLocator {
    /// Event path segment, e.g. `1229/bahrain`
    pub event: String,
    pub session_kind: SessionKind,
}

impl SessionLocator {
    pub fn new(event: impl Into<String>, session_kind: SessionKind) -> Self {
        Self {
            event: event.into(),
            session_kind,
        }
    }

    /// Page slug for this session; knockout segments before the last have none
    pub fn slug(&self) -> Result<&'static str> {
        self.session_kind.table_slug().ok_or_else(|| {
            Error::configuration(format!(
                "{} has no classification table of its own; ingest the final segment instead",
                self.session_kind
            ))
        })
    }
}

/// Anything that can hand out raw classification tables
pub trait TableSource {
    fn fetch_table(&self, locator: &SessionLocator) -> Result<Vec<Vec<String>>>;
}

/// Reads `<tables_dir>/<event>/<slug>.csv`
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    tables_dir: PathBuf,
}

impl CsvTableSource {
    pub fn new(tables_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables_dir: tables_dir.into(),
        }
    }

    pub fn tables_dir(&self) -> &Path {
        &self.tables_dir
    }

    pub fn table_path(&self, locator: &SessionLocator) -> Result<PathBuf> {
        Ok(self
            .tables_dir
            .join(&locator.event)
            .join(format!("{}.csv", locator.slug()?)))
    }
}

impl TableSource for CsvTableSource {
    fn fetch_table(&self, locator: &SessionLocator) -> Result<Vec<Vec<String>>> {
        let path = self.table_path(locator)?;
        info!("Reading {} table: {}", locator.session_kind, path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| Error::csv_parsing(&path, "Failed to open classification table", e))?;

        let mut table = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::csv_parsing(&path, format!("Malformed record at line {}", index + 1), e)
            })?;
            table.push(record.iter().map(str::to_string).collect());
        }

        debug!("Read {} rows (header included) from {}", table.len(), path.display());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_table_with_header_row() {
        let temp_dir = TempDir::new().unwrap();
        let event_dir = temp_dir.path().join("1229/bahrain");
        fs::create_dir_all(&event_dir).unwrap();
        fs::write(
            event_dir.join("race-result.csv"),
            "POS,NO,DRIVER,CAR,LAPS,TIME/RETIRED,PTS\n\
             1, 1 ,Max Verstappen,Red Bull,57,1:31:44.742,25\n\
             NC,2,Logan Sargeant,Williams\n",
        )
        .unwrap();

        let source = CsvTableSource::new(temp_dir.path());
        let table = source
            .fetch_table(&SessionLocator::new("1229/bahrain", SessionKind::Race))
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[0][0], "POS");
        assert_eq!(table[1][1], "1");
        // Short rows are kept; the normalizer drops them
        assert_eq!(table[2].len(), 4);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = CsvTableSource::new(temp_dir.path());

        let result = source.fetch_table(&SessionLocator::new("nowhere", SessionKind::Practice1));
        assert!(matches!(result, Err(Error::CsvParsing { .. })));
    }

    #[test]
    fn test_intermediate_segments_have_no_table() {
        let source = CsvTableSource::new("/tables");

        let q2 = SessionLocator::new("1229/bahrain", SessionKind::Qualifying2);
        assert!(source.table_path(&q2).is_err());

        let q3 = SessionLocator::new("1229/bahrain", SessionKind::Qualifying3);
        assert_eq!(
            source.table_path(&q3).unwrap(),
            PathBuf::from("/tables/1229/bahrain/qualifying.csv")
        );
    }
}
