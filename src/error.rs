//! Error handling for standings processing operations.
//!
//! Only conditions that make a whole run meaningless surface as errors:
//! unreadable inputs, a store that cannot be fetched from or written to, and
//! broken invariants in the fetched data. Per-row problems are logged and
//! counted instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in file '{path}': {message}")]
    CsvParsing {
        path: PathBuf,
        message: String,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in '{path}': {message}")]
    Json {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown session kind: '{label}'")]
    UnknownSessionKind { label: String },

    #[error("Race '{race_id}' is not part of season {season}")]
    UnknownRace { race_id: String, season: String },

    #[error("Failed to fetch {what} for season {season}: {message}")]
    DataFetch {
        season: String,
        what: String,
        message: String,
    },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Result store error: {message}")]
    Store { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error for a specific file
    pub fn csv_parsing(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: csv::Error,
    ) -> Self {
        Self::CsvParsing {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a JSON (de)serialization error for a specific file
    pub fn json(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unknown_session_kind(label: impl Into<String>) -> Self {
        Self::UnknownSessionKind {
            label: label.into(),
        }
    }

    pub fn unknown_race(race_id: impl Into<String>, season: impl Into<String>) -> Self {
        Self::UnknownRace {
            race_id: race_id.into(),
            season: season.into(),
        }
    }

    /// Create a fetch failure; these abort an aggregation run before anything is written
    pub fn data_fetch(
        season: impl Into<String>,
        what: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DataFetch {
            season: season.into(),
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
