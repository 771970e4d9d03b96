//! Session ingest pipeline
//!
//! Fetches one session's classification table, normalizes it and writes the
//! rows to the result store. A session that already has stored rows is never
//! ingested twice.

use crate::app::models::{SessionContext, SessionKind};
use crate::app::services::result_normalizer::{
    ParseStats, QualifyingSessionIds, RowLayout, RowNormalizer, assign_segments,
};
use crate::app::services::result_store::ResultStore;
use crate::app::services::season_grid::SeasonGrid;
use crate::app::services::table_source::{SessionLocator, TableSource};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// One session to ingest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub season: String,
    /// Session id in the store; for qualifying, the final segment's id
    pub race_id: String,
    pub session_kind: SessionKind,
    /// Event path the classification tables are published under
    pub event: String,
    /// Ids of the first and middle knockout segments (qualifying only)
    pub first_segment_id: Option<String>,
    pub middle_segment_id: Option<String>,
}

impl IngestRequest {
    pub fn new(
        season: impl Into<String>,
        race_id: impl Into<String>,
        session_kind: SessionKind,
        event: impl Into<String>,
    ) -> Self {
        Self {
            season: season.into(),
            race_id: race_id.into(),
            session_kind,
            event: event.into(),
            first_segment_id: None,
            middle_segment_id: None,
        }
    }

    pub fn with_segment_ids(
        mut self,
        first: Option<impl Into<String>>,
        middle: Option<impl Into<String>>,
    ) -> Self {
        self.first_segment_id = first.map(Into::into);
        self.middle_segment_id = middle.map(Into::into);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Rows already stored for this session; nothing written
    AlreadyProcessed { existing: usize },
    /// Session type that is not ingested on its own
    Skipped { reason: String },
    Uploaded { rows: usize, stats: ParseStats },
}

pub struct SessionIngest<'a, T: TableSource + ?Sized, S: ResultStore + ?Sized> {
    tables: &'a T,
    store: &'a S,
}

impl<'a, T: TableSource + ?Sized, S: ResultStore + ?Sized> SessionIngest<'a, T, S> {
    pub fn new(tables: &'a T, store: &'a S) -> Self {
        Self { tables, store }
    }

    pub fn ingest(&self, request: &IngestRequest) -> Result<IngestOutcome> {
        let kind = request.session_kind;
        info!(
            "Ingesting {} session {} ({}) for season {}",
            kind, request.race_id, request.event, request.season
        );

        let existing = self
            .store
            .existing_result_count(&request.season, &request.race_id)?;
        if existing > 0 {
            info!(
                "Session {} already has {} stored results, skipping",
                request.race_id, existing
            );
            return Ok(IngestOutcome::AlreadyProcessed { existing });
        }

        if kind.is_intermediate_segment() {
            return Ok(skipped(format!(
                "{} rows are produced when the final qualifying segment is ingested",
                kind
            )));
        }
        if kind == SessionKind::FastestLaps {
            return Ok(skipped("fastest lap tables are not stored as results".to_string()));
        }

        let race = self.store.race_info(&request.season, &request.race_id)?;
        if race.kind != kind {
            return Err(Error::invariant_violation(format!(
                "session {} is scheduled as {}, not {}",
                request.race_id, race.kind, kind
            )));
        }

        let grid = SeasonGrid::from_entries(
            &request.season,
            &self.store.season_grid(&request.season)?,
        );
        let table = self
            .tables
            .fetch_table(&SessionLocator::new(&request.event, kind))?;
        debug!("Fetched {} table rows for {}", table.len(), request.race_id);

        let context = SessionContext::new(kind, &request.season, &request.race_id);

        let (rows, stats) = match RowLayout::for_session(kind) {
            Some(_) if kind.is_qualifying() => {
                let first = self.unprocessed_segment(request, request.first_segment_id.as_deref())?;
                let middle =
                    self.unprocessed_segment(request, request.middle_segment_id.as_deref())?;
                let ids = QualifyingSessionIds {
                    first: first.id,
                    middle: middle.id,
                    final_segment: request.race_id.clone(),
                };
                let segments = assign_segments(&table, &ids, &context, &grid);
                let stats = segments.combined_stats();
                let rows = segments.into_rows();

                let existing = first.existing + middle.existing;
                if rows.is_empty() && existing > 0 {
                    info!(
                        "Qualifying {}: earlier segments already stored and nothing new to add",
                        request.race_id
                    );
                    return Ok(IngestOutcome::AlreadyProcessed { existing });
                }
                (rows, stats)
            }
            Some(layout) => {
                let result = RowNormalizer::new(layout, &context, &grid).normalize_table(&table);
                (result.rows, result.stats)
            }
            None => {
                return Ok(skipped(format!("no table layout for {} sessions", kind)));
            }
        };

        for warning in &stats.warnings {
            debug!("{}: {}", request.race_id, warning);
        }
        if rows.is_empty() {
            warn!(
                "Session {}: no rows produced from {} table rows",
                request.race_id,
                table.len().saturating_sub(1)
            );
        }

        let written = self.store.create_batch(&request.season, &rows)?;
        info!(
            "Session {}: stored {} rows ({} skipped, {} warnings)",
            request.race_id,
            written,
            stats.rows_skipped,
            stats.warnings.len()
        );

        Ok(IngestOutcome::Uploaded {
            rows: written,
            stats,
        })
    }

    fn unprocessed_segment(&self, request: &IngestRequest, id: Option<&str>) -> Result<SegmentId> {
        let Some(id) = id else {
            return Ok(SegmentId {
                id: None,
                existing: 0,
            });
        };
        let existing = self.store.existing_result_count(&request.season, id)?;
        if existing > 0 {
            info!(
                "Segment {} already has {} stored results, not extracting it again",
                id, existing
            );
            return Ok(SegmentId { id: None, existing });
        }
        Ok(SegmentId {
            id: Some(id.to_string()),
            existing: 0,
        })
    }
}

/// A knockout segment id, dropped when that segment already has stored rows
struct SegmentId {
    id: Option<String>,
    existing: usize,
}

fn skipped(reason: String) -> IngestOutcome {
    info!("Skipping session: {}", reason);
    IngestOutcome::Skipped { reason }
}
