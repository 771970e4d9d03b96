//! Core business logic services

pub mod result_normalizer;
pub mod result_store;
pub mod season_grid;
pub mod session_ingest;
pub mod standings;
pub mod table_source;
