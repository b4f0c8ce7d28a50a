//! Business logic services

pub mod ingest;
pub mod watchlist;

pub use ingest::{IngestService, PassSummary};
pub use watchlist::WatchlistService;
