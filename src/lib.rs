//! Stockwatch - Watchlist-Driven Stock Tracker
//!
//! Tracks a user-curated set of ticker symbols, pulls historical daily
//! price bars for the active subset, derives SMA and RSI, and reconciles
//! the results into a SQLite time-series store keyed by (symbol, date).
//! One binary invocation runs one ingestion pass; an external scheduler
//! re-invokes it and is poked over HTTP whenever the watchlist changes.

pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod indicators;
pub mod notifier;
pub mod services;
