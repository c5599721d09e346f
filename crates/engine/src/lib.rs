//! Read-ahead cache simulation over remote file-access traces.
//!
//! This crate replays the recorded read requests of one file-access session
//! against a simulated block cache and reports how efficient the transfer
//! would have been. It provides:
//! 1. **Trace model:** Per-session request records (reads, writes, vector reads
//!    with shared sub-request arrays) as supplied by a log-loading layer.
//! 2. **Cache state:** A non-evicting block bitmap driven through a
//!    begin/read/end protocol per logical request, with time-driven prefetch.
//! 3. **Accounting:** Byte and trip counters (needed, done, extra, saved,
//!    prefetched) and the derived efficiency ratios.
//! 4. **Driver:** Session replay for one configuration, progress snapshots at
//!    5% read-volume steps, and a sweep runner over a configuration grid.
//!
//! Histogram bucketing, session filtering and log ingestion are deliberately
//! left to the callers; the engine only consumes an in-memory [`trace::SessionTrace`]
//! and hands results to a [`sim::Reporter`].

/// Cache block bitmap, fetch accounting, and the interval-overlap helper.
pub mod cache;
/// Shared constants and the error taxonomy.
pub mod common;
/// Simulation configuration (single cell and sweep grid).
pub mod config;
/// Session replay driver, reporting traits, and the sweep runner.
pub mod sim;
/// Counter set, derived ratios, and per-session summary statistics.
pub mod stats;
/// Request-trace data model for one file-access session.
pub mod trace;

/// Simulated cache for one (session, configuration) pair; drive it with
/// `begin_request`/`read`/`end_request`.
pub use crate::cache::CacheState;
/// One (block size, prefetch rate) simulation cell.
pub use crate::config::SimConfig;
/// Replays a session trace against one configuration.
pub use crate::sim::simulate_session;
