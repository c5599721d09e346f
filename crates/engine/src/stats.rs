//! Accounting structures for the cache simulation.
//!
//! This module holds the raw counters a [`crate::cache::CacheState`]
//! accumulates, the efficiency ratios derived from them, and the auxiliary
//! per-session summary handed to reporting alongside the ratios:
//! 1. **Counters:** Bytes and trips — needed, done, extra, saved, prefetched.
//! 2. **Ratios:** The eleven derived metrics (done/requested, saved/done, ...).
//! 3. **Summary:** Fraction of file read, vector-read share, data rate,
//!    duration, file size.

use crate::trace::SessionTrace;

/// Byte and trip counters of one simulated session.
///
/// All counters grow monotonically except `bytes_extra`, which is reduced
/// when a later sub-request of the same logical request re-requests bytes
/// previously charged as block padding; pathological overlap patterns can
/// drive it negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Bytes actually requested by the client (true overlap sizes).
    pub bytes_needed: u64,
    /// Logical client requests processed.
    pub trips_needed: u64,
    /// Bytes downloaded on behalf of client requests, in whole blocks.
    pub bytes_done: u64,
    /// Network trips those downloads took (128 MiB per trip).
    pub trips_done: u64,
    /// Padding bytes downloaded beyond what was requested; reusable later,
    /// see `bytes_saved`.
    pub bytes_extra: i64,
    /// Trips beyond the unavoidable first one per fetching request.
    pub trips_extra: u64,
    /// Requested bytes that were already cache-resident.
    pub bytes_saved: u64,
    /// Requests served entirely from cache.
    pub trips_saved: u64,
    /// Bytes filled by the background prefetch cursor.
    pub bytes_prefetched: u64,
    /// Blocks the prefetch cursor filled.
    pub trips_prefetched: u64,
}

impl CacheCounters {
    /// Prints the trips/bytes table to stdout for diagnostics.
    pub fn print(&self) {
        println!("  needed     {:>7}   {}", self.trips_needed, self.bytes_needed);
        println!("  done       {:>7}   {}", self.trips_done, self.bytes_done);
        println!("  extra      {:>7}   {}", self.trips_extra, self.bytes_extra);
        println!("  saved      {:>7}   {}", self.trips_saved, self.bytes_saved);
        println!(
            "  prefetched {:>7}   {}",
            self.trips_prefetched, self.bytes_prefetched
        );
    }
}

/// Efficiency ratios derived from [`CacheCounters`] and the file size.
///
/// Plain floating-point division; a session with no requested bytes yields
/// infinities or NaNs, which downstream bucketing treats as overflow. The
/// `unused_*` metrics subtract the saved sum from the extra sum without
/// verifying that the same bytes are involved — a documented approximation
/// of wasted bandwidth, not an exact reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheRatios {
    /// Bytes downloaded for requests / bytes requested.
    pub done_over_req: f64,
    /// Bytes downloaded including prefetch / bytes requested.
    pub gotten_over_req: f64,
    /// Bytes downloaded including prefetch / file size.
    pub gotten_over_fs: f64,
    /// Bytes served from cache / bytes requested.
    pub saved_over_req: f64,
    /// Requests served entirely from cache / requests processed.
    pub trips_saved_over_req: f64,
    /// Padding bytes / bytes requested.
    pub extra_over_req: f64,
    /// Padding bytes / file size.
    pub extra_over_fs: f64,
    /// Never-reused padding bytes (extra - saved) / bytes requested.
    pub unused_over_req: f64,
    /// Never-reused padding bytes / file size.
    pub unused_over_fs: f64,
    /// Bytes served from cache / bytes downloaded.
    pub saved_over_done: f64,
    /// Padding bytes / bytes downloaded.
    pub extra_over_done: f64,
}

impl CacheRatios {
    /// Derives the ratio set from final or in-flight counters.
    pub fn from_counters(counters: &CacheCounters, file_size: u64) -> Self {
        let needed = counters.bytes_needed as f64;
        let done = counters.bytes_done as f64;
        let extra = counters.bytes_extra as f64;
        let saved = counters.bytes_saved as f64;
        let prefetched = counters.bytes_prefetched as f64;
        let fs = file_size as f64;

        Self {
            done_over_req: done / needed,
            gotten_over_req: (done + prefetched) / needed,
            gotten_over_fs: (done + prefetched) / fs,
            saved_over_req: saved / needed,
            trips_saved_over_req: counters.trips_saved as f64 / counters.trips_needed as f64,
            extra_over_req: extra / needed,
            extra_over_fs: extra / fs,
            unused_over_req: (extra - saved) / needed,
            unused_over_fs: (extra - saved) / fs,
            saved_over_done: saved / done,
            extra_over_done: extra / done,
        }
    }
}

/// Auxiliary statistics of one session, reported next to the final ratios.
///
/// Values are raw; any log-scaling for bucketing belongs to the reporting
/// layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    /// Total bytes read / file size (can exceed 1 for re-reads).
    pub frac_read: f64,
    /// Vector-read bytes / total bytes read.
    pub frac_vread: f64,
    /// Average data rate over the session in bytes per second.
    pub data_rate: f64,
    /// Session duration in seconds.
    pub duration: f64,
    /// Size of the accessed file in bytes.
    pub file_size: u64,
}

impl SessionSummary {
    /// Computes the summary from a session trace.
    pub fn from_trace(trace: &SessionTrace) -> Self {
        let total_read = trace.total_read_bytes() as f64;
        let duration = trace.duration();

        Self {
            frac_read: total_read / trace.file_size as f64,
            frac_vread: trace.vector_read_bytes() as f64 / total_read,
            data_rate: total_read / duration,
            duration,
            file_size: trace.file_size,
        }
    }
}
