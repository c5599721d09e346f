//! Replays one session trace against simulated cache configurations.

use crate::cache::CacheState;
use crate::common::constants::PROGRESS_BUCKETS;
use crate::common::error::SimError;
use crate::config::{SimConfig, SweepConfig};
use crate::stats::{CacheCounters, CacheRatios, SessionSummary};
use crate::trace::{RequestKind, SessionTrace};

/// Sink for the results of one simulated session.
///
/// The driver calls `progress_sample` during the replay and `sample` exactly
/// once at the end. Implementations typically record into aggregate buckets;
/// the engine does not care what they do.
pub trait Reporter {
    /// Records the final ratios and session summary.
    fn sample(&mut self, ratios: &CacheRatios, summary: &SessionSummary);

    /// Records an intermediate snapshot at `fraction` (in `(0, 1]`) of the
    /// session's total read volume.
    fn progress_sample(&mut self, ratios: &CacheRatios, fraction: f64);
}

/// Reporter that discards everything; for callers that only want the
/// returned [`SessionReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn sample(&mut self, _ratios: &CacheRatios, _summary: &SessionSummary) {}

    fn progress_sample(&mut self, _ratios: &CacheRatios, _fraction: f64) {}
}

/// Sink for a sweep: the per-session records of every grid cell, keyed by
/// the cell's configuration.
pub trait SweepReporter {
    /// Records the final ratios and summary of one cell.
    fn cell_sample(&mut self, config: &SimConfig, ratios: &CacheRatios, summary: &SessionSummary);

    /// Records an intermediate snapshot of one cell.
    fn cell_progress(&mut self, config: &SimConfig, ratios: &CacheRatios, fraction: f64);
}

/// Adapter presenting one sweep cell as a plain [`Reporter`].
struct CellReporter<'a> {
    config: &'a SimConfig,
    inner: &'a mut dyn SweepReporter,
}

impl Reporter for CellReporter<'_> {
    fn sample(&mut self, ratios: &CacheRatios, summary: &SessionSummary) {
        self.inner.cell_sample(self.config, ratios, summary);
    }

    fn progress_sample(&mut self, ratios: &CacheRatios, fraction: f64) {
        self.inner.cell_progress(self.config, ratios, fraction);
    }
}

/// Everything one simulation produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    /// The configuration simulated.
    pub config: SimConfig,
    /// Final counter values.
    pub counters: CacheCounters,
    /// Ratios derived from the final counters.
    pub ratios: CacheRatios,
    /// Auxiliary session statistics.
    pub summary: SessionSummary,
}

/// Replays `trace` against one cache configuration.
///
/// Writes are skipped — the simulation only models reads. Each read becomes
/// one `begin_request` / `read`... / `end_request` cycle; a vector read
/// issues one `read` per stored sub-request, and degrades to an empty cycle
/// when the log retained no detail. Whenever cumulative requested bytes
/// cross a 5% boundary of the session's total read volume, an intermediate
/// snapshot tagged with the progress fraction goes to the reporter. The
/// final ratios and summary are reported once and also returned.
///
/// # Errors
///
/// Returns [`SimError::Config`] when `config` does not validate.
pub fn simulate_session(
    trace: &SessionTrace,
    config: &SimConfig,
    reporter: &mut dyn Reporter,
) -> Result<SessionReport, SimError> {
    config.validate()?;

    let total_read = trace.total_read_bytes();
    let mut cache = CacheState::new(trace.file_size, config);

    for req in &trace.requests {
        match req.kind {
            RequestKind::Write => continue,
            RequestKind::Read => {
                cache.begin_request(req.time);
                cache.read(req.offset, req.length);
            }
            RequestKind::VecRead => {
                cache.begin_request(req.time);
                if let Some((offsets, lengths)) = trace.subreqs(req) {
                    for (&off, &len) in offsets.iter().zip(lengths) {
                        cache.read(off, len);
                    }
                }
            }
        }
        cache.end_request();

        if total_read > 0 {
            let prev_bucket = PROGRESS_BUCKETS * cache.prev_bytes_needed() / total_read;
            let curr_bucket = PROGRESS_BUCKETS * cache.counters().bytes_needed / total_read;
            if curr_bucket > prev_bucket {
                let fraction = curr_bucket as f64 / PROGRESS_BUCKETS as f64;
                reporter.progress_sample(&cache.ratios(), fraction);
            }
        }
    }

    cache.finish();

    let ratios = cache.ratios();
    let summary = SessionSummary::from_trace(trace);
    reporter.sample(&ratios, &summary);

    Ok(SessionReport {
        config: *config,
        counters: *cache.counters(),
        ratios,
        summary,
    })
}

/// Replays `trace` against every cell of `sweep`, rate-major.
///
/// Each cell is an independent simulation over the same trace; results go to
/// the sweep reporter keyed by the cell configuration and are also returned
/// in grid order.
///
/// # Errors
///
/// Returns [`SimError::Config`] when the sweep grid does not validate.
pub fn simulate_sweep(
    trace: &SessionTrace,
    sweep: &SweepConfig,
    reporter: &mut dyn SweepReporter,
) -> Result<Vec<SessionReport>, SimError> {
    sweep.validate()?;

    let mut reports = Vec::with_capacity(sweep.len());
    for config in sweep.configs() {
        let mut cell = CellReporter {
            config: &config,
            inner: &mut *reporter,
        };
        reports.push(simulate_session(trace, &config, &mut cell)?);
    }

    Ok(reports)
}
