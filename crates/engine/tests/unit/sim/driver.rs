//! Session Replay Driver Tests.
//!
//! Verifies request dispatch (reads, vector reads, skipped writes), the
//! handling of degraded records, progress snapshots at 5% read-volume
//! boundaries, and the determinism of a full replay.

use pretty_assertions::assert_eq;

use iosim_core::config::SimConfig;
use iosim_core::sim::{NullReporter, simulate_session};

use crate::common::{CollectingReporter, TraceBuilder};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

fn config() -> SimConfig {
    SimConfig::new(256 * KIB, 0.0)
}

// ══════════════════════════════════════════════════════════
// 1. Request dispatch
// ══════════════════════════════════════════════════════════

/// A single-read trace produces the same counters as driving the cache by
/// hand; the reference scenario end-to-end through the driver.
#[test]
fn single_reads_replay() {
    let trace = TraceBuilder::new(MIB)
        .span(0, 10)
        .read(0, 0, 300000)
        .read(1, 0, 100000)
        .build();

    let mut reporter = CollectingReporter::default();
    let report = simulate_session(&trace, &config(), &mut reporter).unwrap();

    assert_eq!(report.counters.bytes_needed, 400000);
    assert_eq!(report.counters.bytes_done, 524288);
    assert_eq!(report.counters.bytes_saved, 100000);
    assert_eq!(report.counters.trips_needed, 2);
    assert_eq!(reporter.finals.len(), 1, "exactly one final sample");
}

/// Writes are invisible to the simulation: identical counters with and
/// without them, even with prefetch enabled (a write advances no clock).
#[test]
fn writes_are_skipped() {
    let config = SimConfig::new(256 * KIB, 1000.0);

    let with_writes = TraceBuilder::new(MIB)
        .read(0, 0, 100000)
        .write(5, 0, 500000)
        .read(10, 500000, 100000)
        .build();
    let without_writes = TraceBuilder::new(MIB)
        .read(0, 0, 100000)
        .read(10, 500000, 100000)
        .build();

    let with_report = simulate_session(&with_writes, &config, &mut NullReporter).unwrap();
    let without_report = simulate_session(&without_writes, &config, &mut NullReporter).unwrap();

    assert_eq!(with_report.counters, without_report.counters);
    assert_eq!(with_report.counters.trips_needed, 2);
}

/// A vector read issues one sub-request per stored entry inside one logical
/// request.
#[test]
fn vector_read_replays_stored_subrequests() {
    let trace = TraceBuilder::new(MIB)
        .vec_read(0, &[(0, 1000), (2000, 1000)])
        .build();

    let report = simulate_session(&trace, &config(), &mut NullReporter).unwrap();

    assert_eq!(report.counters.bytes_needed, 2000);
    assert_eq!(report.counters.bytes_done, 256 * KIB);
    assert_eq!(report.counters.trips_needed, 1);
}

/// A vector read without stored detail degrades to an empty cycle: the
/// logical request is counted, no bytes are.
#[test]
fn vector_read_without_detail_degrades() {
    let trace = TraceBuilder::new(MIB)
        .vec_read_no_detail(0, 5000)
        .read(1, 0, 1000)
        .build();

    let report = simulate_session(&trace, &config(), &mut NullReporter).unwrap();

    assert_eq!(report.counters.trips_needed, 2);
    assert_eq!(report.counters.bytes_needed, 1000, "only the real read counts");
}

/// A malformed record (range past the file) is dropped; the rest of the
/// session still simulates.
#[test]
fn malformed_record_does_not_poison_session() {
    let trace = TraceBuilder::new(MIB)
        .read(0, MIB - 100, 10000)
        .read(1, 0, 1000)
        .build();

    let report = simulate_session(&trace, &config(), &mut NullReporter).unwrap();

    assert_eq!(report.counters.bytes_needed, 1000);
    assert_eq!(report.counters.trips_needed, 2);
}

/// An invalid configuration is rejected before any replay.
#[test]
fn invalid_config_is_rejected() {
    let trace = TraceBuilder::new(MIB).read(0, 0, 1000).build();

    let result = simulate_session(&trace, &SimConfig::new(0, 0.0), &mut NullReporter);
    assert!(result.is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Session summary
// ══════════════════════════════════════════════════════════

/// The summary reflects the trace, not the cache: fractions, rate, and
/// duration come straight from the request records.
#[test]
fn summary_reflects_trace() {
    let trace = TraceBuilder::new(MIB)
        .span(100, 300)
        .read(100, 0, 300000)
        .vec_read(200, &[(500000, 50000), (600000, 50000)])
        .build();

    let report = simulate_session(&trace, &config(), &mut NullReporter).unwrap();
    let summary = report.summary;

    assert_eq!(summary.file_size, MIB);
    assert_eq!(summary.duration, 200.0);
    assert_eq!(summary.frac_read, 400000.0 / MIB as f64);
    assert_eq!(summary.frac_vread, 0.25);
    assert_eq!(summary.data_rate, 2000.0);
}

// ══════════════════════════════════════════════════════════
// 3. Progress snapshots
// ══════════════════════════════════════════════════════════

/// Four equal reads of a quarter of the volume each snapshot at 25%, 50%,
/// 75% and 100%.
#[test]
fn quarter_reads_snapshot_at_quarters() {
    let mut builder = TraceBuilder::new(MIB);
    for i in 0..4 {
        builder = builder.read(i as i64, i * 256 * KIB, 256 * KIB);
    }
    let trace = builder.build();

    let mut reporter = CollectingReporter::default();
    let _ = simulate_session(&trace, &config(), &mut reporter).unwrap();

    let fractions: Vec<f64> = reporter.progress.iter().map(|(f, _)| *f).collect();
    assert_eq!(fractions, vec![0.25, 0.5, 0.75, 1.0]);
}

/// Requests that stay inside one 5% bucket emit nothing until a boundary is
/// finally crossed.
#[test]
fn small_requests_do_not_snapshot() {
    // Volume 100000: two 2% reads stay in bucket 0, the final 96% read
    // jumps straight to the last bucket.
    let trace = TraceBuilder::new(MIB)
        .read(0, 0, 2000)
        .read(1, 2000, 2000)
        .read(2, 4000, 96000)
        .build();

    let mut reporter = CollectingReporter::default();
    let _ = simulate_session(&trace, &config(), &mut reporter).unwrap();

    let fractions: Vec<f64> = reporter.progress.iter().map(|(f, _)| *f).collect();
    assert_eq!(fractions, vec![1.0]);
}

/// A trace with no read volume emits no snapshots at all.
#[test]
fn no_read_volume_no_snapshots() {
    let trace = TraceBuilder::new(MIB).write(0, 0, 1000).build();

    let mut reporter = CollectingReporter::default();
    let _ = simulate_session(&trace, &config(), &mut reporter).unwrap();

    assert!(reporter.progress.is_empty());
    assert_eq!(reporter.finals.len(), 1);
}

// ══════════════════════════════════════════════════════════
// 4. Determinism
// ══════════════════════════════════════════════════════════

/// Replaying the identical trace through two independent simulations yields
/// identical reports.
#[test]
fn replay_is_deterministic() {
    let trace = TraceBuilder::new(4 * MIB)
        .span(0, 60)
        .read(0, 0, 300000)
        .vec_read(10, &[(1000000, 20000), (1005000, 20000), (3000000, 4096)])
        .write(20, 0, 100)
        .read(30, 0, 4 * MIB)
        .build();
    let config = SimConfig::new(128 * KIB, 250000.0);

    let first = simulate_session(&trace, &config, &mut NullReporter).unwrap();
    let second = simulate_session(&trace, &config, &mut NullReporter).unwrap();

    assert_eq!(first, second);
}
