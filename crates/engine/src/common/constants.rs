//! Fixed constants of the simulation engine.

/// Maximum bytes moved in one network trip (128 MiB).
///
/// Block fetches accumulated over one logical request are chunked into
/// trips of at most this size when deriving trip counts.
pub const MAX_TRIP_BYTES: u64 = 128 * 1024 * 1024;

/// Number of progress buckets per session (20 buckets of 5% each).
///
/// The driver emits an intermediate ratio snapshot whenever cumulative
/// requested bytes cross into a new bucket of the session's total read
/// volume.
pub const PROGRESS_BUCKETS: u64 = 20;

/// One kibibyte, the unit of sweep-grid block sizes.
pub const KIB: u64 = 1024;

/// One mebibyte, the unit of sweep-grid prefetch rates.
pub const MIB: u64 = 1024 * 1024;
