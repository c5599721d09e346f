//! Error types for the simulation engine.
//!
//! Only configuration problems are hard errors; per-request sanity failures
//! during a replay are logged and skipped so that one malformed record never
//! discards a whole session.

use thiserror::Error;

/// Rejected simulation parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Block size must be a positive number of bytes.
    #[error("block size must be positive, got {0}")]
    InvalidBlockSize(u64),

    /// Prefetch rate must be zero (disabled) or positive.
    #[error("prefetch rate must be non-negative, got {0}")]
    NegativePrefetchRate(f64),

    /// A sweep axis with no entries would simulate nothing.
    #[error("sweep axis `{0}` is empty")]
    EmptySweepAxis(&'static str),
}

/// Failure of a simulation entry point.
///
/// A replay itself cannot fail once it starts; everything that can go wrong
/// is rejected up front.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The supplied configuration did not validate.
    #[error("invalid simulation configuration: {0}")]
    Config(#[from] ConfigError),
}
