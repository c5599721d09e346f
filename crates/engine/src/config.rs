//! Configuration for the cache simulation.
//!
//! This module defines the parameter structures the engine is driven with:
//! 1. **`SimConfig`:** One simulation cell — a block size and a prefetch rate.
//! 2. **`SweepConfig`:** The grid of cells simulated per session, with the
//!    historically used default axes (8 block sizes x 6 prefetch rates).
//!
//! Configuration is built programmatically or deserialized from JSON; every
//! field has a default so partial documents work.

use std::fmt;

use serde::Deserialize;

use crate::common::constants::{KIB, MIB};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulation.
mod defaults {
    /// Default cache block size (1 MiB).
    pub const BLOCK_SIZE: u64 = 1024 * 1024;

    /// Default prefetch rate (disabled).
    pub const PREFETCH_RATE: f64 = 0.0;

    /// Sweep block sizes in KiB: 64 kB through 8 MB, doubling.
    pub const SWEEP_BLOCK_SIZES_KB: [u64; 8] = [64, 128, 256, 512, 1024, 2048, 4096, 8192];

    /// Sweep prefetch rates in MB/s: off, then 256 kB/s through 64 MB/s.
    pub const SWEEP_PREFETCH_RATES_MBS: [f64; 6] = [0.0, 0.25, 1.0, 4.0, 16.0, 64.0];
}

/// Parameters of one simulated cache: block granularity and background
/// prefetch rate.
///
/// # Examples
///
/// ```
/// use iosim_core::config::SimConfig;
///
/// let config = SimConfig::new(256 * 1024, 0.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "BS_256kB PF_0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SimConfig {
    /// Cache block size in bytes; all fetches are rounded up to whole blocks.
    #[serde(default = "SimConfig::default_block_size")]
    pub block_size: u64,

    /// Background prefetch rate in bytes per second; zero disables prefetch.
    #[serde(default = "SimConfig::default_prefetch_rate")]
    pub prefetch_rate: f64,
}

impl SimConfig {
    /// Creates a configuration from a block size in bytes and a prefetch rate
    /// in bytes per second.
    pub fn new(block_size: u64, prefetch_rate: f64) -> Self {
        Self {
            block_size,
            prefetch_rate,
        }
    }

    /// Checks that the parameters describe a simulatable cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] for a zero block size and
    /// [`ConfigError::NegativePrefetchRate`] for a negative rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        if self.prefetch_rate < 0.0 {
            return Err(ConfigError::NegativePrefetchRate(self.prefetch_rate));
        }
        Ok(())
    }

    /// Returns the default cache block size.
    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default prefetch rate.
    fn default_prefetch_rate() -> f64 {
        defaults::PREFETCH_RATE
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            prefetch_rate: defaults::PREFETCH_RATE,
        }
    }
}

impl fmt::Display for SimConfig {
    /// Formats the cell as `BS_<size> PF_<rate>`, the naming used for
    /// per-cell output directories.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BS_{} PF_{}",
            format_bytes(self.block_size),
            format_rate(self.prefetch_rate)
        )
    }
}

/// Grid of simulation cells run per session.
///
/// Axes are kept in the units the original analysis used — block sizes in
/// KiB, prefetch rates in MB/s — and expanded to byte-valued [`SimConfig`]
/// cells by [`SweepConfig::configs`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SweepConfig {
    /// Block-size axis in KiB.
    #[serde(default = "SweepConfig::default_block_sizes_kb")]
    pub block_sizes_kb: Vec<u64>,

    /// Prefetch-rate axis in MB/s.
    #[serde(default = "SweepConfig::default_prefetch_rates_mbs")]
    pub prefetch_rates_mbs: Vec<f64>,
}

impl SweepConfig {
    /// Checks that both axes are non-empty and every cell validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySweepAxis`] for an empty axis, or the
    /// first per-cell validation failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_sizes_kb.is_empty() {
            return Err(ConfigError::EmptySweepAxis("block_sizes_kb"));
        }
        if self.prefetch_rates_mbs.is_empty() {
            return Err(ConfigError::EmptySweepAxis("prefetch_rates_mbs"));
        }
        for config in self.configs() {
            config.validate()?;
        }
        Ok(())
    }

    /// Iterates the grid rate-major: all block sizes for the first prefetch
    /// rate, then all block sizes for the second, and so on.
    pub fn configs(&self) -> impl Iterator<Item = SimConfig> + '_ {
        self.prefetch_rates_mbs.iter().flat_map(move |&rate_mbs| {
            self.block_sizes_kb.iter().map(move |&bs_kb| SimConfig {
                block_size: bs_kb * KIB,
                prefetch_rate: rate_mbs * MIB as f64,
            })
        })
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.block_sizes_kb.len() * self.prefetch_rates_mbs.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the default block-size axis.
    fn default_block_sizes_kb() -> Vec<u64> {
        defaults::SWEEP_BLOCK_SIZES_KB.to_vec()
    }

    /// Returns the default prefetch-rate axis.
    fn default_prefetch_rates_mbs() -> Vec<f64> {
        defaults::SWEEP_PREFETCH_RATES_MBS.to_vec()
    }
}

impl Default for SweepConfig {
    /// Creates the historically used 48-cell grid.
    fn default() -> Self {
        Self {
            block_sizes_kb: Self::default_block_sizes_kb(),
            prefetch_rates_mbs: Self::default_prefetch_rates_mbs(),
        }
    }
}

/// Formats a byte count with a kB/MB suffix where it divides evenly.
fn format_bytes(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}kB", bytes / KIB)
    } else {
        format!("{bytes}B")
    }
}

/// Formats a byte rate, `0` when prefetch is disabled.
fn format_rate(rate: f64) -> String {
    if rate <= 0.0 {
        "0".to_string()
    } else if rate >= MIB as f64 && (rate % MIB as f64) == 0.0 {
        format!("{}MBps", rate / MIB as f64)
    } else if rate >= KIB as f64 && (rate % KIB as f64) == 0.0 {
        format!("{}kBps", rate / KIB as f64)
    } else {
        format!("{rate}Bps")
    }
}
