//! Session replay and reporting.
//!
//! The driver wires a [`crate::trace::SessionTrace`] to a
//! [`crate::cache::CacheState`]: it replays the requests in order, feeds the
//! protocol, emits progress snapshots, and hands the final ratios and session
//! summary to a reporter. A sweep runner repeats this over a configuration
//! grid.

/// Per-session driver, reporter traits, and the sweep runner.
pub mod driver;

pub use self::driver::{
    NullReporter, Reporter, SessionReport, SweepReporter, simulate_session, simulate_sweep,
};
