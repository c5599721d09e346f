//! Shared definitions used across the engine.
//!
//! This module collects the pieces every other module leans on:
//! 1. **Constants:** Transfer chunking and progress-snapshot granularity.
//! 2. **Errors:** Configuration and simulation error types.

/// Fixed engine constants (trip chunk size, progress buckets).
pub mod constants;
/// Error types for configuration validation and simulation entry points.
pub mod error;
