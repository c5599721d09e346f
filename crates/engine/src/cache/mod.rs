//! Simulated read-ahead block cache.
//!
//! This module implements the cache replayed against one session's request
//! trace. The cache is append-only: a dense block bitmap sized to the file
//! at construction, where blocks become present through client fetches or
//! background prefetch and are never evicted. It models:
//! 1. **Request accounting:** True requested bytes vs. whole-block downloads,
//!    cache hits, and the padding incurred by block granularity.
//! 2. **Trip accounting:** Network round trips per logical request, chunked
//!    at 128 MiB.
//! 3. **Prefetch:** A left-to-right cursor filling blocks at a configured
//!    byte rate between requests, with fractional carry.

/// Pure block/request interval intersection.
pub mod overlap;

use std::collections::BTreeSet;

use tracing::{error, warn};

use self::overlap::block_overlap;
use crate::common::constants::MAX_TRIP_BYTES;
use crate::config::SimConfig;
use crate::stats::{CacheCounters, CacheRatios};

/// Simulated cache state for one (session, configuration) pair.
///
/// Driven through one `begin_request` / `read`... / `end_request` cycle per
/// logical request in the trace. A vector read issues one `read` per stored
/// sub-request inside a single cycle; the accumulated distinct blocks are
/// flushed into the bitmap by `end_request`.
#[derive(Debug, Clone)]
pub struct CacheState {
    file_size: u64,
    block_size: u64,
    num_blocks: usize,
    prefetch_rate: f64,

    /// Authoritative cache contents; blocks are never evicted.
    blocks: Vec<bool>,
    /// Distinct blocks newly touched by the in-progress logical request.
    blocks_to_fetch: BTreeSet<usize>,

    prev_bytes_needed: u64,
    pref_carry: f64,
    curr_time: i64,
    prev_time: i64,

    /// Next block the prefetch cursor will try to fill; never wraps.
    pf_block: usize,

    counters: CacheCounters,
}

impl CacheState {
    /// Creates a cache for a file of `file_size` bytes under `config`.
    ///
    /// The caller is expected to have validated the configuration; see
    /// [`SimConfig::validate`].
    pub fn new(file_size: u64, config: &SimConfig) -> Self {
        let num_blocks = file_size.div_ceil(config.block_size) as usize;

        Self {
            file_size,
            block_size: config.block_size,
            num_blocks,
            prefetch_rate: config.prefetch_rate,
            blocks: vec![false; num_blocks],
            blocks_to_fetch: BTreeSet::new(),
            prev_bytes_needed: 0,
            pref_carry: 0.0,
            curr_time: 0,
            prev_time: 0,
            pf_block: 0,
            counters: CacheCounters::default(),
        }
    }

    /// Opens a logical request at time `t` (seconds).
    ///
    /// Snapshots `bytes_needed` for progress detection, then credits the
    /// prefetch cursor with the bytes accumulated since the previous request:
    /// `prefetch_rate * elapsed + carry`. The credit is converted to whole
    /// blocks (rounding up, the remainder carried — negative after rounding
    /// up, so the next interval repays the borrow) and that many not-yet-present
    /// blocks are marked scanning forward. Already-present blocks consume
    /// cursor positions without being recounted. With a zero rate, or once
    /// the cursor has passed the last block, the full credit is carried
    /// forward unconsumed.
    pub fn begin_request(&mut self, t: i64) {
        self.prev_bytes_needed = self.counters.bytes_needed;

        self.prev_time = self.curr_time;
        self.curr_time = t;

        let pf = self.prefetch_rate * (t - self.prev_time) as f64 + self.pref_carry;
        if pf > 0.0 && self.pf_block < self.num_blocks {
            let mut to_mark = (pf / self.block_size as f64).ceil() as i64;
            self.pref_carry = pf - self.block_size as f64 * to_mark as f64;

            while to_mark > 0 {
                if !self.blocks[self.pf_block] {
                    self.blocks[self.pf_block] = true;
                    to_mark -= 1;

                    self.counters.bytes_prefetched += self.block_size;
                    self.counters.trips_prefetched += 1;
                }

                self.pf_block += 1;
                if self.pf_block >= self.num_blocks {
                    break;
                }
            }
        } else {
            self.pref_carry = pf;
        }
    }

    /// Processes one sub-request: a single read, or one piece of a vector
    /// read.
    ///
    /// Chops the range into blocks and accounts each one: overlap length
    /// into `bytes_needed`; resident blocks into `bytes_saved`; first-seen
    /// absent blocks charge a whole block to `bytes_done` plus its padding
    /// to `bytes_extra`; blocks already slated for fetch by an earlier
    /// sub-request instead reduce `bytes_extra` by this overlap, since those
    /// bytes no longer count as padding.
    ///
    /// A range extending past the file is upstream data corruption; it is
    /// logged and dropped without touching any counter.
    pub fn read(&mut self, req_off: u64, req_len: u64) {
        if req_off + req_len > self.file_size {
            warn!(
                file_size = self.file_size,
                req_off, req_len, "request past end of file, dropping"
            );
            return;
        }
        if req_len == 0 {
            return;
        }

        let b_min = (req_off / self.block_size) as usize;
        let b_max = ((req_off + req_len - 1) / self.block_size + 1) as usize;

        for block in b_min..b_max {
            let Some(ovlp) = block_overlap(block, self.block_size, req_off, req_len) else {
                // Candidate range guarantees an overlap; reaching this is a bug,
                // skip the block and keep the session.
                error!(block, req_off, req_len, "candidate block does not overlap request");
                continue;
            };

            self.counters.bytes_needed += ovlp.len;

            if self.blocks[block] {
                self.counters.bytes_saved += ovlp.len;
            } else if self.blocks_to_fetch.insert(block) {
                self.counters.bytes_done += self.block_size;
                self.counters.bytes_extra += (self.block_size - ovlp.len) as i64;
            } else {
                self.counters.bytes_extra -= ovlp.len as i64;
            }
        }
    }

    /// Closes the current logical request.
    ///
    /// Derives the trips implied by the blocks accumulated this request
    /// (one per started 128 MiB), or counts a saved trip when everything was
    /// cache-resident, then commits the fetched blocks to the bitmap.
    pub fn end_request(&mut self) {
        self.counters.trips_needed += 1;

        let fetched = self.blocks_to_fetch.len() as u64 * self.block_size;
        let trips = if fetched > 0 {
            (fetched - 1) / MAX_TRIP_BYTES + 1
        } else {
            0
        };

        if trips > 0 {
            self.counters.trips_done += trips;
            self.counters.trips_extra += trips - 1;
        } else {
            self.counters.trips_saved += 1;
        }

        for &block in &self.blocks_to_fetch {
            self.blocks[block] = true;
        }
        self.blocks_to_fetch.clear();
    }

    /// End-of-session hook; no bookkeeping today.
    pub fn finish(&mut self) {}

    /// The accumulated counters.
    pub fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    /// Derives the ratio set from the current counters.
    pub fn ratios(&self) -> CacheRatios {
        CacheRatios::from_counters(&self.counters, self.file_size)
    }

    /// `bytes_needed` as of the latest `begin_request`.
    pub fn prev_bytes_needed(&self) -> u64 {
        self.prev_bytes_needed
    }

    /// Number of blocks the file is divided into.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Whether a block is cache-resident.
    ///
    /// # Panics
    ///
    /// Panics when `block >= num_blocks()`.
    pub fn block_present(&self, block: usize) -> bool {
        self.blocks[block]
    }
}
