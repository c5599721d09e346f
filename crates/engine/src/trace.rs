//! Request-trace model for one file-access session.
//!
//! A session is the lifetime of one remote file open: a file size, open and
//! close timestamps, and the ordered request records observed in between.
//! Vector reads carry their sub-request detail in shared offset/length
//! arrays; a negative index marks a record whose detail was not retained in
//! the log.
//!
//! The engine consumes this model as-is — how it is loaded (log parsing,
//! deserialization) is the caller's concern. The serde derives exist for the
//! JSON interchange used by the command-line tool and tests.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Kind of one recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Single contiguous read.
    Read,
    /// Write; ignored by the cache simulation.
    Write,
    /// Vector read composed of sub-requests stored in the session arrays.
    VecRead,
}

/// One recorded request of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// What the client did.
    pub kind: RequestKind,

    /// Timestamp in seconds.
    pub time: i64,

    /// Byte offset into the file (zero for vector reads, whose offsets live
    /// in the sub-request arrays).
    #[serde(default)]
    pub offset: u64,

    /// Byte length; for a vector read, the total length of all sub-requests.
    pub length: u64,

    /// Index of the first sub-request in the session arrays; negative when
    /// detail was not retained.
    #[serde(default = "Request::no_subreq_index")]
    pub subreq_index: i64,

    /// Number of sub-requests stored for this record.
    #[serde(default)]
    pub subreqs_stored: u32,
}

impl Request {
    /// Creates a single-read record.
    pub fn read(time: i64, offset: u64, length: u64) -> Self {
        Self {
            kind: RequestKind::Read,
            time,
            offset,
            length,
            subreq_index: Self::no_subreq_index(),
            subreqs_stored: 0,
        }
    }

    /// Creates a write record.
    pub fn write(time: i64, offset: u64, length: u64) -> Self {
        Self {
            kind: RequestKind::Write,
            time,
            offset,
            length,
            subreq_index: Self::no_subreq_index(),
            subreqs_stored: 0,
        }
    }

    /// Creates a vector-read record referencing `subreqs_stored` entries of
    /// the session's sub-request arrays starting at `subreq_index`.
    ///
    /// `length` is the total byte count of the whole vector read, which may
    /// exceed the stored detail when the log truncated it.
    pub fn vec_read(time: i64, length: u64, subreq_index: i64, subreqs_stored: u32) -> Self {
        Self {
            kind: RequestKind::VecRead,
            time,
            offset: 0,
            length,
            subreq_index,
            subreqs_stored,
        }
    }

    /// Sentinel for a vector read without stored detail.
    fn no_subreq_index() -> i64 {
        -1
    }
}

/// The full observed trace of one file-access session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTrace {
    /// Size of the accessed file in bytes.
    pub file_size: u64,

    /// Session open timestamp in seconds.
    #[serde(default)]
    pub open_time: i64,

    /// Session close timestamp in seconds.
    #[serde(default)]
    pub close_time: i64,

    /// Ordered request records.
    pub requests: Vec<Request>,

    /// Shared sub-request offsets referenced by vector-read records.
    #[serde(default)]
    pub subreq_offsets: Vec<u64>,

    /// Shared sub-request lengths referenced by vector-read records.
    #[serde(default)]
    pub subreq_lengths: Vec<u64>,
}

impl SessionTrace {
    /// Returns the stored sub-request detail of a vector read as parallel
    /// offset/length slices, or `None` when detail is absent.
    ///
    /// A stored range pointing outside the session arrays indicates a
    /// corrupt record; it is logged and treated as absent detail.
    pub fn subreqs(&self, req: &Request) -> Option<(&[u64], &[u64])> {
        if req.kind != RequestKind::VecRead || req.subreq_index < 0 {
            return None;
        }

        let beg = req.subreq_index as usize;
        let end = beg + req.subreqs_stored as usize;
        if end > self.subreq_offsets.len() || end > self.subreq_lengths.len() {
            warn!(
                subreq_index = req.subreq_index,
                subreqs_stored = req.subreqs_stored,
                stored = self.subreq_offsets.len(),
                "vector-read detail range outside session arrays, ignoring"
            );
            return None;
        }

        Some((&self.subreq_offsets[beg..end], &self.subreq_lengths[beg..end]))
    }

    /// Total bytes requested by reads and vector reads.
    pub fn total_read_bytes(&self) -> u64 {
        self.requests
            .iter()
            .filter(|r| r.kind != RequestKind::Write)
            .map(|r| r.length)
            .sum()
    }

    /// Total bytes requested by vector reads alone.
    pub fn vector_read_bytes(&self) -> u64 {
        self.requests
            .iter()
            .filter(|r| r.kind == RequestKind::VecRead)
            .map(|r| r.length)
            .sum()
    }

    /// Session duration in seconds; zero when the timestamps are inverted
    /// or missing.
    pub fn duration(&self) -> f64 {
        (self.close_time - self.open_time).max(0) as f64
    }
}
