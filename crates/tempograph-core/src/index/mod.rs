//! Temporal indices.
//!
//! - [`TimeBuckets`] - Ids keyed by the time offset they were first seen at
//! - [`TemporalAdjacency`] - Per-vertex edge buckets

mod adjacency;
mod time_bucket;

pub use adjacency::TemporalAdjacency;
pub use time_bucket::TimeBuckets;
