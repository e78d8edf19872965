//! # tempograph-core
//!
//! Core layer for Tempograph: integer codecs, property time series, and
//! temporal indices.
//!
//! This crate provides the data structures the graph engine is assembled
//! from. It depends only on `tempograph-common`.
//!
//! ## Modules
//!
//! - [`storage`] - Value series encoding (Varint, ZigZag, Delta)
//! - [`property`] - Property histories and the compressed property store
//! - [`index`] - Time buckets and temporal adjacency

pub mod index;
pub mod property;
pub mod storage;

// Re-export commonly used types
pub use index::{TemporalAdjacency, TimeBuckets};
pub use property::{PropertyStore, TemporalProperty, TimestampedPropertyValue};
pub use storage::{EncodedSeries, SeriesCodec, ValueSeries};
