//! Encoding utilities for property value series.
//!
//! - [`varint`] - Variable-length encoding of non-negative integers
//! - [`zigzag`] - Signed to unsigned mapping for varints
//! - [`delta`] - Base plus successive differences
//! - [`codec`] - Per-series codec selection and the stored blob format
//!
//! # Compression Strategies
//!
//! | Series | Codec | Notes |
//! |--------|-------|-------|
//! | Non-negative counters | Varint | default |
//! | Slowly changing or signed integers | DeltaVarint | opt-in per graph |
//! | Floats, strings, bytes, mixed | none | kept raw |
//!
//! # Example
//!
//! ```
//! use tempograph_common::Value;
//! use tempograph_core::storage::{SeriesCodec, ValueSeries};
//!
//! let values: Vec<Value> = (0..50).map(Value::Int32).collect();
//! let series = ValueSeries::from_values(values.clone(), SeriesCodec::Varint);
//! assert!(series.is_compressed());
//! assert_eq!(series.to_values().unwrap(), values);
//! ```

pub mod codec;
pub mod delta;
pub mod varint;
pub mod zigzag;

pub use codec::{EncodedSeries, MetricType, SeriesCodec, ValueSeries};
pub use delta::DeltaEncoding;
