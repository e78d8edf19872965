//! # Tempograph
//!
//! An embeddable, time-aware graph index.
//!
//! Start with [`TemporalGraph`]: every vertex, edge, and property value you
//! add carries a timestamp, and every query asks what the graph looked like
//! at some instant. Property histories are kept compressed in memory.
//!
//! ## Time Window
//!
//! Timestamps are milliseconds. The graph stores them as 32-bit offsets from
//! its reference time, so only instants within about 24.8 days after it are
//! accepted. Anything else fails with [`Error::TimeRange`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tempograph::{TemporalGraph, TemporalProperty, Timestamp};
//!
//! let t0 = Timestamp::from_millis(1_700_000_000_000);
//! let mut graph = TemporalGraph::new(t0);
//!
//! // Two routers and a link between them
//! let a = graph.add_vertex([], t0)?;
//! let b = graph.add_vertex([], t0)?;
//! let bandwidth = TemporalProperty::new("bandwidth", t0 + 10)?;
//! let link = graph.add_edge(a, b, [bandwidth], t0 + 10)?;
//!
//! // Record a measurement and read it back
//! graph.add_edge_property(link, "bandwidth", 1_000i64, t0 + 20)?;
//! let value = graph.edge_property_at_time(link, "bandwidth", t0 + 30)?;
//! assert_eq!(value.map(|v| v.value), Some(1_000i64.into()));
//! # Ok::<(), tempograph::Error>(())
//! ```

// Re-export the engine API
pub use tempograph_engine::{Config, PurgeStats, SharedTemporalGraph, TemporalGraph};

// Re-export core types - you'll need these for building properties and reading values
pub use tempograph_common::{
    CodecError, EdgeId, EntityKind, EntityRef, Error, PropertyId, Result, Timestamp, Value,
    VertexId,
};
pub use tempograph_core::{SeriesCodec, TemporalProperty, TimestampedPropertyValue};

// Lower-level building blocks: codecs, property storage, and indices
pub use tempograph_core::{index, property, storage};
