//! Graph configuration.

use serde::{Deserialize, Serialize};
use tempograph_common::Timestamp;
use tempograph_core::SeriesCodec;

/// Configuration for a [`TemporalGraph`](crate::TemporalGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Instant every graph time offset is measured from.
    ///
    /// Timestamps before it, or more than `i32::MAX` milliseconds after it,
    /// are rejected.
    pub reference_time: Timestamp,

    /// Codec for integer property series.
    pub series_codec: SeriesCodec,

    /// Number of properties to reserve room for up front.
    pub initial_property_capacity: usize,
}

impl Config {
    /// Creates a configuration with defaults and the given reference time.
    #[must_use]
    pub fn new(reference_time: Timestamp) -> Self {
        Self {
            reference_time,
            series_codec: SeriesCodec::default(),
            initial_property_capacity: 0,
        }
    }

    /// Sets the codec used for integer property series.
    #[must_use]
    pub fn with_series_codec(mut self, codec: SeriesCodec) -> Self {
        self.series_codec = codec;
        self
    }

    /// Sets the initial property store capacity.
    #[must_use]
    pub fn with_property_capacity(mut self, capacity: usize) -> Self {
        self.initial_property_capacity = capacity;
        self
    }
}

impl Default for Config {
    /// Uses the current wall-clock time as the reference.
    fn default() -> Self {
        Self::new(Timestamp::now())
    }
}
