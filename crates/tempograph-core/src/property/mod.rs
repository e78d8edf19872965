//! Property time series and their compressed store.
//!
//! - [`TemporalProperty`] - One property's append-only value history
//! - [`PropertyStore`] - Id-keyed store holding histories in compressed form

mod store;
mod temporal;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempograph_common::Value;

pub use store::{CompressedProperty, PropertyStore};
pub use temporal::TemporalProperty;

/// A property's value as of some queried instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedPropertyValue {
    /// Property name.
    pub name: Arc<str>,
    /// Value in effect at the queried instant.
    pub value: Value,
}

impl TimestampedPropertyValue {
    /// Creates a new name/value pair.
    pub fn new(name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for TimestampedPropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
