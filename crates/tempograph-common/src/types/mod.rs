//! Core type definitions for Tempograph.
//!
//! This module contains all fundamental types used throughout the engine:
//! - Identifier types ([`VertexId`], [`EdgeId`], [`PropertyId`])
//! - Temporal types ([`Timestamp`])
//! - Property value types ([`Value`])

mod id;
mod timestamp;
mod value;

pub use id::{EdgeId, EntityKind, EntityRef, PropertyId, VertexId};
pub use timestamp::{MAX_TIME_OFFSET, Timestamp};
pub use value::Value;
