//! # tempograph-common
//!
//! Foundation layer for Tempograph: identifiers, timestamps, values, and errors.
//!
//! This crate provides the fundamental building blocks used by all other
//! Tempograph crates. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions (VertexId, EdgeId, Timestamp, Value, etc.)
//! - [`utils`] - Utility functions and helpers (hashing, errors)

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{EdgeId, EntityKind, EntityRef, PropertyId, Timestamp, Value, VertexId};
pub use utils::error::{CodecError, Error, Result};
