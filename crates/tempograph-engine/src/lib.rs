//! # tempograph-engine
//!
//! The main entry point for Tempograph: the temporal graph and its
//! configuration.
//!
//! ## Modules
//!
//! - [`graph`] - TemporalGraph, point-in-time queries, and purging
//! - [`config`] - Configuration options
//! - [`shared`] - Reader/writer lock wrapper for multi-threaded use

pub mod config;
pub mod graph;
pub mod shared;

pub use config::Config;
pub use graph::{PurgeStats, TemporalGraph};
pub use shared::SharedTemporalGraph;
