//! Thread-safe handle to a graph.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::graph::TemporalGraph;

/// A cloneable, thread-safe handle to a [`TemporalGraph`].
///
/// The graph itself does no locking. This wrapper serializes writers and
/// lets any number of readers run between writes.
///
/// # Example
///
/// ```
/// use tempograph_common::Timestamp;
/// use tempograph_engine::{SharedTemporalGraph, TemporalGraph};
///
/// let t0 = Timestamp::from_millis(1_700_000_000_000);
/// let shared = SharedTemporalGraph::new(TemporalGraph::new(t0));
///
/// let writer = shared.clone();
/// std::thread::spawn(move || writer.write().add_vertex([], t0).map(|_| ()))
///     .join()
///     .unwrap()?;
///
/// assert_eq!(shared.read().vertex_count(), 1);
/// # Ok::<(), tempograph_common::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedTemporalGraph {
    inner: Arc<RwLock<TemporalGraph>>,
}

impl SharedTemporalGraph {
    /// Wraps `graph` for shared use.
    #[must_use]
    pub fn new(graph: TemporalGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Locks the graph for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, TemporalGraph> {
        self.inner.read()
    }

    /// Locks the graph for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, TemporalGraph> {
        self.inner.write()
    }

    /// Returns the graph if this is the last handle to it.
    pub fn try_into_inner(self) -> Result<TemporalGraph, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<TemporalGraph> for SharedTemporalGraph {
    fn from(graph: TemporalGraph) -> Self {
        Self::new(graph)
    }
}
