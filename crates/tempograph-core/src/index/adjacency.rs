//! Per-vertex temporal adjacency.
//!
//! One [`TimeBuckets`] per vertex, holding the edges attached to it keyed by
//! the offset the edge was added at. A graph keeps two of these: one by
//! source (outgoing) and one by destination (incoming).

use tempograph_common::utils::hash::FxHashMap;
use tempograph_common::{EdgeId, VertexId};

use super::TimeBuckets;

/// Edges of each vertex, bucketed by time offset.
#[derive(Debug, Clone, Default)]
pub struct TemporalAdjacency {
    lists: FxHashMap<VertexId, TimeBuckets<EdgeId>>,
}

impl TemporalAdjacency {
    /// Creates an empty adjacency index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `edge` as attached to `vertex` from `offset` on.
    pub fn insert(&mut self, vertex: VertexId, offset: i32, edge: EdgeId) {
        self.lists.entry(vertex).or_default().insert(offset, edge);
    }

    /// Edges attached to `vertex` at or before `offset`.
    ///
    /// Empty for vertices without edges.
    pub fn edges_at(&self, vertex: VertexId, offset: i32) -> impl Iterator<Item = EdgeId> + '_ {
        self.lists
            .get(&vertex)
            .into_iter()
            .flat_map(move |buckets| buckets.at(offset))
    }

    /// Total number of edges ever attached to `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.lists.get(&vertex).map_or(0, TimeBuckets::len)
    }

    /// Number of vertices with at least one edge.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.lists.len()
    }
}
