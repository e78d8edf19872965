//! The temporal graph engine.
//!
//! [`TemporalGraph`] records vertices, edges, and property histories, each
//! stamped with the time it was added, and answers "as of time T" queries.
//!
//! Every timestamp is stored as an `i32` offset from the graph's reference
//! time. Existence and adjacency are kept in time buckets holding only the
//! ids first seen at each offset; reads union every bucket up to the query
//! offset. Property values live in a [`PropertyStore`] in compressed form.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexSet;
use tempograph_common::utils::hash::{FxBuildHasher, FxHashMap, FxHashSet};
use tempograph_common::{
    EdgeId, EntityKind, EntityRef, Error, PropertyId, Result, Timestamp, Value, VertexId,
};
use tempograph_core::index::{TemporalAdjacency, TimeBuckets};
use tempograph_core::property::{PropertyStore, TemporalProperty, TimestampedPropertyValue};

use crate::config::Config;

/// Property ids owned by one entity, in attachment order.
type PropertySet = IndexSet<PropertyId, FxBuildHasher>;

/// Summary of a [`TemporalGraph::purge_at_time`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeStats {
    /// Vertices alive at the purge time.
    pub vertices: usize,
    /// Edges alive at the purge time.
    pub edges: usize,
    /// Properties that lost history and were re-encoded.
    pub properties_rewritten: usize,
}

/// An in-memory, time-aware graph.
///
/// Mutations take `&mut self`; wrap the graph in a
/// [`SharedTemporalGraph`](crate::SharedTemporalGraph) to share it between
/// threads.
///
/// # Example
///
/// ```
/// use tempograph_common::Timestamp;
/// use tempograph_engine::TemporalGraph;
///
/// let t0 = Timestamp::from_millis(1_700_000_000_000);
/// let mut graph = TemporalGraph::new(t0);
///
/// let router = graph.add_vertex([], t0 + 5)?;
/// assert_eq!(graph.vertices_at_time(t0 + 4)?.count(), 0);
/// assert_eq!(graph.vertices_at_time(t0 + 5)?.collect::<Vec<_>>(), vec![router]);
/// # Ok::<(), tempograph_common::Error>(())
/// ```
#[derive(Debug)]
pub struct TemporalGraph {
    config: Config,

    next_vertex_id: AtomicU32,
    next_edge_id: AtomicU32,

    vertices_by_time: TimeBuckets<VertexId>,
    edges_by_time: TimeBuckets<EdgeId>,
    outgoing: TemporalAdjacency,
    incoming: TemporalAdjacency,

    vertex_properties: FxHashMap<VertexId, PropertySet>,
    edge_properties: FxHashMap<EdgeId, PropertySet>,
    properties: PropertyStore,
}

impl TemporalGraph {
    /// Creates an empty graph measuring time from `reference_time`.
    #[must_use]
    pub fn new(reference_time: Timestamp) -> Self {
        Self::with_config(Config::new(reference_time))
    }

    /// Creates an empty graph with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let properties =
            PropertyStore::with_capacity(config.series_codec, config.initial_property_capacity);
        Self {
            config,
            next_vertex_id: AtomicU32::new(0),
            next_edge_id: AtomicU32::new(0),
            vertices_by_time: TimeBuckets::new(),
            edges_by_time: TimeBuckets::new(),
            outgoing: TemporalAdjacency::new(),
            incoming: TemporalAdjacency::new(),
            vertex_properties: FxHashMap::default(),
            edge_properties: FxHashMap::default(),
            properties,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the instant all offsets are measured from.
    #[must_use]
    pub fn reference_time(&self) -> Timestamp {
        self.config.reference_time
    }

    /// Number of vertex ids handed out so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.next_vertex_id.load(Ordering::Acquire) as usize
    }

    /// Number of edge ids handed out so far.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.next_edge_id.load(Ordering::Acquire) as usize
    }

    /// Number of distinct properties stored.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Returns the underlying property store.
    #[must_use]
    pub fn property_store(&self) -> &PropertyStore {
        &self.properties
    }

    // === Vertex Operations ===

    /// Adds a vertex as of `timestamp`, together with its properties.
    ///
    /// Every property must be created at or after `timestamp`. Nothing is
    /// allocated or stored when validation fails.
    pub fn add_vertex(
        &mut self,
        properties: impl IntoIterator<Item = TemporalProperty>,
        timestamp: Timestamp,
    ) -> Result<VertexId> {
        let offset = self.offset(timestamp)?;
        let candidate = VertexId::new(self.next_vertex_id.load(Ordering::Acquire));
        let properties = validate_properties(
            &self.properties,
            EntityRef::Vertex(candidate),
            properties,
            timestamp,
        )?;

        let id = VertexId::new(allocate(&self.next_vertex_id, EntityKind::Vertex)?);
        self.vertices_by_time.insert(offset, id);
        if let Some(owned) = self.store_properties(properties) {
            self.vertex_properties.insert(id, owned);
        }

        tracing::debug!(vertex = %id, offset, "added vertex");
        Ok(id)
    }

    /// Vertices that exist at `timestamp`.
    pub fn vertices_at_time(
        &self,
        timestamp: Timestamp,
    ) -> Result<impl Iterator<Item = VertexId> + '_> {
        let offset = self.offset(timestamp)?;
        Ok(self.vertices_by_time.at(offset))
    }

    /// Values of `vertex`'s properties at `timestamp`.
    ///
    /// Properties without a value at that time are left out.
    pub fn vertex_properties_at_time(
        &self,
        vertex: VertexId,
        timestamp: Timestamp,
    ) -> Result<Vec<TimestampedPropertyValue>> {
        self.offset(timestamp)?;
        self.check_vertex(vertex)?;
        self.properties_at(self.vertex_properties.get(&vertex), timestamp)
    }

    /// Value of `vertex`'s property `name` at `timestamp`.
    ///
    /// `None` if the vertex has no such property or it has no value yet.
    pub fn vertex_property_at_time(
        &self,
        vertex: VertexId,
        name: &str,
        timestamp: Timestamp,
    ) -> Result<Option<TimestampedPropertyValue>> {
        self.offset(timestamp)?;
        self.check_vertex(vertex)?;
        self.property_at(EntityRef::Vertex(vertex), name, timestamp)
    }

    /// Appends a value to `vertex`'s property `name`.
    pub fn add_vertex_property(
        &mut self,
        vertex: VertexId,
        name: &str,
        value: impl Into<Value>,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.offset(timestamp)?;
        self.check_vertex(vertex)?;
        self.append_property(EntityRef::Vertex(vertex), name, value.into(), timestamp)
    }

    // === Edge Operations ===

    /// Adds an edge from `src` to `dest` as of `timestamp`.
    ///
    /// Both endpoints must already have been allocated. Property rules are the
    /// same as for [`add_vertex`](Self::add_vertex).
    pub fn add_edge(
        &mut self,
        src: VertexId,
        dest: VertexId,
        properties: impl IntoIterator<Item = TemporalProperty>,
        timestamp: Timestamp,
    ) -> Result<EdgeId> {
        let offset = self.offset(timestamp)?;
        self.check_vertex(src)?;
        self.check_vertex(dest)?;
        let candidate = EdgeId::new(self.next_edge_id.load(Ordering::Acquire));
        let properties = validate_properties(
            &self.properties,
            EntityRef::Edge(candidate),
            properties,
            timestamp,
        )?;

        let id = EdgeId::new(allocate(&self.next_edge_id, EntityKind::Edge)?);
        self.edges_by_time.insert(offset, id);
        self.outgoing.insert(src, offset, id);
        self.incoming.insert(dest, offset, id);
        if let Some(owned) = self.store_properties(properties) {
            self.edge_properties.insert(id, owned);
        }

        tracing::debug!(edge = %id, %src, %dest, offset, "added edge");
        Ok(id)
    }

    /// Edges leaving `vertex` that exist at `timestamp`.
    pub fn out_edges_at_time(
        &self,
        vertex: VertexId,
        timestamp: Timestamp,
    ) -> Result<impl Iterator<Item = EdgeId> + '_> {
        let offset = self.offset(timestamp)?;
        self.check_vertex(vertex)?;
        Ok(self.outgoing.edges_at(vertex, offset))
    }

    /// Edges entering `vertex` that exist at `timestamp`.
    pub fn in_edges_at_time(
        &self,
        vertex: VertexId,
        timestamp: Timestamp,
    ) -> Result<impl Iterator<Item = EdgeId> + '_> {
        let offset = self.offset(timestamp)?;
        self.check_vertex(vertex)?;
        Ok(self.incoming.edges_at(vertex, offset))
    }

    /// Edges from `src` to `dest` that exist at `timestamp`.
    pub fn edges_at_time(
        &self,
        src: VertexId,
        dest: VertexId,
        timestamp: Timestamp,
    ) -> Result<Vec<EdgeId>> {
        let offset = self.offset(timestamp)?;
        self.check_vertex(src)?;
        self.check_vertex(dest)?;

        let incoming: FxHashSet<EdgeId> = self.incoming.edges_at(dest, offset).collect();
        if incoming.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .outgoing
            .edges_at(src, offset)
            .filter(|edge| incoming.contains(edge))
            .collect())
    }

    /// Every edge that exists at `timestamp`.
    pub fn all_edges_at_time(
        &self,
        timestamp: Timestamp,
    ) -> Result<impl Iterator<Item = EdgeId> + '_> {
        let offset = self.offset(timestamp)?;
        Ok(self.edges_by_time.at(offset))
    }

    /// Values of `edge`'s properties at `timestamp`.
    pub fn edge_properties_at_time(
        &self,
        edge: EdgeId,
        timestamp: Timestamp,
    ) -> Result<Vec<TimestampedPropertyValue>> {
        self.offset(timestamp)?;
        self.check_edge(edge)?;
        self.properties_at(self.edge_properties.get(&edge), timestamp)
    }

    /// Value of `edge`'s property `name` at `timestamp`.
    pub fn edge_property_at_time(
        &self,
        edge: EdgeId,
        name: &str,
        timestamp: Timestamp,
    ) -> Result<Option<TimestampedPropertyValue>> {
        self.offset(timestamp)?;
        self.check_edge(edge)?;
        self.property_at(EntityRef::Edge(edge), name, timestamp)
    }

    /// Property values of every edge from `src` to `dest` at `timestamp`.
    pub fn edge_properties_between(
        &self,
        src: VertexId,
        dest: VertexId,
        timestamp: Timestamp,
    ) -> Result<FxHashMap<EdgeId, Vec<TimestampedPropertyValue>>> {
        self.edges_at_time(src, dest, timestamp)?
            .into_iter()
            .map(|edge| {
                let values = self.properties_at(self.edge_properties.get(&edge), timestamp)?;
                Ok((edge, values))
            })
            .collect()
    }

    /// Value of property `name` on every edge from `src` to `dest` at `timestamp`.
    pub fn edge_property_between(
        &self,
        src: VertexId,
        dest: VertexId,
        name: &str,
        timestamp: Timestamp,
    ) -> Result<FxHashMap<EdgeId, Option<TimestampedPropertyValue>>> {
        self.edges_at_time(src, dest, timestamp)?
            .into_iter()
            .map(|edge| Ok((edge, self.property_at(EntityRef::Edge(edge), name, timestamp)?)))
            .collect()
    }

    /// Appends a value to `edge`'s property `name`.
    pub fn add_edge_property(
        &mut self,
        edge: EdgeId,
        name: &str,
        value: impl Into<Value>,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.offset(timestamp)?;
        self.check_edge(edge)?;
        self.append_property(EntityRef::Edge(edge), name, value.into(), timestamp)
    }

    // === Maintenance ===

    /// Discards property history at or before `timestamp`.
    ///
    /// Touches every vertex and edge that exists at `timestamp`. Existence and
    /// adjacency are kept; only property values are dropped. This can be
    /// slow on large graphs.
    pub fn purge_at_time(&mut self, timestamp: Timestamp) -> Result<PurgeStats> {
        let offset = self.offset(timestamp)?;
        let mut stats = PurgeStats::default();

        for edge in self.edges_by_time.at(offset) {
            stats.edges += 1;
            if let Some(owned) = self.edge_properties.get(&edge) {
                stats.properties_rewritten += self
                    .properties
                    .purge_properties_till_time(owned.iter().copied(), timestamp)?;
            }
        }
        for vertex in self.vertices_by_time.at(offset) {
            stats.vertices += 1;
            if let Some(owned) = self.vertex_properties.get(&vertex) {
                stats.properties_rewritten += self
                    .properties
                    .purge_properties_till_time(owned.iter().copied(), timestamp)?;
            }
        }

        tracing::info!(
            %timestamp,
            vertices = stats.vertices,
            edges = stats.edges,
            rewritten = stats.properties_rewritten,
            "purged property history"
        );
        Ok(stats)
    }

    // === Internal ===

    fn offset(&self, timestamp: Timestamp) -> Result<i32> {
        let reference = self.config.reference_time;
        timestamp.offset_from(reference).ok_or(Error::TimeRange {
            timestamp,
            reference,
        })
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex.as_u32() < self.next_vertex_id.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::UnknownEntity {
                kind: EntityKind::Vertex,
                id: vertex.as_u32(),
            })
        }
    }

    fn check_edge(&self, edge: EdgeId) -> Result<()> {
        if edge.as_u32() < self.next_edge_id.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::UnknownEntity {
                kind: EntityKind::Edge,
                id: edge.as_u32(),
            })
        }
    }

    fn owned_properties(&self, owner: EntityRef) -> Option<&PropertySet> {
        match owner {
            EntityRef::Vertex(id) => self.vertex_properties.get(&id),
            EntityRef::Edge(id) => self.edge_properties.get(&id),
        }
    }

    /// Stores validated properties, returning the owned set if non-empty.
    fn store_properties(&mut self, properties: Vec<TemporalProperty>) -> Option<PropertySet> {
        if properties.is_empty() {
            return None;
        }
        let mut owned =
            PropertySet::with_capacity_and_hasher(properties.len(), FxBuildHasher::default());
        for property in &properties {
            self.properties.put(property);
            owned.insert(property.id());
        }
        Some(owned)
    }

    fn properties_at(
        &self,
        owned: Option<&PropertySet>,
        timestamp: Timestamp,
    ) -> Result<Vec<TimestampedPropertyValue>> {
        let mut values = Vec::new();
        for &id in owned.into_iter().flatten() {
            let Some(property) = self.properties.get(id)? else {
                continue;
            };
            if let Some(value) = property.value_at_time(timestamp) {
                values.push(TimestampedPropertyValue {
                    name: Arc::clone(property.shared_name()),
                    value: value.clone(),
                });
            }
        }
        tracing::trace!(%timestamp, found = values.len(), "resolved property values");
        Ok(values)
    }

    /// Finds the single property named `name` owned by `owner`.
    fn find_property(&self, owner: EntityRef, name: &str) -> Result<Option<PropertyId>> {
        let mut matches = self
            .owned_properties(owner)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&id| self.properties.name_of(id) == Some(name));
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            return Err(Error::DuplicateProperty {
                name: name.to_string(),
                owner,
            });
        }
        Ok(first)
    }

    fn property_at(
        &self,
        owner: EntityRef,
        name: &str,
        timestamp: Timestamp,
    ) -> Result<Option<TimestampedPropertyValue>> {
        let Some(id) = self.find_property(owner, name)? else {
            return Ok(None);
        };
        let Some(property) = self.properties.get(id)? else {
            return Ok(None);
        };
        Ok(property
            .value_at_time(timestamp)
            .map(|value| TimestampedPropertyValue {
                name: Arc::clone(property.shared_name()),
                value: value.clone(),
            }))
    }

    fn append_property(
        &mut self,
        owner: EntityRef,
        name: &str,
        value: Value,
        timestamp: Timestamp,
    ) -> Result<()> {
        let not_found = || Error::PropertyNotFound {
            name: name.to_string(),
            owner,
        };
        let id = self.find_property(owner, name)?.ok_or_else(not_found)?;
        let mut property = self.properties.get(id)?.ok_or_else(not_found)?;
        property.set_value_at_time(timestamp, value)?;
        self.properties.put(&property);

        tracing::debug!(%owner, property = %id, %timestamp, "appended property value");
        Ok(())
    }
}

/// Checks properties about to be attached to `owner`, added at `timestamp`.
///
/// Ids already in `store` belong to another entity and are rejected.
fn validate_properties(
    store: &PropertyStore,
    owner: EntityRef,
    properties: impl IntoIterator<Item = TemporalProperty>,
    timestamp: Timestamp,
) -> Result<Vec<TemporalProperty>> {
    let properties: Vec<TemporalProperty> = properties.into_iter().collect();
    let mut names: FxHashMap<&str, PropertyId> = FxHashMap::default();
    let mut ids: FxHashMap<PropertyId, &str> = FxHashMap::default();
    for property in &properties {
        if property.created_at() < timestamp {
            return Err(Error::PropertyOrdering(format!(
                "property {:?} created at {} precedes {} addition at {}",
                property.name(),
                property.created_at(),
                owner.kind(),
                timestamp
            )));
        }
        if store.contains(property.id()) {
            return Err(Error::PropertyIdInUse(property.id()));
        }
        if let Some(&other) = names.get(property.name())
            && other != property.id()
        {
            return Err(Error::DuplicateProperty {
                name: property.name().to_string(),
                owner,
            });
        }
        if let Some(&other) = ids.get(&property.id())
            && other != property.name()
        {
            return Err(Error::PropertyIdInUse(property.id()));
        }
        names.insert(property.name(), property.id());
        ids.insert(property.id(), property.name());
    }
    drop(names);
    drop(ids);
    Ok(properties)
}

/// Hands out the next id from `counter`, failing once the id space is used up.
fn allocate(counter: &AtomicU32, kind: EntityKind) -> Result<u32> {
    counter
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |id| id.checked_add(1))
        .map_err(|_| Error::IdSpaceExhausted(kind))
}
