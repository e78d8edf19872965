//! Compressed storage of property histories.
//!
//! Properties are stored column-wise: the offsets stay a plain `Vec<i32>` so
//! lookups need no decoding, while the values go through the configured
//! [`SeriesCodec`]. Reading a property back decodes the values and zips them
//! with the offsets.

use std::sync::Arc;

use tempograph_common::utils::hash::{FxHashMap, map_with_capacity};
use tempograph_common::{PropertyId, Result, Timestamp};

use super::TemporalProperty;
use crate::storage::{SeriesCodec, ValueSeries};

/// Stored form of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedProperty {
    id: PropertyId,
    name: Arc<str>,
    created_at: Timestamp,
    latest: Option<Timestamp>,
    offsets: Vec<i32>,
    values: ValueSeries,
}

impl CompressedProperty {
    /// Compresses `property`'s values with `codec`.
    #[must_use]
    pub fn compress(property: &TemporalProperty, codec: SeriesCodec) -> Self {
        Self {
            id: property.id(),
            name: Arc::clone(property.shared_name()),
            created_at: property.created_at(),
            latest: property.latest(),
            offsets: property.offsets().to_vec(),
            values: ValueSeries::from_values(property.values().to_vec(), codec),
        }
    }

    /// Rebuilds the full property.
    pub fn decompress(&self) -> Result<TemporalProperty> {
        let values = self.values.to_values()?;
        if values.len() != self.offsets.len() {
            return Err(tempograph_common::CodecError::LengthMismatch {
                expected: self.offsets.len(),
                actual: values.len(),
            }
            .into());
        }
        Ok(TemporalProperty::from_parts(
            self.id,
            Arc::clone(&self.name),
            self.created_at,
            self.latest,
            self.offsets.clone(),
            values,
        ))
    }

    /// Returns the property id.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the property's creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the time of the last write.
    #[must_use]
    pub fn latest(&self) -> Option<Timestamp> {
        self.latest
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the stored value series.
    #[must_use]
    pub fn values(&self) -> &ValueSeries {
        &self.values
    }

    /// Approximate footprint of the stored columns, in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.offsets.len() * std::mem::size_of::<i32>() + self.values.size_in_bytes()
    }
}

/// Map from property id to its compressed history.
///
/// `put` replaces any previous entry for the same id. Reads return an
/// independent, decoded copy: changes to it are only visible after another
/// `put`.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    entries: FxHashMap<PropertyId, CompressedProperty>,
    codec: SeriesCodec,
}

impl PropertyStore {
    /// Creates an empty store using the default codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store using `codec` for integer series.
    #[must_use]
    pub fn with_codec(codec: SeriesCodec) -> Self {
        Self::with_capacity(codec, 0)
    }

    /// Creates an empty store with room for `capacity` properties.
    #[must_use]
    pub fn with_capacity(codec: SeriesCodec, capacity: usize) -> Self {
        Self {
            entries: map_with_capacity(capacity),
            codec,
        }
    }

    /// Returns the codec used for integer series.
    #[must_use]
    pub fn codec(&self) -> SeriesCodec {
        self.codec
    }

    /// Compresses and stores `property`, replacing any previous version.
    pub fn put(&mut self, property: &TemporalProperty) {
        let compressed = CompressedProperty::compress(property, self.codec);
        self.entries.insert(property.id(), compressed);
    }

    /// Returns a decoded copy of the property, if stored.
    pub fn get(&self, id: PropertyId) -> Result<Option<TemporalProperty>> {
        self.entries
            .get(&id)
            .map(CompressedProperty::decompress)
            .transpose()
    }

    /// Returns the stored form of the property, if any.
    #[must_use]
    pub fn get_compressed(&self, id: PropertyId) -> Option<&CompressedProperty> {
        self.entries.get(&id)
    }

    /// Returns the property's name without decoding its values.
    #[must_use]
    pub fn name_of(&self, id: PropertyId) -> Option<&str> {
        self.entries.get(&id).map(CompressedProperty::name)
    }

    /// Returns true if the property is stored.
    #[must_use]
    pub fn contains(&self, id: PropertyId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of stored properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the stored property ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.entries.keys().copied()
    }

    /// Total footprint of all stored properties, in bytes.
    #[must_use]
    pub fn compressed_bytes(&self) -> usize {
        self.entries.values().map(CompressedProperty::size_in_bytes).sum()
    }

    /// Drops history at or before `timestamp` from each listed property.
    ///
    /// Only properties that actually lost entries are re-encoded. Unknown ids
    /// are skipped. Returns the number of rewritten properties.
    pub fn purge_properties_till_time(
        &mut self,
        ids: impl IntoIterator<Item = PropertyId>,
        timestamp: Timestamp,
    ) -> Result<usize> {
        let mut rewritten = 0;
        for id in ids {
            let Some(mut property) = self.get(id)? else {
                tracing::trace!(property = %id, "purge skipped unknown property");
                continue;
            };
            if property.purge_until(timestamp) {
                self.put(&property);
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempograph_common::Value;

    const T0: Timestamp = Timestamp::from_millis(1_000_000);

    fn counter(name: &str, points: &[(i64, i32)]) -> TemporalProperty {
        let mut p = TemporalProperty::new(name, T0).unwrap();
        for &(t, v) in points {
            p.set_value_at_time(T0 + t, v).unwrap();
        }
        p
    }

    #[test]
    fn test_put_get_roundtrip() {
        let mut store = PropertyStore::new();
        let p = counter("packets", &[(0, 10), (5, 300), (9, 70_000)]);
        store.put(&p);

        let stored = store.get_compressed(p.id()).unwrap();
        assert!(stored.values().is_compressed());

        let restored = store.get(p.id()).unwrap().unwrap();
        assert_eq!(restored, p);
        assert_eq!(restored.value_at_time(T0 + 6), Some(&Value::Int32(300)));
    }

    #[test]
    fn test_raw_fallback_roundtrip() {
        let mut store = PropertyStore::new();
        let mut p = TemporalProperty::new("status", T0).unwrap();
        p.set_value_at_time(T0 + 1, "up").unwrap();
        p.set_value_at_time(T0 + 2, 1.5).unwrap();
        store.put(&p);

        assert!(!store.get_compressed(p.id()).unwrap().values().is_compressed());
        assert_eq!(store.get(p.id()).unwrap().unwrap(), p);
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = PropertyStore::with_codec(SeriesCodec::DeltaVarint);
        let mut p = counter("bytes", &[(1, 5)]);
        store.put(&p);
        p.set_value_at_time(T0 + 2, -6).unwrap();
        store.put(&p);

        assert_eq!(store.len(), 1);
        let restored = store.get(p.id()).unwrap().unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.value_at_time(T0 + 2), Some(&Value::Int32(-6)));
    }

    #[test]
    fn test_get_returns_copy() {
        let mut store = PropertyStore::new();
        let p = counter("packets", &[(1, 1)]);
        store.put(&p);

        let mut copy = store.get(p.id()).unwrap().unwrap();
        copy.set_value_at_time(T0 + 2, 2).unwrap();
        assert_eq!(store.get(p.id()).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_property() {
        let store = PropertyStore::new();
        assert!(store.get(PropertyId::new(999_999)).unwrap().is_none());
        assert!(!store.contains(PropertyId::new(999_999)));
        assert!(store.name_of(PropertyId::new(999_999)).is_none());
    }

    #[test]
    fn test_inspection() {
        let mut store = PropertyStore::with_capacity(SeriesCodec::Varint, 4);
        let a = counter("a", &[(1, 1), (2, 2)]);
        let b = counter("b", &[]);
        store.put(&a);
        store.put(&b);

        assert_eq!(store.len(), 2);
        assert_eq!(store.name_of(a.id()), Some("a"));
        assert!(store.contains(b.id()));
        let mut ids: Vec<_> = store.ids().collect();
        ids.sort();
        let mut expected = vec![a.id(), b.id()];
        expected.sort();
        assert_eq!(ids, expected);
        // two 4-byte offsets plus two 1-byte varints
        assert_eq!(store.compressed_bytes(), 10);
    }

    #[test]
    fn test_purge_rewrites_only_changed() {
        let mut store = PropertyStore::new();
        let early = counter("early", &[(1, 1), (2, 2), (8, 8)]);
        let late = counter("late", &[(50, 5)]);
        store.put(&early);
        store.put(&late);

        let rewritten = store
            .purge_properties_till_time([early.id(), late.id(), PropertyId::new(999_999)], T0 + 2)
            .unwrap();
        assert_eq!(rewritten, 1);

        let early = store.get(early.id()).unwrap().unwrap();
        assert_eq!(early.len(), 1);
        assert_eq!(early.value_at_time(T0 + 2), None);
        assert_eq!(early.value_at_time(T0 + 8), Some(&Value::Int32(8)));
        assert_eq!(store.get(late.id()).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_purge_to_empty() {
        let mut store = PropertyStore::new();
        let p = counter("packets", &[(1, 1)]);
        store.put(&p);

        assert_eq!(store.purge_properties_till_time([p.id()], T0 + 100).unwrap(), 1);
        let restored = store.get(p.id()).unwrap().unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.latest(), Some(T0 + 1));
        assert_eq!(restored.value_at_time(T0 + 100), None);
    }
}
