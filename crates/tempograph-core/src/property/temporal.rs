//! A single property's value history.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tempograph_common::types::MAX_TIME_OFFSET;
use tempograph_common::{EntityKind, Error, PropertyId, Result, Timestamp, Value};

static NEXT_PROPERTY_ID: AtomicU32 = AtomicU32::new(1);

/// Time-ordered values of one named property.
///
/// Entries are `(offset, value)` pairs where the offset is milliseconds since
/// the property's creation time. Writes are append-only and must not go back
/// in time; reads return the latest value at or before the requested instant.
///
/// # Example
///
/// ```
/// use tempograph_common::Timestamp;
/// use tempograph_core::property::TemporalProperty;
///
/// let t0 = Timestamp::from_millis(1_000);
/// let mut bandwidth = TemporalProperty::new("bandwidth", t0)?;
/// bandwidth.set_value_at_time(t0 + 10, 100)?;
/// bandwidth.set_value_at_time(t0 + 20, 250)?;
///
/// assert!(bandwidth.value_at_time(t0 + 5).is_none());
/// assert_eq!(bandwidth.value_at_time(t0 + 15).and_then(|v| v.as_int32()), Some(100));
/// # Ok::<(), tempograph_common::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalProperty {
    id: PropertyId,
    name: Arc<str>,
    created_at: Timestamp,
    latest: Option<Timestamp>,
    offsets: Vec<i32>,
    values: Vec<Value>,
}

impl TemporalProperty {
    /// Creates an empty property with an automatically assigned id.
    ///
    /// Fails if `name` is empty or `created_at` is not positive.
    pub fn new(name: impl Into<Arc<str>>, created_at: Timestamp) -> Result<Self> {
        let id = NEXT_PROPERTY_ID
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
            .map_err(|_| Error::IdSpaceExhausted(EntityKind::Property))?;
        Self::with_id(PropertyId::new(id), name, created_at)
    }

    /// Creates an empty property with a caller-chosen id.
    pub fn with_id(
        id: PropertyId,
        name: impl Into<Arc<str>>,
        created_at: Timestamp,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgument("property name must not be empty".into()));
        }
        if created_at.as_millis() <= 0 {
            return Err(Error::InvalidArgument(format!(
                "property {name:?} creation time must be positive, got {created_at}"
            )));
        }
        Ok(Self {
            id,
            name,
            created_at,
            latest: None,
            offsets: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Rebuilds a property from stored columns.
    pub(crate) fn from_parts(
        id: PropertyId,
        name: Arc<str>,
        created_at: Timestamp,
        latest: Option<Timestamp>,
        offsets: Vec<i32>,
        values: Vec<Value>,
    ) -> Self {
        debug_assert_eq!(offsets.len(), values.len());
        Self {
            id,
            name,
            created_at,
            latest,
            offsets,
            values,
        }
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

    /// Returns the shared name handle.
    #[must_use]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the creation time that offsets are relative to.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the time of the last write, if any.
    ///
    /// Survives purges, so writes older than a purged value stay rejected.
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

    /// Stored offsets, ascending.
    #[must_use]
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    /// Stored values, in offset order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterates over `(timestamp, value)` entries in time order.
    pub fn entries(&self) -> impl Iterator<Item = (Timestamp, &Value)> + '_ {
        self.offsets
            .iter()
            .zip(&self.values)
            .map(|(&offset, value)| (self.created_at.at_offset(offset), value))
    }

    /// Appends `value` as of `timestamp`.
    ///
    /// Equal timestamps are accepted; the later write wins on lookup.
    pub fn set_value_at_time(
        &mut self,
        timestamp: Timestamp,
        value: impl Into<Value>,
    ) -> Result<()> {
        if let Some(latest) = self.latest
            && timestamp < latest
        {
            return Err(Error::PropertyOrdering(format!(
                "write to {:?} at {timestamp} precedes its last write at {latest}",
                self.name
            )));
        }
        if timestamp < self.created_at {
            return Err(Error::PropertyOrdering(format!(
                "write to {:?} at {timestamp} precedes its creation at {}",
                self.name, self.created_at
            )));
        }
        let offset = timestamp.offset_from(self.created_at).ok_or(Error::TimeRange {
            timestamp,
            reference: self.created_at,
        })?;

        self.offsets.push(offset);
        self.values.push(value.into());
        self.latest = Some(timestamp);
        Ok(())
    }

    /// Returns the latest value written at or before `timestamp`.
    #[must_use]
    pub fn value_at_time(&self, timestamp: Timestamp) -> Option<&Value> {
        let target = self.target_offset(timestamp)?;
        let end = self.offsets.partition_point(|&o| o <= target);
        end.checked_sub(1).map(|i| &self.values[i])
    }

    /// Drops every entry at or before `timestamp`.
    ///
    /// Returns whether anything was removed.
    pub fn purge_until(&mut self, timestamp: Timestamp) -> bool {
        let Some(target) = self.target_offset(timestamp) else {
            return false;
        };
        let end = self.offsets.partition_point(|&o| o <= target);
        if end == 0 {
            return false;
        }
        self.offsets.drain(..end);
        self.values.drain(..end);
        true
    }

    /// Offset of `timestamp`, clamped to the offset range.
    /// `None` when it precedes the creation time.
    fn target_offset(&self, timestamp: Timestamp) -> Option<i32> {
        let delta = timestamp
            .as_millis()
            .saturating_sub(self.created_at.as_millis());
        (delta >= 0).then(|| delta.min(MAX_TIME_OFFSET) as i32)
    }
}

impl fmt::Display for TemporalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) [{} entries]", self.name, self.id, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Timestamp = Timestamp::from_millis(1_700_000_000_000);

    fn property(name: &str) -> TemporalProperty {
        TemporalProperty::new(name, T0).unwrap()
    }

    #[test]
    fn test_floor_semantics() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + 10, 1).unwrap();
        p.set_value_at_time(T0 + 20, 2).unwrap();

        assert_eq!(p.value_at_time(T0), None);
        assert_eq!(p.value_at_time(T0 + 9), None);
        assert_eq!(p.value_at_time(T0 + 10), Some(&Value::Int32(1)));
        assert_eq!(p.value_at_time(T0 + 19), Some(&Value::Int32(1)));
        assert_eq!(p.value_at_time(T0 + 20), Some(&Value::Int32(2)));
        assert_eq!(p.value_at_time(T0 + 1_000_000), Some(&Value::Int32(2)));
        assert_eq!(p.value_at_time(T0 - 1), None);
    }

    #[test]
    fn test_lookup_beyond_window_clamps() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + 5, 1).unwrap();
        assert_eq!(p.value_at_time(T0 + 10 * MAX_TIME_OFFSET), Some(&Value::Int32(1)));
        assert_eq!(p.value_at_time(Timestamp::from_millis(i64::MAX)), Some(&Value::Int32(1)));
    }

    #[test]
    fn test_equal_timestamps_last_write_wins() {
        let mut p = property("state");
        p.set_value_at_time(T0 + 1, "down").unwrap();
        p.set_value_at_time(T0 + 1, "up").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.value_at_time(T0 + 1).and_then(Value::as_str), Some("up"));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + 100, 1).unwrap();

        let err = p.set_value_at_time(T0 + 99, 2).unwrap_err();
        assert!(matches!(err, Error::PropertyOrdering(_)));
        assert_eq!(p.len(), 1);
        assert_eq!(p.latest(), Some(T0 + 100));
    }

    #[test]
    fn test_write_before_creation_rejected() {
        let mut p = property("packets");
        let err = p.set_value_at_time(T0 - 1, 1).unwrap_err();
        assert!(matches!(err, Error::PropertyOrdering(_)));
    }

    #[test]
    fn test_write_beyond_window_rejected() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + MAX_TIME_OFFSET, 1).unwrap();
        let err = p.set_value_at_time(T0 + MAX_TIME_OFFSET + 1, 2).unwrap_err();
        assert!(err.is_time_range());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            TemporalProperty::new("", T0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TemporalProperty::new("x", Timestamp::from_millis(0)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TemporalProperty::new("x", Timestamp::from_millis(-5)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_auto_ids_are_distinct() {
        let a = property("a");
        let b = property("b");
        assert_ne!(a.id(), b.id());
        assert!(a.id().as_u32() >= 1);

        let c = TemporalProperty::with_id(PropertyId::new(42), "c", T0).unwrap();
        assert_eq!(c.id(), PropertyId::new(42));
    }

    #[test]
    fn test_purge_prefix() {
        let mut p = property("packets");
        for i in 1..=5 {
            p.set_value_at_time(T0 + i * 10, i as i32).unwrap();
        }

        assert!(!p.purge_until(T0 + 5));
        assert!(!p.purge_until(T0 - 100));
        assert_eq!(p.len(), 5);

        assert!(p.purge_until(T0 + 30));
        assert_eq!(p.len(), 2);
        assert_eq!(p.value_at_time(T0 + 30), None);
        assert_eq!(p.value_at_time(T0 + 39), None);
        assert_eq!(p.value_at_time(T0 + 40), Some(&Value::Int32(4)));
        assert_eq!(p.value_at_time(T0 + 99), Some(&Value::Int32(5)));

        assert!(!p.purge_until(T0 + 30));
    }

    #[test]
    fn test_purge_everything_keeps_latest() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + 10, 1).unwrap();
        assert!(p.purge_until(T0 + 10));
        assert!(p.is_empty());
        assert_eq!(p.latest(), Some(T0 + 10));
        assert!(p.set_value_at_time(T0 + 9, 2).is_err());
        assert!(p.set_value_at_time(T0 + 10, 2).is_ok());
    }

    #[test]
    fn test_entries() {
        let mut p = property("packets");
        p.set_value_at_time(T0 + 3, 7i64).unwrap();
        let entries: Vec<_> = p.entries().collect();
        assert_eq!(entries, vec![(T0 + 3, &Value::Int64(7))]);
    }
}
