//! Time-bucketed membership index.
//!
//! Each bucket holds the ids first seen at one exact time offset. Membership
//! as of an offset is the union of every bucket at or before it, computed
//! lazily on read. Writes are a single map insert.

use std::collections::BTreeMap;

use smallvec::SmallVec;

/// Ids grouped by the offset at which they were first seen.
///
/// Ids are expected to be inserted at most once, so the union over buckets
/// never yields duplicates.
#[derive(Debug, Clone)]
pub struct TimeBuckets<Id> {
    buckets: BTreeMap<i32, SmallVec<[Id; 4]>>,
    len: usize,
}

impl<Id> Default for TimeBuckets<Id> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<Id: Copy> TimeBuckets<Id> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as first seen at `offset`.
    pub fn insert(&mut self, offset: i32, id: Id) {
        self.buckets.entry(offset).or_default().push(id);
        self.len += 1;
    }

    /// Iterates over every id seen at or before `offset`, bucket by bucket.
    pub fn at(&self, offset: i32) -> impl Iterator<Item = Id> + '_ {
        self.buckets
            .range(..=offset)
            .flat_map(|(_, ids)| ids.iter().copied())
    }

    /// Returns the ids first seen at exactly `offset`.
    #[must_use]
    pub fn bucket(&self, offset: i32) -> &[Id] {
        self.buckets.get(&offset).map(|ids| ids.as_slice()).unwrap_or_default()
    }

    /// Returns the greatest bucket offset at or before `offset`.
    #[must_use]
    pub fn floor_offset(&self, offset: i32) -> Option<i32> {
        self.buckets.range(..=offset).next_back().map(|(&k, _)| k)
    }

    /// Number of ids across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no id has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct offsets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_reads() {
        let mut buckets = TimeBuckets::new();
        buckets.insert(5, 1u32);
        buckets.insert(5, 2);
        buckets.insert(9, 3);

        assert_eq!(buckets.at(4).count(), 0);
        assert_eq!(buckets.at(5).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(buckets.at(8).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(buckets.at(9).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(buckets.at(i32::MAX).count(), 3);
    }

    #[test]
    fn test_floor_and_buckets() {
        let mut buckets = TimeBuckets::new();
        buckets.insert(0, 10u32);
        buckets.insert(7, 11);

        assert_eq!(buckets.floor_offset(6), Some(0));
        assert_eq!(buckets.floor_offset(7), Some(7));
        assert_eq!(buckets.floor_offset(-1), None);
        assert_eq!(buckets.bucket(7), &[11]);
        assert!(buckets.bucket(3).is_empty());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.bucket_count(), 2);
    }

    #[test]
    fn test_empty_index() {
        let buckets: TimeBuckets<u32> = TimeBuckets::new();
        assert!(buckets.is_empty());
        assert_eq!(buckets.at(100).count(), 0);
        assert_eq!(buckets.floor_offset(100), None);
    }
}
