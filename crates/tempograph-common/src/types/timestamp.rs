//! Millisecond timestamps and 32-bit time offsets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest offset, in milliseconds, that can be stored relative to a reference
/// instant. Offsets are kept as `i32`, which bounds the window to ~24.8 days.
pub const MAX_TIME_OFFSET: i64 = i32::MAX as i64;

/// A point in time, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as i64);
        Self(millis)
    }

    /// Returns epoch milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the offset of `self` from `reference`, if it lies inside
    /// `[reference, reference + MAX_TIME_OFFSET]`.
    #[must_use]
    pub fn offset_from(self, reference: Timestamp) -> Option<i32> {
        let delta = self.0.checked_sub(reference.0)?;
        if (0..=MAX_TIME_OFFSET).contains(&delta) {
            Some(delta as i32)
        } else {
            None
        }
    }

    /// Returns the timestamp `offset` milliseconds after `self`.
    #[must_use]
    pub const fn at_offset(self, offset: i32) -> Timestamp {
        Timestamp(self.0 + offset as i64)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

impl Add<i64> for Timestamp {
    type Output = Timestamp;

    fn add(self, millis: i64) -> Timestamp {
        Timestamp(self.0 + millis)
    }
}

impl Sub<i64> for Timestamp {
    type Output = Timestamp;

    fn sub(self, millis: i64) -> Timestamp {
        Timestamp(self.0 - millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_window() {
        let base = Timestamp::from_millis(1_000);

        assert_eq!(base.offset_from(base), Some(0));
        assert_eq!((base + 5).offset_from(base), Some(5));
        assert_eq!((base - 1).offset_from(base), None);
        assert_eq!((base + MAX_TIME_OFFSET).offset_from(base), Some(i32::MAX));
        assert_eq!((base + MAX_TIME_OFFSET + 1).offset_from(base), None);
    }

    #[test]
    fn test_offset_overflow() {
        let base = Timestamp::from_millis(i64::MIN);
        assert_eq!(Timestamp::from_millis(i64::MAX).offset_from(base), None);
    }

    #[test]
    fn test_at_offset() {
        let base = Timestamp::from_millis(500);
        assert_eq!(base.at_offset(25), Timestamp::from_millis(525));
    }
}
