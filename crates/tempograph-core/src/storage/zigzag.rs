//! ZigZag mapping of signed integers onto unsigned ones.
//!
//! Interleaves negatives with positives (0, -1, 1, -2, 2, ...) so that values
//! of small magnitude stay small and varint-encode into few bytes.

use bytes::BufMut;
use tempograph_common::CodecError;

use super::varint;

/// Maps a signed 32-bit integer to its zigzag form.
#[inline]
#[must_use]
pub const fn encode_i32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverts [`encode_i32`].
#[inline]
#[must_use]
pub const fn decode_i32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Maps a signed 64-bit integer to its zigzag form.
#[inline]
#[must_use]
pub const fn encode_i64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverts [`encode_i64`].
#[inline]
#[must_use]
pub const fn decode_i64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Writes `value` as a zigzag varint.
pub fn put_i32(buf: &mut impl BufMut, value: i32) -> usize {
    varint::put_u64(buf, u64::from(encode_i32(value)))
}

/// Reads a zigzag varint written by [`put_i32`].
pub fn get_i32(src: &[u8], offset: &mut usize) -> Result<i32, CodecError> {
    varint::get_u32(src, offset).map(decode_i32)
}

/// Writes `value` as a zigzag varint.
pub fn put_i64(buf: &mut impl BufMut, value: i64) -> usize {
    varint::put_u64(buf, encode_i64(value))
}

/// Reads a zigzag varint written by [`put_i64`].
pub fn get_i64(src: &[u8], offset: &mut usize) -> Result<i64, CodecError> {
    varint::get_u64(src, offset).map(decode_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mapping() {
        assert_eq!(encode_i32(0), 0);
        assert_eq!(encode_i32(-1), 1);
        assert_eq!(encode_i32(1), 2);
        assert_eq!(encode_i32(-2), 3);
        assert_eq!(encode_i32(i32::MAX), u32::MAX - 1);
        assert_eq!(encode_i32(i32::MIN), u32::MAX);
        assert_eq!(encode_i64(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_extremes_roundtrip() {
        for v in [0, 1, -1, -345_623_588, i32::MIN, i32::MIN + 1, i32::MAX] {
            assert_eq!(decode_i32(encode_i32(v)), v);
        }
        for v in [0, -1, i64::MIN, i64::MIN + 1, i64::MAX] {
            assert_eq!(decode_i64(encode_i64(v)), v);
        }
    }

    #[test]
    fn test_small_magnitudes_stay_short() {
        let mut buf = Vec::new();
        assert_eq!(put_i32(&mut buf, -64), 1);
        assert_eq!(put_i32(&mut buf, 63), 1);
        assert_eq!(put_i32(&mut buf, -65), 2);

        let mut offset = 0;
        assert_eq!(get_i32(&buf, &mut offset), Ok(-64));
        assert_eq!(get_i32(&buf, &mut offset), Ok(63));
        assert_eq!(get_i32(&buf, &mut offset), Ok(-65));
        assert_eq!(offset, buf.len());
    }

    proptest! {
        #[test]
        fn prop_i32_roundtrip(v in any::<i32>()) {
            let mut buf = Vec::new();
            put_i32(&mut buf, v);
            let mut offset = 0;
            prop_assert_eq!(get_i32(&buf, &mut offset).unwrap(), v);
        }

        #[test]
        fn prop_i64_roundtrip(v in any::<i64>()) {
            let mut buf = Vec::new();
            put_i64(&mut buf, v);
            let mut offset = 0;
            prop_assert_eq!(get_i64(&buf, &mut offset).unwrap(), v);
        }
    }
}
