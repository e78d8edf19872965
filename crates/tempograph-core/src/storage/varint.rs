//! Variable-length integer encoding.
//!
//! Each byte carries 7 value bits, least-significant group first. The high
//! bit is set on every byte except the last. Small numbers take one byte; a
//! non-negative `i32` takes at most 5 and a non-negative `i64` at most 9.
//!
//! Arrays are plain concatenations of encoded values with no separators or
//! length prefix: the continuation bit alone marks the boundaries.
//!
//! ```text
//! 0      -> 00
//! 127    -> 7F
//! 128    -> 80 01
//! 16383  -> FF 7F
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tempograph_common::CodecError;

/// Maximum encoded length of a non-negative `i32`.
pub const MAX_INT_LEN: usize = 5;

/// Maximum encoded length of a non-negative `i64`.
pub const MAX_LONG_LEN: usize = 9;

/// Maximum encoded length of any `u64`.
pub const MAX_U64_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// Returns the number of bytes `value` occupies once encoded.
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    if bits == 0 { 1 } else { bits.div_ceil(7) as usize }
}

/// Appends the unsigned varint encoding of `value`, returning the bytes written.
pub fn put_u64(buf: &mut impl BufMut, mut value: u64) -> usize {
    let mut written = 1;
    while value >= u64::from(CONTINUATION) {
        buf.put_u8((value as u8 & GROUP_MASK) | CONTINUATION);
        value >>= 7;
        written += 1;
    }
    buf.put_u8(value as u8);
    written
}

/// Reads an unsigned varint starting at `*offset`, advancing it past the value.
pub fn get_u64(src: &[u8], offset: &mut usize) -> Result<u64, CodecError> {
    get_bounded(src, offset, u64::BITS, "u64")
}

/// Reads an unsigned varint that must fit in 32 bits.
pub fn get_u32(src: &[u8], offset: &mut usize) -> Result<u32, CodecError> {
    get_bounded(src, offset, u32::BITS, "u32").map(|v| v as u32)
}

/// Encodes a non-negative `i32`.
pub fn encode_int(buf: &mut impl BufMut, value: i32) -> Result<usize, CodecError> {
    if value < 0 {
        return Err(CodecError::NegativeValue(i64::from(value)));
    }
    Ok(put_u64(buf, value as u64))
}

/// Encodes a non-negative `i64`.
pub fn encode_long(buf: &mut impl BufMut, value: i64) -> Result<usize, CodecError> {
    if value < 0 {
        return Err(CodecError::NegativeValue(value));
    }
    Ok(put_u64(buf, value as u64))
}

/// Decodes a non-negative `i32` starting at `*offset`.
pub fn decode_int(src: &[u8], offset: &mut usize) -> Result<i32, CodecError> {
    get_bounded(src, offset, i32::BITS - 1, "i32").map(|v| v as i32)
}

/// Decodes a non-negative `i64` starting at `*offset`.
pub fn decode_long(src: &[u8], offset: &mut usize) -> Result<i64, CodecError> {
    get_bounded(src, offset, i64::BITS - 1, "i64").map(|v| v as i64)
}

/// Encodes every value of `values` back to back.
pub fn encode_int_array(values: &[i32]) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::with_capacity(values.len() * 2);
    for &v in values {
        encode_int(&mut buf, v)?;
    }
    Ok(buf.freeze())
}

/// Encodes every value of `values` back to back.
pub fn encode_long_array(values: &[i64]) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::with_capacity(values.len() * 3);
    for &v in values {
        encode_long(&mut buf, v)?;
    }
    Ok(buf.freeze())
}

/// Decodes a blob produced by [`encode_int_array`].
pub fn decode_int_array(src: &[u8]) -> Result<Vec<i32>, CodecError> {
    let mut out = Vec::with_capacity(src.len());
    let mut offset = 0;
    while offset < src.len() {
        out.push(decode_int(src, &mut offset)?);
    }
    Ok(out)
}

/// Decodes a blob produced by [`encode_long_array`].
pub fn decode_long_array(src: &[u8]) -> Result<Vec<i64>, CodecError> {
    let mut out = Vec::with_capacity(src.len());
    let mut offset = 0;
    while offset < src.len() {
        out.push(decode_long(src, &mut offset)?);
    }
    Ok(out)
}

/// Reads one varint whose value must fit in `max_bits` bits.
fn get_bounded(
    src: &[u8],
    offset: &mut usize,
    max_bits: u32,
    target: &'static str,
) -> Result<u64, CodecError> {
    let start = *offset;
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = src.get(*offset) else {
            return Err(CodecError::Truncated(*offset - start));
        };
        *offset += 1;

        if shift >= max_bits {
            return Err(CodecError::Overflow(target));
        }
        let group = u64::from(byte & GROUP_MASK);
        let significant = u64::BITS - group.leading_zeros();
        if shift + significant > max_bits {
            return Err(CodecError::Overflow(target));
        }
        result |= group << shift;

        if byte & CONTINUATION == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_one(value: i64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_long(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode_one(0), vec![0x00]);
        assert_eq!(encode_one(1), vec![0x01]);
        assert_eq!(encode_one(127), vec![0x7F]);
        assert_eq!(encode_one(128), vec![0x80, 0x01]);
        assert_eq!(encode_one(300), vec![0xAC, 0x02]);
        assert_eq!(encode_one(16383), vec![0xFF, 0x7F]);
        assert_eq!(encode_one(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_encoded_lengths() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(127), 1);
        assert_eq!(encoded_len(128), 2);
        assert_eq!(encoded_len(i32::MAX as u64), MAX_INT_LEN);
        assert_eq!(encoded_len(i64::MAX as u64), MAX_LONG_LEN);
        assert_eq!(encoded_len(u64::MAX), MAX_U64_LEN);

        for v in [0i64, 127, 128, 16383, 2_147_483_646, i64::MAX] {
            assert_eq!(encode_one(v).len(), encoded_len(v as u64));
        }
    }

    #[test]
    fn test_int_array_roundtrip() {
        let values = [0, 127, 128, 16383, 2_147_483_646, i32::MAX];
        let blob = encode_int_array(&values).unwrap();
        assert_eq!(blob.len(), 1 + 1 + 2 + 2 + 5 + 5);
        assert_eq!(decode_int_array(&blob).unwrap(), values);
    }

    #[test]
    fn test_long_array_roundtrip() {
        let values = [0, 1, 1 << 35, 9_999_999_999, i64::MAX];
        let blob = encode_long_array(&values).unwrap();
        assert_eq!(decode_long_array(&blob).unwrap(), values);
    }

    #[test]
    fn test_empty_array() {
        let blob = encode_int_array(&[]).unwrap();
        assert!(blob.is_empty());
        assert!(decode_int_array(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_negative_rejected() {
        let mut buf = Vec::new();
        assert_eq!(encode_int(&mut buf, -1), Err(CodecError::NegativeValue(-1)));
        assert_eq!(
            encode_long(&mut buf, i64::MIN),
            Err(CodecError::NegativeValue(i64::MIN))
        );
        assert!(buf.is_empty());
        assert!(encode_int_array(&[1, 2, -3]).is_err());
    }

    #[test]
    fn test_truncated_input() {
        let mut offset = 0;
        assert_eq!(
            decode_int(&[0x80, 0x80], &mut offset),
            Err(CodecError::Truncated(2))
        );

        let mut offset = 0;
        assert_eq!(decode_int(&[], &mut offset), Err(CodecError::Truncated(0)));
    }

    #[test]
    fn test_int_overflow() {
        // 2^31 does not fit a non-negative i32
        let mut buf = Vec::new();
        put_u64(&mut buf, 1 << 31);
        let mut offset = 0;
        assert_eq!(
            decode_int(&buf, &mut offset),
            Err(CodecError::Overflow("i32"))
        );

        // but it does fit a u32
        let mut offset = 0;
        assert_eq!(get_u32(&buf, &mut offset), Ok(1 << 31));
    }

    #[test]
    fn test_offset_advances() {
        let mut buf = Vec::new();
        put_u64(&mut buf, 300);
        put_u64(&mut buf, 5);
        let mut offset = 0;
        assert_eq!(get_u64(&buf, &mut offset), Ok(300));
        assert_eq!(offset, 2);
        assert_eq!(get_u64(&buf, &mut offset), Ok(5));
        assert_eq!(offset, 3);
    }

    proptest! {
        #[test]
        fn prop_int_array_roundtrip(values in prop::collection::vec(0..=i32::MAX, 0..64)) {
            let blob = encode_int_array(&values).unwrap();
            prop_assert_eq!(decode_int_array(&blob).unwrap(), values);
        }

        #[test]
        fn prop_long_array_roundtrip(values in prop::collection::vec(0..=i64::MAX, 0..64)) {
            let blob = encode_long_array(&values).unwrap();
            prop_assert_eq!(decode_long_array(&blob).unwrap(), values);
        }

        #[test]
        fn prop_u64_roundtrip(value in any::<u64>()) {
            let mut buf = Vec::new();
            let written = put_u64(&mut buf, value);
            prop_assert_eq!(written, encoded_len(value));
            let mut offset = 0;
            prop_assert_eq!(get_u64(&buf, &mut offset).unwrap(), value);
            prop_assert_eq!(offset, written);
        }
    }
}
