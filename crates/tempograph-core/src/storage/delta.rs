//! Delta reduction for integer series.
//!
//! A series is stored as its first value followed by the differences between
//! neighbours. The difference array repeats the base at index 0, so
//! `diffs[0] == base` and `diffs[i] == values[i] - values[i - 1]`.
//!
//! Differences are carried as `i64` whatever the element width. For `Int32`
//! series they are exact; `Int64` series use wrapping arithmetic so the
//! reconstruction is exact even when a difference overflows.
//!
//! Floating-point and non-numeric series are rejected.

use bytes::{Bytes, BytesMut};
use tempograph_common::{CodecError, Value};

use super::codec::MetricType;
use super::zigzag;

/// A delta-reduced integer series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEncoding {
    metric: MetricType,
    diffs: Vec<i64>,
}

impl DeltaEncoding {
    /// Delta-reduces a homogeneous `Int32` or `Int64` series.
    pub fn encode(values: &[Value]) -> Result<Self, CodecError> {
        match MetricType::detect(values)? {
            MetricType::Int32 => {
                let ints: Vec<i32> = values.iter().filter_map(Value::as_int32).collect();
                Self::encode_i32(&ints)
            }
            MetricType::Int64 => {
                let longs: Vec<i64> = values
                    .iter()
                    .filter_map(|v| match v {
                        Value::Int64(l) => Some(*l),
                        _ => None,
                    })
                    .collect();
                Self::encode_i64(&longs)
            }
        }
    }

    /// Delta-reduces a series of `i32`.
    pub fn encode_i32(values: &[i32]) -> Result<Self, CodecError> {
        let (&first, _) = values.split_first().ok_or(CodecError::EmptyInput)?;
        let mut diffs = Vec::with_capacity(values.len());
        diffs.push(i64::from(first));
        diffs.extend(
            values
                .windows(2)
                .map(|w| i64::from(w[1]) - i64::from(w[0])),
        );
        Ok(Self {
            metric: MetricType::Int32,
            diffs,
        })
    }

    /// Delta-reduces a series of `i64`.
    pub fn encode_i64(values: &[i64]) -> Result<Self, CodecError> {
        let (&first, _) = values.split_first().ok_or(CodecError::EmptyInput)?;
        let mut diffs = Vec::with_capacity(values.len());
        diffs.push(first);
        diffs.extend(values.windows(2).map(|w| w[1].wrapping_sub(w[0])));
        Ok(Self {
            metric: MetricType::Int64,
            diffs,
        })
    }

    /// Returns the element type of the original series.
    #[must_use]
    pub fn metric(&self) -> MetricType {
        self.metric
    }

    /// Returns the first value of the series.
    #[must_use]
    pub fn base(&self) -> i64 {
        self.diffs[0]
    }

    /// Returns the difference array, base included.
    #[must_use]
    pub fn diffs(&self) -> &[i64] {
        &self.diffs
    }

    /// Returns the number of values in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// Always false: an encoding holds at least its base.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Reconstructs the series as `i64`, whatever its original width.
    #[must_use]
    pub fn decode_i64(&self) -> Vec<i64> {
        let mut current = 0i64;
        self.diffs
            .iter()
            .map(|&d| {
                current = current.wrapping_add(d);
                current
            })
            .collect()
    }

    /// Reconstructs an `Int32` series.
    pub fn decode_i32(&self) -> Result<Vec<i32>, CodecError> {
        self.decode_i64()
            .into_iter()
            .map(|v| i32::try_from(v).map_err(|_| CodecError::Overflow("i32")))
            .collect()
    }

    /// Reconstructs the series with its original value type.
    pub fn decode(&self) -> Result<Vec<Value>, CodecError> {
        match self.metric {
            MetricType::Int32 => Ok(self.decode_i32()?.into_iter().map(Value::Int32).collect()),
            MetricType::Int64 => Ok(self.decode_i64().into_iter().map(Value::Int64).collect()),
        }
    }

    /// Serializes the difference array as zigzag varints.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.diffs.len() * 2);
        for &d in &self.diffs {
            zigzag::put_i64(&mut buf, d);
        }
        buf.freeze()
    }

    /// Parses a difference array written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(metric: MetricType, data: &[u8]) -> Result<Self, CodecError> {
        let mut diffs = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            diffs.push(zigzag::get_i64(data, &mut offset)?);
        }
        if diffs.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        Ok(Self { metric, diffs })
    }
}
