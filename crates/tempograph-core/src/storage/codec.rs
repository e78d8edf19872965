//! Series codec selection.
//!
//! Chooses how a property's value series is stored based on the runtime type
//! of its values. Homogeneous `Int32` or `Int64` series are encoded into one
//! tagged byte blob; anything else is kept as raw values.
//!
//! # Supported Codecs
//!
//! | Codec | Layout | Accepts |
//! |-------|--------|---------|
//! | Varint | concatenated varints | non-negative integers |
//! | DeltaVarint | base + diffs as zigzag varints | any integers |

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tempograph_common::{CodecError, Value};

use super::delta::DeltaEncoding;
use super::varint;

/// Codec used for integer value series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesCodec {
    /// Each value varint-encoded on its own.
    #[default]
    Varint,
    /// Delta reduction followed by zigzag varints.
    DeltaVarint,
}

impl SeriesCodec {
    /// Returns a human-readable name for the codec.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Varint => "Varint",
            Self::DeltaVarint => "DeltaVarint",
        }
    }
}

/// Element type tag of an encoded series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// 32-bit integers.
    Int32,
    /// 64-bit integers.
    Int64,
}

impl MetricType {
    /// Determines the element type of a homogeneous integer series.
    ///
    /// Fails on an empty series, on non-integer values, and on series mixing
    /// `Int32` with `Int64`.
    pub fn detect(values: &[Value]) -> Result<Self, CodecError> {
        let first = values.first().ok_or(CodecError::EmptyInput)?;
        let metric = match first {
            Value::Int32(_) => Self::Int32,
            Value::Int64(_) => Self::Int64,
            other => return Err(CodecError::UnsupportedType(other.type_name())),
        };
        match values.iter().find(|v| !metric.matches(v)) {
            Some(other) => Err(CodecError::UnsupportedType(other.type_name())),
            None => Ok(metric),
        }
    }

    /// Size of one value in its plain fixed-width form.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Int32 => 4,
            Self::Int64 => 8,
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Int32, Value::Int32(_)) | (Self::Int64, Value::Int64(_))
        )
    }
}

/// An integer series encoded into one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedSeries {
    metric: MetricType,
    codec: SeriesCodec,
    len: usize,
    data: Bytes,
}

impl EncodedSeries {
    /// Encodes a homogeneous integer series with `codec`.
    pub fn encode(values: &[Value], codec: SeriesCodec) -> Result<Self, CodecError> {
        let metric = MetricType::detect(values)?;
        let data = match (codec, metric) {
            (SeriesCodec::Varint, MetricType::Int32) => {
                let ints: Vec<i32> = values.iter().filter_map(Value::as_int32).collect();
                varint::encode_int_array(&ints)?
            }
            (SeriesCodec::Varint, MetricType::Int64) => {
                let longs: Vec<i64> = values.iter().filter_map(Value::as_int64).collect();
                varint::encode_long_array(&longs)?
            }
            (SeriesCodec::DeltaVarint, _) => DeltaEncoding::encode(values)?.to_bytes(),
        };
        Ok(Self {
            metric,
            codec,
            len: values.len(),
            data,
        })
    }

    /// Decodes the blob back into values of the original type.
    pub fn decode(&self) -> Result<Vec<Value>, CodecError> {
        let values: Vec<Value> = match (self.codec, self.metric) {
            (SeriesCodec::Varint, MetricType::Int32) => varint::decode_int_array(&self.data)?
                .into_iter()
                .map(Value::Int32)
                .collect(),
            (SeriesCodec::Varint, MetricType::Int64) => varint::decode_long_array(&self.data)?
                .into_iter()
                .map(Value::Int64)
                .collect(),
            (SeriesCodec::DeltaVarint, metric) => {
                DeltaEncoding::from_bytes(metric, &self.data)?.decode()?
            }
        };
        if values.len() != self.len {
            return Err(CodecError::LengthMismatch {
                expected: self.len,
                actual: values.len(),
            });
        }
        Ok(values)
    }

    /// Returns the element type tag.
    #[must_use]
    pub fn metric(&self) -> MetricType {
        self.metric
    }

    /// Returns the codec that produced the blob.
    #[must_use]
    pub fn codec(&self) -> SeriesCodec {
        self.codec
    }

    /// Returns the number of encoded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size of the series in plain fixed-width form.
    #[must_use]
    pub fn uncompressed_size(&self) -> usize {
        self.len * self.metric.width()
    }

    /// Returns the compression ratio (original / compressed).
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.data.is_empty() {
            return 1.0;
        }
        self.uncompressed_size() as f64 / self.data.len() as f64
    }
}

/// Stored form of a property's value series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueSeries {
    /// Integer series encoded into a blob.
    Encoded(EncodedSeries),
    /// Values kept as-is.
    Raw(Vec<Value>),
}

impl ValueSeries {
    /// Encodes `values` if `codec` accepts them, otherwise keeps them raw.
    ///
    /// Never fails: series that cannot be encoded are stored uncompressed.
    #[must_use]
    pub fn from_values(values: Vec<Value>, codec: SeriesCodec) -> Self {
        if values.is_empty() {
            return Self::Raw(values);
        }
        match EncodedSeries::encode(&values, codec) {
            Ok(encoded) => Self::Encoded(encoded),
            Err(reason) => {
                tracing::trace!(codec = codec.name(), %reason, "storing value series uncompressed");
                Self::Raw(values)
            }
        }
    }

    /// Returns the values in order.
    pub fn to_values(&self) -> Result<Vec<Value>, CodecError> {
        match self {
            Self::Encoded(encoded) => encoded.decode(),
            Self::Raw(values) => Ok(values.clone()),
        }
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Encoded(encoded) => encoded.len(),
            Self::Raw(values) => values.len(),
        }
    }

    /// Returns true if the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the series is stored encoded.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Encoded(_))
    }

    /// Approximate heap footprint of the stored values, in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::Encoded(encoded) => encoded.data().len(),
            Self::Raw(values) => values.iter().map(raw_value_size).sum(),
        }
    }
}

fn raw_value_size(value: &Value) -> usize {
    let payload = match value {
        Value::String(s) => s.len(),
        Value::Bytes(b) => b.len(),
        _ => 0,
    };
    std::mem::size_of::<Value>() + payload
}
