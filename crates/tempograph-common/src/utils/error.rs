//! Error types for Tempograph.
//!
//! Every failure is synchronous and local to the call that raised it; nothing
//! is retried internally.

use crate::types::{EntityKind, EntityRef, PropertyId, Timestamp};

/// Result type alias for Tempograph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Timestamp before the reference instant or beyond the 32-bit offset window.
    #[error("timestamp {timestamp} falls outside the supported range starting at {reference}")]
    TimeRange {
        /// The rejected timestamp.
        timestamp: Timestamp,
        /// The reference instant the window starts at.
        reference: Timestamp,
    },

    /// Vertex or edge id not yet allocated.
    #[error("{kind} {id} not found")]
    UnknownEntity {
        /// Kind of entity that was looked up.
        kind: EntityKind,
        /// Raw id that was looked up.
        id: u32,
    },

    /// A property write or attachment that would break time ordering.
    #[error("property ordering violated: {0}")]
    PropertyOrdering(String),

    /// Named property not owned by the entity.
    #[error("property {name:?} not found for {owner}")]
    PropertyNotFound {
        /// The property name that was looked up.
        name: String,
        /// The entity that was searched.
        owner: EntityRef,
    },

    /// More than one property with the same name on one entity.
    #[error("{owner} owns more than one property named {name:?}")]
    DuplicateProperty {
        /// The duplicated property name.
        name: String,
        /// The entity holding the duplicates.
        owner: EntityRef,
    },

    /// Invalid argument supplied to a constructor.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Property id already stored for another entity.
    #[error("property id {0} is already in use")]
    PropertyIdInUse(PropertyId),

    /// The 32-bit identifier counter for this entity kind is used up.
    #[error("{0} identifier space exhausted")]
    IdSpaceExhausted(EntityKind),

    /// Encoding or decoding failure.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Codec-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Varint encoding was asked to encode a negative number.
    #[error("varint encoding only supports non-negative values, got {0}")]
    NegativeValue(i64),

    /// Integer codecs were given a value of another type.
    #[error("integer encoding not supported for type {0}")]
    UnsupportedType(&'static str),

    /// A codec that needs at least one value was given none.
    #[error("cannot encode an empty series")]
    EmptyInput,

    /// Input ended in the middle of a varint.
    #[error("varint truncated after {0} bytes")]
    Truncated(usize),

    /// Decoded value does not fit in the target type.
    #[error("decoded value overflows {0}")]
    Overflow(&'static str),

    /// Decoded element count disagrees with the recorded one.
    #[error("expected {expected} values, decoded {actual}")]
    LengthMismatch {
        /// Count recorded at encode time.
        expected: usize,
        /// Count actually decoded.
        actual: usize,
    },
}

impl Error {
    /// Returns true if the error comes from a timestamp outside the window.
    #[must_use]
    pub const fn is_time_range(&self) -> bool {
        matches!(self, Self::TimeRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VertexId;

    #[test]
    fn test_error_messages() {
        let err = Error::UnknownEntity {
            kind: EntityKind::Vertex,
            id: 4,
        };
        assert_eq!(err.to_string(), "vertex 4 not found");

        let err = Error::PropertyNotFound {
            name: "bandwidth".to_string(),
            owner: EntityRef::Vertex(VertexId::new(2)),
        };
        assert_eq!(
            err.to_string(),
            "property \"bandwidth\" not found for vertex v2"
        );

        let err = Error::IdSpaceExhausted(EntityKind::Property);
        assert_eq!(err.to_string(), "property identifier space exhausted");
    }

    #[test]
    fn test_codec_error_conversion() {
        let err: Error = CodecError::NegativeValue(-1).into();
        assert!(matches!(err, Error::Codec(CodecError::NegativeValue(-1))));
        assert!(!err.is_time_range());
    }
}
