//! NDR error types

use thiserror::Error;

/// Upper bound on bytes allocated for a single decoded string or blob
pub const MAX_NDR_ALLOCATION_SIZE: usize = 16 * 1024 * 1024;

/// Upper bound on elements allocated for a single decoded array
pub const MAX_NDR_ARRAY_ELEMENTS: usize = 1024 * 1024;

/// NDR encoding/decoding errors
#[derive(Debug, Error)]
pub enum NdrError {
    /// Not enough data left in the stub
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    #[error("invalid string: {0}")]
    InvalidString(String),

    /// A non-zero referent was found where the schema has no pointer slot
    #[error("invalid pointer: referent ID {0:#x}")]
    InvalidPointer(u32),

    #[error("array size mismatch: expected {expected}, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Unknown union arm
    #[error("invalid union discriminant: {0:#x}")]
    InvalidDiscriminant(u32),

    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u32, actual_count: u32 },

    #[error("allocation of {requested} exceeds limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    #[error("integer overflow computing wire size")]
    IntegerOverflow,

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("UTF-16 error: {0}")]
    Utf16Error(#[from] std::char::DecodeUtf16Error),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
