//! Error types for itensor.

use thiserror::Error;

/// Errors that can occur in tensor operations.
///
/// `RankOverflow` and `IndexMismatch` are the two ways a contraction or an
/// addition can fail on incompatible operands.
#[derive(Debug, Error)]
pub enum TensorError {
    /// The result of an operation would carry more nontrivial indices than supported.
    #[error("rank overflow: result needs {rank} nontrivial indices, maximum is {max}")]
    RankOverflow { rank: usize, max: usize },

    /// Two tensors do not carry the same index set (required by addition and assignment).
    #[error("index mismatch: {lhs} vs {rhs}")]
    IndexMismatch { lhs: String, rhs: String },

    /// An operation referenced an index the tensor does not carry.
    #[error("index not found: {index}")]
    IndexNotFound { index: String },

    /// Element access did not name every nontrivial index exactly once.
    #[error("incomplete indexing: expected {expected} index values, matched {actual}")]
    IncompleteIndexing { expected: usize, actual: usize },

    /// Length of supplied data disagrees with the index-derived size.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A binary stream could not be decoded.
    #[error("malformed stream: {reason}")]
    MalformedStream { reason: String },

    /// An index value is outside the range of its index.
    #[error("index value {value} out of bounds for {index} (dimension {dim})")]
    IndexOutOfBounds {
        index: String,
        value: usize,
        dim: usize,
    },

    /// The same index appears twice in an index list.
    #[error("duplicate index: {index}")]
    DuplicateIndex { index: String },

    /// A dimension-1 index was required.
    #[error("index {index} is not trivial (dimension must be 1)")]
    NotTrivialIndex { index: String },

    /// Operation requires a specific tensor rank.
    #[error("expected tensor of rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// The product of the index dimensions does not fit in `usize`.
    #[error("size overflow: dimensions {dims:?} exceed the addressable element count")]
    SizeOverflow { dims: Vec<usize> },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?}")]
    InvalidPermutation { perm: Vec<usize> },

    /// Underlying I/O failure while reading or writing a stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
