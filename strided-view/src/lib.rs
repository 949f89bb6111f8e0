//! Device-agnostic strided view types and metadata operations.
//!
//! # Core Types
//!
//! - [`StridedView`] / [`StridedViewMut`]: Dynamic-rank strided views over existing data
//! - [`StridedArray`]: Owned strided multidimensional array
//!
//! # Metadata Transformations
//!
//! These operate only on dims/strides/offset and never access the underlying data:
//! - `as_strided`: Reinterpret with new dims and strides (zero strides allowed)
//! - `narrow`: Restrict one axis to a sub-range
//! - `permute`, `transpose`: Reorder dimensions
//! - `unsqueeze`, `reshape`: Change rank without moving data
//! - `broadcast`: Expand size-1 dimensions
//!
//! Strides and offsets are in element units throughout.

pub mod view;

pub use strided_traits::{Element, ScalarType};

pub use view::{col_major_strides, row_major_strides, StridedArray, StridedView, StridedViewMut};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided array operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// A (possibly negative) dimension argument falls outside `[-rank, rank)`.
    #[error("dimension {dim} out of range for rank {rank}")]
    DimOutOfRange { dim: isize, rank: usize },

    /// The same dimension appears more than once in a dimension list.
    #[error("dim {dim} appears multiple times in the list of dims")]
    DuplicateDim { dim: usize },

    /// Rank exceeds what a dimension bitset can represent.
    #[error("rank {rank} exceeds the maximum supported rank {max}")]
    RankTooLarge { rank: usize, max: usize },

    /// Operation requires a minimum rank.
    #[error("{op} expects an input with rank >= {min}, but got rank {rank}")]
    RankTooSmall {
        op: &'static str,
        rank: usize,
        min: usize,
    },

    /// rot90 needs exactly two rotation dims.
    #[error("expected total rotation dims == 2, but got dims = {0}")]
    RotationDimsCount(usize),

    /// rot90 rotation dims are equal or name the same axis modulo rank.
    #[error("expected rotation dims to be different, but got dim0 = {dim0} and dim1 = {dim1} for rank {rank}")]
    InvalidRotationDims {
        dim0: isize,
        dim1: isize,
        rank: usize,
    },

    /// roll shifts and dims do not align.
    #[error("shifts and dimensions must align: {shifts} shifts vs {dims} dims")]
    ShiftDimsMismatch { shifts: usize, dims: usize },

    /// `narrow` range exceeds the axis size.
    #[error("narrow out of range: start {start} + length {len} exceeds size {size} of axis {axis}")]
    NarrowOutOfRange {
        axis: usize,
        start: usize,
        len: usize,
        size: usize,
    },

    /// Zero stride is not allowed for the specified dimension.
    #[error("invalid stride 0 for dim {dim}")]
    ZeroStride { dim: usize },

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Integer overflow while computing array offset.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,

    /// A view that is not row-major contiguous cannot be reshaped without a copy.
    #[error("cannot reshape non-contiguous view of shape {0:?} without copying")]
    NonContiguousReshape(Vec<usize>),

    /// Buffer length does not match the number of elements implied by dims.
    #[error("data length mismatch: expected {expected} elements, found {found}")]
    DataLengthMismatch { expected: usize, found: usize },

    /// Raw byte buffer length does not match dims and element size.
    #[error("byte length mismatch: expected {expected} bytes, found {found}")]
    ByteLengthMismatch { expected: usize, found: usize },

    /// A raw byte is not a valid boolean.
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// `cat` needs at least one input.
    #[error("cat expects a non-empty list of arrays")]
    EmptyConcat,

    /// The element type has no instantiation for this operation.
    #[error("\"{op}\" not implemented for '{dtype}'")]
    NotImplemented { op: &'static str, dtype: ScalarType },

    /// The element type does not match what the caller expected.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ScalarType,
        found: ScalarType,
    },
}

impl StridedError {
    /// Malformed arguments: bad axes, ranks, shapes or buffer sizes.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_unsupported_dtype()
    }

    /// The element type cannot be handled by the requested operation.
    pub fn is_unsupported_dtype(&self) -> bool {
        matches!(
            self,
            StridedError::NotImplemented { .. } | StridedError::TypeMismatch { .. }
        )
    }
}

/// Result type for strided array operations.
pub type Result<T> = std::result::Result<T, StridedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_out_of_range_message() {
        let err = StridedError::DimOutOfRange { dim: 3, rank: 2 };
        assert_eq!(err.to_string(), "dimension 3 out of range for rank 2");
    }

    #[test]
    fn test_error_classification() {
        let err = StridedError::NotImplemented {
            op: "flip",
            dtype: ScalarType::Float8E4M3,
        };
        assert!(err.is_unsupported_dtype());
        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "\"flip\" not implemented for 'float8_e4m3'");

        let err = StridedError::DuplicateDim { dim: 1 };
        assert!(err.is_invalid_argument());
    }
}
