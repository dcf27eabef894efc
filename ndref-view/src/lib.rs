//! Strided array views over shared, reference-counted buffers.
//!
//! This crate holds the data model of the ndref engine. Everything here
//! manipulates metadata (shape, strides, offset) over a [`Buffer`] that several
//! views may share; element data is only touched by the few constructors that
//! materialize a fresh buffer (`flatten` of a non-linear view, `concatenate`,
//! `to_compact`).
//!
//! # Core Types
//!
//! - [`Buffer`]: contiguous element storage shared through `Rc`
//! - [`ArrayRef`]: linear view `{buffer, numel, stride, offset}`
//! - [`NdArrayRef`]: N-dimensional view `{buffer, shape, strides, offset}`
//! - [`Slice`] / [`AxisIndex`]: Python-style slice specs and their normalized forms
//! - [`LinearCursor`] / [`NdCursor`]: O(1) amortized position cursors
//!
//! # Example
//!
//! ```rust
//! use ndref_view::{AxisIndex, NdArrayRef, Slice};
//!
//! let a = NdArrayRef::from_vec((0..12).collect::<Vec<i32>>(), &[3, 4]).unwrap();
//!
//! // Every other column of the last two rows, reversed. No copy.
//! let s = a
//!     .slice(&[
//!         AxisIndex::from(Slice::new(Some(1), None, None)),
//!         AxisIndex::from(Slice::new(None, None, Some(-2))),
//!     ])
//!     .unwrap();
//! assert_eq!(s.shape(), &[2, 2]);
//! assert_eq!(s.to_vec(), vec![7, 5, 11, 9]);
//! assert!(s.shares_buffer(&a));
//!
//! // Integer indices drop the axis.
//! let row = a.slice(&[AxisIndex::At(-1)]).unwrap();
//! assert_eq!(row.to_vec(), vec![8, 9, 10, 11]);
//! ```
//!
//! # Aliasing
//!
//! Buffers are shared through `Rc` and store elements in `Cell`s, so views
//! are neither `Send` nor `Sync`. Writes through one view are visible through
//! every other view of the same buffer; the compiler keeps all of that on one
//! thread.

pub mod array_ref;
pub mod buffer;
pub mod concat;
pub mod iter;
pub mod nd_array_ref;
pub mod shape;
pub mod slice;

pub use array_ref::ArrayRef;
pub use buffer::Buffer;
pub use concat::concatenate;
pub use iter::{ArrayIter, Lanes, LinearCursor, NdCursor, NdIndexedIter, NdIter};
pub use nd_array_ref::{NdArrayRef, RawParts};
pub use ndref_traits::{Element, Numeric, Pod};
pub use shape::{
    broadcast_shape, compact_strides, deduce_concatenate_shape, deduce_matmul_shape,
    flatten_index, is_compact, is_linear, linear_step, linear_strides, normalize_axis, numel,
    unflatten_index,
};
pub use slice::{calc_numel, normalize_indices, AxisIndex, NormalizedIndex, NormalizedSlice, Slice};

// ============================================================================
// Error types
// ============================================================================

/// Errors reported by view construction, slicing, and shape deduction.
///
/// Every variant carries the offending shape, axis, or index. None of the
/// operations that return these errors leave a partially built view behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdError {
    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Axis does not exist for the given rank (after negative wrapping).
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: isize, rank: usize },

    /// Shapes cannot be broadcast against each other.
    #[error("shapes {0:?} and {1:?} are not broadcast compatible")]
    NotBroadcastable(Vec<usize>, Vec<usize>),

    /// Matrix operands disagree on the contracted dimension.
    #[error("inner dimension mismatch: lhs has {lhs}, rhs has {rhs}")]
    InnerDimMismatch { lhs: usize, rhs: usize },

    /// An operation that needs at least one input received none.
    #[error("empty input list")]
    EmptyInput,

    /// Integer index outside `[-dim, dim)`.
    #[error("index {index} out of range for axis {axis} with size {dim}")]
    IndexOutOfRange { axis: usize, index: isize, dim: usize },

    /// Slice normalized to an empty range.
    #[error("empty slice on axis {axis}: start={start:?} stop={stop:?} step={step} for size {dim}")]
    EmptySlice {
        axis: usize,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
        dim: usize,
    },

    /// More indices than the view has axes.
    #[error("too many indices: {got} for rank {rank}")]
    TooManyIndices { got: usize, rank: usize },

    /// Slice step of zero.
    #[error("slice step cannot be zero (axis {axis})")]
    ZeroStep { axis: usize },

    /// Stride vector length differs from the shape length.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// Requested shape holds a different number of elements.
    #[error("element count mismatch: expected {expected}, got {got}")]
    NumelMismatch { expected: usize, got: usize },

    /// View would address memory outside its buffer.
    #[error("view addresses elements outside its buffer")]
    OffsetOverflow,
}

impl NdError {
    /// Out-of-range integer index or empty normalized slice.
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            NdError::IndexOutOfRange { .. }
                | NdError::EmptySlice { .. }
                | NdError::TooManyIndices { .. }
        )
    }

    /// Mismatched shapes or ranks, or an invalid axis.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            NdError::ShapeMismatch(..)
                | NdError::RankMismatch(..)
                | NdError::InvalidAxis { .. }
                | NdError::NotBroadcastable(..)
                | NdError::InnerDimMismatch { .. }
                | NdError::EmptyInput
        )
    }
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, NdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(NdError::IndexOutOfRange { axis: 0, index: 5, dim: 3 }.is_index_error());
        assert!(NdError::InvalidAxis { axis: 3, rank: 2 }.is_shape_error());
        assert!(!NdError::ZeroStep { axis: 0 }.is_shape_error());
        assert!(!NdError::ZeroStep { axis: 0 }.is_index_error());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let e = NdError::ShapeMismatch(vec![2, 3], vec![3, 2]);
        assert_eq!(e.to_string(), "shape mismatch: [2, 3] vs [3, 2]");
        let e = NdError::IndexOutOfRange { axis: 1, index: -4, dim: 3 };
        assert_eq!(e.to_string(), "index -4 out of range for axis 1 with size 3");
    }
}
