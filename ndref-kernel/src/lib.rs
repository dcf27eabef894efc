//! Generic traversal and transform kernels over ndref views.
//!
//! Every elementwise or reducing operation in the engine is expressed through
//! the small dispatch layer here. Kernels read views through their cursors
//! and allocate a fresh buffer for any new data they produce; inputs are
//! never modified unless the function says so.
//!
//! # Dispatch
//!
//! - [`for_each`], [`for_each_indexed`], [`for_each_multi_indexed`]: visit elements
//! - [`for_each_axis`], [`for_each_axis_indexed`], [`for_each_axis_multi_indexed`]:
//!   visit 1-D lanes along one axis
//! - [`apply`], [`apply2`], [`apply2_broadcast`]: elementwise maps into fresh arrays
//! - [`reduce`], [`reduce_axis`], [`fold`]: folds over all elements or per lane
//!
//! # Built on top
//!
//! - [`add`], [`sub`], [`mul`], [`div`], [`neg`], [`equal`], [`less`], [`and`], [`xor`]
//! - [`sum`], [`sum_axis`], [`dot`]
//! - [`packbits`], [`unpackbits`]
//! - [`matmul`] (and `matmul_faer` with the `faer` feature)
//!
//! # Example
//!
//! ```rust
//! use ndref_kernel::{apply2, packbits, reduce, NdArrayRef};
//!
//! let a = NdArrayRef::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! let b = NdArrayRef::broadcast_scalar(2, &[2, 3]);
//!
//! let rem = apply2(&a, &b, |x, m| x % m == 1).unwrap();
//! let packed = packbits(&rem, None).unwrap();
//! assert_eq!(packed.to_vec(), vec![0b010101]);
//!
//! let row_sums = reduce(&a, Some(1), 0, true, |acc, x| acc + x).unwrap();
//! assert_eq!(row_sums.shape(), &[2, 1]);
//! assert_eq!(row_sums.to_vec(), vec![6, 15]);
//! ```

pub mod apply;
pub mod bits;
pub mod for_each;
pub mod matmul;
pub mod ops;
pub mod reduce;

pub use ndref_view::{
    broadcast_shape, compact_strides, concatenate, deduce_matmul_shape, normalize_axis, numel,
    ArrayRef, AxisIndex, Buffer, Element, NdArrayRef, NdCursor, NdError, Numeric, Pod, Result,
    Slice,
};

pub use apply::{apply, apply2, apply2_broadcast, apply2_flat, apply_flat};
pub use bits::{packbits, unpackbits};
pub use for_each::{
    for_each, for_each_axis, for_each_axis_indexed, for_each_axis_multi_indexed, for_each_flat,
    for_each_flat_indexed, for_each_indexed, for_each_multi_indexed,
};
pub use matmul::matmul;
#[cfg(feature = "faer")]
pub use matmul::matmul_faer;
pub use ops::{add, and, div, dot, equal, less, mul, neg, sub, sum, sum_axis, xor};
pub use reduce::{fold, reduce, reduce_axis};

/// Booleans per packed byte.
pub const BITS_PER_BYTE: usize = 8;
