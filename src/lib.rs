//! Strided N-dimensional array views over shared buffers.
//!
//! `ndref` is a generic array engine whose elements may be any copyable
//! scalar: built-in numbers, booleans, complex numbers, or fixed-width ring
//! values supplied by a higher layer. Arrays are *views* `{buffer, shape,
//! strides, offset}` over reference-counted storage, so slicing, reversing,
//! permuting and broadcasting never copy. A small set of traversal
//! primitives (apply, reduce, for-each, axis-wise for-each) carries every
//! elementwise and reducing operation built on top.
//!
//! # Crates
//!
//! - [`ndref_traits`]: the element contract ([`Element`], [`Numeric`], [`Pod`])
//! - [`ndref_view`]: [`Buffer`], [`ArrayRef`], [`NdArrayRef`], slicing and shape algebra
//! - [`ndref_kernel`]: dispatch, elementwise ops, bit packing, matmul
//!
//! # Views share storage
//!
//! ```rust
//! use ndref::{AxisIndex, NdArrayRef, Slice};
//!
//! let a = NdArrayRef::from_fn(&[4, 4], |i| (i[0] * 4 + i[1]) as i64);
//!
//! // Lower-right quadrant, written in place through a view.
//! let q = a.slice(&[AxisIndex::from(2..), AxisIndex::from(2..)]).unwrap();
//! q.fill(-1);
//! assert_eq!(a.get(&[3, 3]), -1);
//! assert_eq!(a.get(&[1, 1]), 5);
//!
//! // Reversed rows, no copy.
//! let r = a.slice(&[AxisIndex::from(Slice::reversed())]).unwrap();
//! assert!(r.shares_buffer(&a));
//! assert_eq!(r.get(&[0, 0]), 12);
//! ```
//!
//! # Transforms
//!
//! ```rust
//! use ndref::{add, apply2_broadcast, packbits, sum_axis, NdArrayRef};
//!
//! let a = NdArrayRef::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let col = NdArrayRef::from_vec(vec![10.0, 20.0], &[2, 1]).unwrap();
//!
//! let b = apply2_broadcast(&a, &col, |x, y| x + y).unwrap();
//! assert_eq!(b.to_vec(), vec![11.0, 12.0, 13.0, 24.0, 25.0, 26.0]);
//!
//! let twice = add(&a, &a).unwrap();
//! assert_eq!(sum_axis(&twice, 0, false).unwrap().to_vec(), vec![10.0, 14.0, 18.0]);
//!
//! let odd = a.map(|x| x as i64 % 2 == 1);
//! assert_eq!(packbits(&odd, None).unwrap().to_vec(), vec![0b010101]);
//! ```
//!
//! # Threading
//!
//! Buffers are `Rc`-shared with `Cell` elements, so views are neither `Send`
//! nor `Sync`. Move data across threads with `to_vec` and `from_vec`.

pub use ndref_kernel;
pub use ndref_traits;
pub use ndref_view;

pub use ndref_traits::{Element, Numeric, Pod};

pub use ndref_view::{
    broadcast_shape, calc_numel, compact_strides, concatenate, deduce_concatenate_shape,
    deduce_matmul_shape, flatten_index, is_compact, is_linear, linear_step, linear_strides,
    normalize_axis, normalize_indices, numel, unflatten_index, ArrayIter, ArrayRef, AxisIndex,
    Buffer, Lanes, LinearCursor, NdArrayRef, NdCursor, NdError, NdIndexedIter, NdIter,
    NormalizedIndex, NormalizedSlice, RawParts, Result, Slice,
};

pub use ndref_kernel::{
    add, and, apply, apply2, apply2_broadcast, apply2_flat, apply_flat, div, dot, equal, fold,
    for_each, for_each_axis, for_each_axis_indexed, for_each_axis_multi_indexed, for_each_flat,
    for_each_flat_indexed, for_each_indexed, for_each_multi_indexed, less, matmul, mul, neg,
    packbits, reduce, reduce_axis, sub, sum, sum_axis, unpackbits, xor, BITS_PER_BYTE,
};

#[cfg(feature = "faer")]
pub use ndref_kernel::matmul_faer;
