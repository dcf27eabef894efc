//! Linear (one-stride) views.

use std::rc::Rc;

use crate::buffer::Buffer;
use crate::iter::ArrayIter;
use crate::nd_array_ref::NdArrayRef;
use crate::shape::{linear_strides, numel, validate_bounds};
use crate::slice::Slice;
use crate::{Element, NdError, Result};

/// Linear view `{buffer, numel, stride, offset}`.
///
/// Logical index `i` lives at buffer position `offset + stride * i`. A view
/// with `stride == 0` is a broadcast: one stored value repeated over `numel`
/// logical positions. Public constructors only build broadcasts over
/// one-element buffers; writing through a broadcast view panics.
pub struct ArrayRef<T> {
    buf: Rc<Buffer<T>>,
    numel: usize,
    stride: isize,
    offset: isize,
}

impl<T> Clone for ArrayRef<T> {
    fn clone(&self) -> Self {
        Self {
            buf: Rc::clone(&self.buf),
            numel: self.numel,
            stride: self.stride,
            offset: self.offset,
        }
    }
}

impl<T: Element> std::fmt::Debug for ArrayRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayRef")
            .field("numel", &self.numel)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .field("values", &self.to_vec())
            .finish()
    }
}

impl<T: Element> ArrayRef<T> {
    /// Create a view over an existing buffer, validating that every
    /// addressed position is in bounds.
    pub fn new(buf: Rc<Buffer<T>>, numel: usize, stride: isize, offset: isize) -> Result<Self> {
        validate_bounds(buf.len(), &[numel], &[stride], offset)?;
        if stride == 0 && numel > 1 && buf.len() != 1 {
            return Err(NdError::NumelMismatch {
                expected: 1,
                got: buf.len(),
            });
        }
        Ok(Self::from_parts_unchecked(buf, numel, stride, offset))
    }

    /// Caller guarantees every position `offset + stride * i` is in bounds.
    pub(crate) fn from_parts_unchecked(
        buf: Rc<Buffer<T>>,
        numel: usize,
        stride: isize,
        offset: isize,
    ) -> Self {
        Self {
            buf,
            numel,
            stride,
            offset,
        }
    }

    /// Compact view over freshly owned data.
    pub fn from_vec(data: Vec<T>) -> Self {
        let numel = data.len();
        Self::from_parts_unchecked(Rc::new(Buffer::from_vec(data)), numel, 1, 0)
    }

    pub fn zeros(numel: usize) -> Self {
        Self::from_parts_unchecked(Rc::new(Buffer::create(numel)), numel, 1, 0)
    }

    pub fn filled(numel: usize, value: T) -> Self {
        Self::from_parts_unchecked(Rc::new(Buffer::create_filled(numel, value)), numel, 1, 0)
    }

    /// One value repeated over `numel` positions, backed by a one-element
    /// buffer.
    pub fn broadcast(value: T, numel: usize) -> Self {
        Self::from_parts_unchecked(Rc::new(Buffer::create_filled(1, value)), numel, 0, 0)
    }

    #[inline]
    pub fn numel(&self) -> usize {
        self.numel
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.numel == 0
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn buffer(&self) -> &Rc<Buffer<T>> {
        &self.buf
    }

    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.stride == 0
    }

    #[inline]
    pub fn is_compact(&self) -> bool {
        self.stride == 1 || self.numel <= 1
    }

    /// Buffer position of logical index `i`.
    #[inline]
    pub fn pos(&self, i: usize) -> usize {
        (self.offset + self.stride * i as isize) as usize
    }

    pub fn get(&self, i: usize) -> T {
        assert!(i < self.numel, "index {} out of bounds for numel {}", i, self.numel);
        self.buf.get(self.pos(i))
    }

    pub fn try_get(&self, i: usize) -> Result<T> {
        if i >= self.numel {
            return Err(NdError::IndexOutOfRange {
                axis: 0,
                index: i as isize,
                dim: self.numel,
            });
        }
        Ok(self.buf.get(self.pos(i)))
    }

    pub fn set(&self, i: usize, value: T) {
        assert!(
            self.stride != 0 || self.numel <= 1,
            "cannot write through a broadcast view"
        );
        assert!(i < self.numel, "index {} out of bounds for numel {}", i, self.numel);
        self.buf.set(self.pos(i), value)
    }

    pub fn iter(&self) -> ArrayIter<'_, T> {
        ArrayIter::new(&self.buf, self.numel, self.stride, self.offset)
    }

    /// Sub-view selected by a slice. No copy.
    pub fn slice(&self, slice: &Slice) -> Result<ArrayRef<T>> {
        let s = slice.normalize(self.numel)?;
        Ok(Self::from_parts_unchecked(
            Rc::clone(&self.buf),
            s.numel(),
            s.stride(self.stride),
            self.offset + self.stride * s.start as isize,
        ))
    }

    /// Reinterpret as an N-dimensional view with `linear_strides(stride, shape)`.
    /// Never copies.
    pub fn unflatten(&self, shape: &[usize]) -> Result<NdArrayRef<T>> {
        let n = numel(shape);
        if n != self.numel {
            return Err(NdError::NumelMismatch {
                expected: self.numel,
                got: n,
            });
        }
        let strides = linear_strides(self.stride, shape);
        Ok(NdArrayRef::from_parts_unchecked(
            Rc::clone(&self.buf),
            shape,
            &strides,
            self.offset,
        ))
    }

    /// Copy out in logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Fresh compact array of `f` applied to every element.
    pub fn map<U: Element, F: FnMut(T) -> U>(&self, f: F) -> ArrayRef<U> {
        ArrayRef::from_vec(self.iter().map(f).collect())
    }

    pub fn shares_buffer(&self, other: &ArrayRef<T>) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }
}

impl<T: Element> From<Vec<T>> for ArrayRef<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
