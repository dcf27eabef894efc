//! Position cursors and element iterators.
//!
//! Cursors are ephemeral: they track a buffer position and a logical index
//! and never own the buffer. [`NdCursor`] precomputes one position delta per
//! axis so that every step costs O(1) amortized instead of recomputing the
//! address from the multi-index.

use std::rc::Rc;

use crate::array_ref::ArrayRef;
use crate::buffer::Buffer;
use crate::shape::numel;
use crate::Element;

// ============================================================================
// Linear cursor
// ============================================================================

/// Cursor over a linear view: `pos = offset + stride * index`.
///
/// Two cursors compare equal when their logical indices match; positions are
/// not compared.
#[derive(Debug, Clone, Copy)]
pub struct LinearCursor {
    pos: isize,
    index: usize,
    stride: isize,
}

impl LinearCursor {
    pub fn new(offset: isize, stride: isize) -> Self {
        Self {
            pos: offset,
            index: 0,
            stride,
        }
    }

    /// Cursor placed at logical index `index`, usable as an end sentinel.
    pub fn at(offset: isize, stride: isize, index: usize) -> Self {
        Self {
            pos: offset + stride * index as isize,
            index,
            stride,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.stride;
        self.index += 1;
    }

    #[inline]
    pub fn pos(&self) -> isize {
        self.pos
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for LinearCursor {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for LinearCursor {}

// ============================================================================
// N-dimensional cursor
// ============================================================================

/// Cursor over an N-dimensional strided layout in row-major order.
///
/// `increments[k]` is the position delta applied when axis `k` is the most
/// significant axis touched by a step, i.e. axis `k` moves forward by one
/// while every axis after it wraps from its last index back to 0:
///
/// `increments[k] = strides[k] - sum_{j>k} strides[j] * (shape[j] - 1)`
///
/// Once every element has been visited the cursor is exhausted and `pos`
/// is `-1`.
#[derive(Debug, Clone)]
pub struct NdCursor {
    pos: isize,
    index: usize,
    numel: usize,
    indices: Vec<usize>,
    shape: Vec<usize>,
    increments: Vec<isize>,
}

impl NdCursor {
    pub fn new(shape: &[usize], strides: &[isize], offset: isize) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        let rank = shape.len();
        let mut increments = vec![0isize; rank];
        let mut wrapped = 0isize;
        for k in (0..rank).rev() {
            increments[k] = strides[k] - wrapped;
            wrapped += strides[k] * (shape[k] as isize - 1).max(0);
        }
        let numel = numel(shape);
        Self {
            pos: if numel == 0 { -1 } else { offset },
            index: 0,
            numel,
            indices: vec![0; rank],
            shape: shape.to_vec(),
            increments,
        }
    }

    /// Step to the next element in row-major order.
    #[inline]
    pub fn advance(&mut self) {
        if self.index >= self.numel {
            return;
        }
        self.index += 1;
        if self.index == self.numel {
            self.pos = -1;
            return;
        }
        // Not exhausted, so some axis below rank has room to move.
        let mut c = self.shape.len() - 1;
        loop {
            self.indices[c] += 1;
            if self.indices[c] < self.shape[c] {
                break;
            }
            self.indices[c] = 0;
            c -= 1;
        }
        self.pos += self.increments[c];
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.numel
    }

    #[inline]
    pub fn pos(&self) -> isize {
        self.pos
    }

    /// Row-major logical index of the current element.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Multi-index of the current element.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn increments(&self) -> &[isize] {
        &self.increments
    }
}

// ============================================================================
// Element iterators
// ============================================================================

/// Iterator over the elements of an [`ArrayRef`] in logical order.
pub struct ArrayIter<'a, T> {
    buf: &'a Buffer<T>,
    cursor: LinearCursor,
    end: LinearCursor,
}

impl<'a, T: Element> ArrayIter<'a, T> {
    pub(crate) fn new(buf: &'a Buffer<T>, numel: usize, stride: isize, offset: isize) -> Self {
        Self {
            buf,
            cursor: LinearCursor::new(offset, stride),
            end: LinearCursor::at(offset, stride, numel),
        }
    }
}

impl<T: Element> Iterator for ArrayIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.cursor == self.end {
            return None;
        }
        let value = self.buf.get(self.cursor.pos() as usize);
        self.cursor.advance();
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.index() - self.cursor.index();
        (remaining, Some(remaining))
    }
}

impl<T: Element> ExactSizeIterator for ArrayIter<'_, T> {}

/// Iterator over the elements of an N-dimensional view in row-major order.
pub struct NdIter<'a, T> {
    buf: &'a Buffer<T>,
    cursor: NdCursor,
}

impl<'a, T: Element> NdIter<'a, T> {
    pub(crate) fn new(buf: &'a Buffer<T>, shape: &[usize], strides: &[isize], offset: isize) -> Self {
        Self {
            buf,
            cursor: NdCursor::new(shape, strides, offset),
        }
    }
}

impl<T: Element> Iterator for NdIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.cursor.is_exhausted() {
            return None;
        }
        let value = self.buf.get(self.cursor.pos() as usize);
        self.cursor.advance();
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.numel - self.cursor.index();
        (remaining, Some(remaining))
    }
}

impl<T: Element> ExactSizeIterator for NdIter<'_, T> {}

/// Iterator yielding `(multi_index, value)` pairs in row-major order.
pub struct NdIndexedIter<'a, T> {
    inner: NdIter<'a, T>,
}

impl<'a, T: Element> NdIndexedIter<'a, T> {
    pub(crate) fn new(inner: NdIter<'a, T>) -> Self {
        Self { inner }
    }
}

impl<T: Element> Iterator for NdIndexedIter<'_, T> {
    type Item = (Vec<usize>, T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.inner.cursor.indices().to_vec();
        let value = self.inner.next()?;
        Some((indices, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Element> ExactSizeIterator for NdIndexedIter<'_, T> {}

// ============================================================================
// Axis lanes
// ============================================================================

/// Iterator over the 1-D sub-views along one axis.
///
/// Lanes come in row-major order of the remaining axes. Each lane shares the
/// parent's buffer: offset from the fixed indices, stride of the chosen axis,
/// extent of the chosen axis.
pub struct Lanes<T> {
    buf: Rc<Buffer<T>>,
    cursor: NdCursor,
    len: usize,
    stride: isize,
}

impl<T: Element> std::fmt::Debug for Lanes<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lanes")
            .field("buf", &self.buf)
            .field("cursor", &self.cursor)
            .field("len", &self.len)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<T: Element> Lanes<T> {
    pub(crate) fn new(
        buf: Rc<Buffer<T>>,
        outer_shape: &[usize],
        outer_strides: &[isize],
        offset: isize,
        len: usize,
        stride: isize,
    ) -> Self {
        Self {
            buf,
            cursor: NdCursor::new(outer_shape, outer_strides, offset),
            len,
            stride,
        }
    }

    /// Shape of the remaining axes, i.e. the index space of the lanes.
    pub fn outer_shape(&self) -> &[usize] {
        &self.cursor.shape
    }

    /// Multi-index, among the remaining axes, of the lane `next` returns.
    pub fn outer_indices(&self) -> &[usize] {
        self.cursor.indices()
    }
}

impl<T: Element> Iterator for Lanes<T> {
    type Item = ArrayRef<T>;

    fn next(&mut self) -> Option<ArrayRef<T>> {
        if self.cursor.is_exhausted() {
            return None;
        }
        let lane =
            ArrayRef::from_parts_unchecked(self.buf.clone(), self.len, self.stride, self.cursor.pos());
        self.cursor.advance();
        Some(lane)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.numel - self.cursor.index();
        (remaining, Some(remaining))
    }
}

impl<T: Element> ExactSizeIterator for Lanes<T> {}
