//! N-dimensional views and the structural operations over them.

use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::array_ref::ArrayRef;
use crate::buffer::Buffer;
use crate::iter::{Lanes, NdCursor, NdIndexedIter, NdIter};
use crate::shape::{compact_strides, is_compact, is_linear, linear_step, normalize_axis, numel, validate_bounds};
use crate::slice::{normalize_indices, AxisIndex, NormalizedIndex};
use crate::{Element, NdError, Pod, Result};

/// N-dimensional view `{buffer, shape, strides, offset}`.
///
/// Multi-index `I` lives at buffer position `offset + sum_k strides[k] * I[k]`.
/// Strides may be negative (reversed axes) or zero (broadcast axes). An empty
/// shape is a 0-dimensional view of exactly one element.
///
/// Views are immutable descriptors. Every structural operation returns a new
/// view; all of them except `flatten` of a non-linear layout, `to_compact`
/// and `reshape` of a non-linear layout share the source's buffer.
pub struct NdArrayRef<T> {
    buf: Rc<Buffer<T>>,
    shape: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for NdArrayRef<T> {
    fn clone(&self) -> Self {
        Self {
            buf: Rc::clone(&self.buf),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Element> std::fmt::Debug for NdArrayRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdArrayRef")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("values", &self.to_vec())
            .finish()
    }
}

/// Raw addressing of a view for external kernels.
///
/// `ptr` points at buffer position 0; element `I` lives at
/// `ptr.offset(offset + sum_k strides[k] * I[k])`. The pointer stays valid
/// while the view (or any other holder of its buffer) is alive.
#[derive(Debug, Clone)]
pub struct RawParts<T> {
    pub ptr: *mut T,
    pub offset: isize,
    pub strides: Vec<isize>,
    pub shape: Vec<usize>,
}

impl<T: Element> NdArrayRef<T> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a view over an existing buffer, validating that every
    /// addressable element is in bounds.
    pub fn new(buf: Rc<Buffer<T>>, shape: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(buf.len(), shape, strides, offset)?;
        Ok(Self::from_parts_unchecked(buf, shape, strides, offset))
    }

    /// Caller guarantees every multi-index resolves inside the buffer.
    pub(crate) fn from_parts_unchecked(
        buf: Rc<Buffer<T>>,
        shape: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            buf,
            shape: Arc::from(shape),
            strides: Arc::from(strides),
            offset,
        }
    }

    fn compact(buf: Buffer<T>, shape: &[usize]) -> Self {
        Self::from_parts_unchecked(Rc::new(buf), shape, &compact_strides(shape), 0)
    }

    /// Row-major view over owned data.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let n = numel(shape);
        if data.len() != n {
            return Err(NdError::NumelMismatch {
                expected: n,
                got: data.len(),
            });
        }
        Ok(Self::compact(Buffer::from_vec(data), shape))
    }

    /// Row-major array with `f(index)` at each multi-index.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let n = numel(shape);
        let mut data = Vec::with_capacity(n);
        let mut cursor = NdCursor::new(shape, &compact_strides(shape), 0);
        while !cursor.is_exhausted() {
            data.push(f(cursor.indices()));
            cursor.advance();
        }
        Self::compact(Buffer::from_vec(data), shape)
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::compact(Buffer::create(numel(shape)), shape)
    }

    pub fn filled(shape: &[usize], value: T) -> Self {
        Self::compact(Buffer::create_filled(numel(shape), value), shape)
    }

    /// 0-dimensional view of one value.
    pub fn scalar(value: T) -> Self {
        Self::compact(Buffer::create_filled(1, value), &[])
    }

    /// One value repeated over `shape`: one-element buffer, all-zero strides.
    pub fn broadcast_scalar(value: T, shape: &[usize]) -> Self {
        Self::from_parts_unchecked(
            Rc::new(Buffer::create_filled(1, value)),
            shape,
            &vec![0; shape.len()],
            0,
        )
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn buffer(&self) -> &Rc<Buffer<T>> {
        &self.buf
    }

    pub fn is_linear(&self) -> bool {
        is_linear(&self.shape, &self.strides)
    }

    pub fn is_compact(&self) -> bool {
        is_compact(&self.shape, &self.strides)
    }

    /// Whether every stride is zero, i.e. all positions alias one cell.
    pub fn is_broadcast(&self) -> bool {
        self.numel() > 1 && self.strides.iter().all(|&s| s == 0)
    }

    pub fn shares_buffer(&self, other: &NdArrayRef<T>) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }

    pub fn raw_parts(&self) -> RawParts<T> {
        RawParts {
            ptr: self.buf.as_ptr(),
            offset: self.offset,
            strides: self.strides.to_vec(),
            shape: self.shape.to_vec(),
        }
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    #[inline]
    fn pos(&self, indices: &[usize]) -> usize {
        let mut pos = self.offset;
        for (k, &i) in indices.iter().enumerate() {
            pos += i as isize * self.strides[k];
        }
        pos as usize
    }

    /// Read one element. Panics on a wrong index count or out-of-range index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.check_indices(indices);
        self.buf.get(self.pos(indices))
    }

    /// Write one element. Panics on a wrong index count, an out-of-range
    /// index, or a view with a broadcast axis.
    pub fn set(&self, indices: &[usize], value: T) {
        self.check_writable();
        self.check_indices(indices);
        self.buf.set(self.pos(indices), value)
    }

    pub fn try_get(&self, indices: &[usize]) -> Result<T> {
        if indices.len() != self.ndim() {
            return Err(NdError::RankMismatch(indices.len(), self.ndim()));
        }
        for (axis, (&i, &dim)) in indices.iter().zip(self.shape.iter()).enumerate() {
            if i >= dim {
                return Err(NdError::IndexOutOfRange {
                    axis,
                    index: i as isize,
                    dim,
                });
            }
        }
        Ok(self.buf.get(self.pos(indices)))
    }

    /// Several logical positions of a zero-stride axis share one cell, so
    /// such a view is read-only.
    fn check_writable(&self) {
        let aliased = self
            .shape
            .iter()
            .zip(self.strides.iter())
            .any(|(&dim, &stride)| stride == 0 && dim > 1);
        assert!(!aliased, "cannot write through a broadcast view");
    }

    fn check_indices(&self, indices: &[usize]) {
        assert_eq!(indices.len(), self.ndim(), "wrong number of indices");
        for (&i, &dim) in indices.iter().zip(self.shape.iter()) {
            assert!(i < dim, "index {} out of bounds for dim {}", i, dim);
        }
    }

    pub fn iter(&self) -> NdIter<'_, T> {
        NdIter::new(&self.buf, &self.shape, &self.strides, self.offset)
    }

    pub fn indexed_iter(&self) -> NdIndexedIter<'_, T> {
        NdIndexedIter::new(self.iter())
    }

    /// Cursor over this view's buffer positions in row-major order.
    pub fn cursor(&self) -> NdCursor {
        NdCursor::new(&self.shape, &self.strides, self.offset)
    }

    /// Copy out in row-major logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Fresh compact copy with the same shape.
    pub fn to_compact(&self) -> NdArrayRef<T> {
        Self::compact(Buffer::from_vec(self.to_vec()), &self.shape)
    }

    /// Fresh compact array of `f` applied to every element.
    pub fn map<U: Element, F: FnMut(T) -> U>(&self, f: F) -> NdArrayRef<U> {
        NdArrayRef::compact(Buffer::from_vec(self.iter().map(f).collect()), &self.shape)
    }

    // ------------------------------------------------------------------
    // Structural operations
    // ------------------------------------------------------------------

    /// Sub-view selected by a mixed index list. No copy.
    ///
    /// Integer entries drop their axis and move the offset; slice entries keep
    /// the axis with extent `numel(slice)` and stride `strides[axis] * step`.
    /// Missing trailing entries select the whole axis.
    pub fn slice(&self, indices: &[AxisIndex]) -> Result<NdArrayRef<T>> {
        let normalized = normalize_indices(indices, &self.shape)?;
        let mut offset = self.offset;
        let mut shape = Vec::with_capacity(normalized.len());
        let mut strides = Vec::with_capacity(normalized.len());
        for (axis, idx) in normalized.iter().enumerate() {
            let stride = self.strides[axis];
            match *idx {
                NormalizedIndex::At(i) => offset += stride * i as isize,
                NormalizedIndex::Slice(s) => {
                    offset += stride * s.start as isize;
                    shape.push(s.numel());
                    strides.push(s.stride(stride));
                }
            }
        }
        Ok(Self::from_parts_unchecked(
            Rc::clone(&self.buf),
            &shape,
            &strides,
            offset,
        ))
    }

    /// Linear view of all elements in row-major order.
    ///
    /// Linear layouts share the buffer. Fully broadcast views become a
    /// broadcast `ArrayRef` over a fresh one-element buffer. Anything else is
    /// materialized into a fresh compact buffer.
    pub fn flatten(&self) -> ArrayRef<T> {
        let n = self.numel();
        match linear_step(&self.shape, &self.strides) {
            Some(0) if n > 1 => ArrayRef::broadcast(self.buf.get(self.offset as usize), n),
            Some(step) => ArrayRef::from_parts_unchecked(Rc::clone(&self.buf), n, step, self.offset),
            None => {
                debug!(
                    shape = ?self.shape,
                    strides = ?self.strides,
                    numel = n,
                    "flatten: materializing non-linear view"
                );
                ArrayRef::from_vec(self.to_vec())
            }
        }
    }

    /// Same elements under a new shape. Copies only when the layout is not
    /// linear.
    pub fn reshape(&self, shape: &[usize]) -> Result<NdArrayRef<T>> {
        let n = numel(shape);
        if n != self.numel() {
            return Err(NdError::NumelMismatch {
                expected: self.numel(),
                got: n,
            });
        }
        self.flatten().unflatten(shape)
    }

    /// Broadcast to `target` numpy-style: shapes are right-aligned, extent-1
    /// axes and new leading axes get stride 0. No copy.
    pub fn expand(&self, target: &[usize]) -> Result<NdArrayRef<T>> {
        let rank = self.ndim();
        let not_broadcastable = || NdError::NotBroadcastable(self.shape.to_vec(), target.to_vec());
        if target.len() < rank {
            return Err(not_broadcastable());
        }
        let lead = target.len() - rank;
        let mut strides = vec![0isize; target.len()];
        for k in 0..rank {
            let (dim, want) = (self.shape[k], target[lead + k]);
            if dim == want {
                strides[lead + k] = self.strides[k];
            } else if dim != 1 {
                return Err(not_broadcastable());
            }
        }
        Ok(Self::from_parts_unchecked(
            Rc::clone(&self.buf),
            target,
            &strides,
            self.offset,
        ))
    }

    /// Reorder axes: axis `k` of the result is axis `perm[k]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<NdArrayRef<T>> {
        let rank = self.ndim();
        if perm.len() != rank {
            return Err(NdError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(NdError::InvalidAxis {
                    axis: p as isize,
                    rank,
                });
            }
            seen[p] = true;
        }
        let shape: Vec<usize> = perm.iter().map(|&p| self.shape[p]).collect();
        let strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(Self::from_parts_unchecked(
            Rc::clone(&self.buf),
            &shape,
            &strides,
            self.offset,
        ))
    }

    /// Reverse the axis order.
    pub fn transpose(&self) -> NdArrayRef<T> {
        let shape: Vec<usize> = self.shape.iter().rev().copied().collect();
        let strides: Vec<isize> = self.strides.iter().rev().copied().collect();
        Self::from_parts_unchecked(Rc::clone(&self.buf), &shape, &strides, self.offset)
    }

    /// 1-D sub-views along `axis`, one per combination of the other axes.
    pub fn lanes(&self, axis: isize) -> Result<Lanes<T>> {
        let axis = normalize_axis(axis, self.ndim())?;
        let mut outer_shape = self.shape.to_vec();
        let mut outer_strides = self.strides.to_vec();
        let len = outer_shape.remove(axis);
        let stride = outer_strides.remove(axis);
        Ok(Lanes::new(
            Rc::clone(&self.buf),
            &outer_shape,
            &outer_strides,
            self.offset,
            len,
            stride,
        ))
    }

    // ------------------------------------------------------------------
    // In-place writes
    // ------------------------------------------------------------------

    /// Overwrite every element of this view with the matching element of
    /// `src`. Shapes must be equal.
    ///
    /// Panics if this view has a broadcast axis.
    pub fn copy_from(&self, src: &NdArrayRef<T>) -> Result<()> {
        if self.shape != src.shape {
            return Err(NdError::ShapeMismatch(self.shape.to_vec(), src.shape.to_vec()));
        }
        self.check_writable();
        if self.shares_buffer(src) {
            // Source and destination may overlap.
            let values = src.to_vec();
            let mut dst = self.cursor();
            for v in values {
                self.buf.set(dst.pos() as usize, v);
                dst.advance();
            }
            return Ok(());
        }
        let mut dst = self.cursor();
        let mut from = src.cursor();
        while !dst.is_exhausted() {
            self.buf.set(dst.pos() as usize, src.buf.get(from.pos() as usize));
            dst.advance();
            from.advance();
        }
        Ok(())
    }

    /// Set every element of this view to `value`. Panics if this view has a
    /// broadcast axis.
    pub fn fill(&self, value: T) {
        self.check_writable();
        let mut c = self.cursor();
        while !c.is_exhausted() {
            self.buf.set(c.pos() as usize, value);
            c.advance();
        }
    }
}

impl<T: Pod> NdArrayRef<T> {
    /// Row-major raw bytes of the view's elements.
    pub fn to_bytes(&self) -> Vec<u8> {
        let values = self.to_vec();
        bytemuck::cast_slice::<T, u8>(&values).to_vec()
    }

    /// Compact view over elements decoded from raw bytes.
    pub fn from_bytes(bytes: &[u8], shape: &[usize]) -> Result<Self> {
        let expected = numel(shape) * std::mem::size_of::<T>();
        if bytes.len() != expected {
            return Err(NdError::NumelMismatch {
                expected,
                got: bytes.len(),
            });
        }
        let buf = Buffer::from_bytes(bytes).ok_or(NdError::NumelMismatch {
            expected,
            got: bytes.len(),
        })?;
        Ok(Self::compact(buf, shape))
    }
}

impl<T: Element> From<ArrayRef<T>> for NdArrayRef<T> {
    fn from(a: ArrayRef<T>) -> Self {
        Self::from_parts_unchecked(Rc::clone(a.buffer()), &[a.numel()], &[a.stride()], a.offset())
    }
}
