//! Contiguous element storage shared by views.

use std::cell::Cell;
use std::rc::Rc;

use crate::Element;
use ndref_traits::Pod;

/// Owned, contiguous storage of `T`.
///
/// Views hold a `Rc<Buffer<T>>`; the buffer lives as long as its longest
/// surviving view. Elements sit in `Cell`s, so any view may read or write a
/// single element through a shared reference. Resizing needs `&mut self`,
/// which `Rc::get_mut` only hands out while no view shares the buffer.
pub struct Buffer<T> {
    data: Box<[Cell<T>]>,
}

impl<T: std::fmt::Debug + Copy> std::fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.data.iter().map(|c| c.get()))
            .finish()
    }
}

impl<T: Element> Buffer<T> {
    /// Allocate `n` default-initialized elements.
    pub fn create(n: usize) -> Self {
        Self::create_filled(n, T::default())
    }

    /// Allocate `n` elements, each set to `value`.
    pub fn create_filled(n: usize, value: T) -> Self {
        Self {
            data: (0..n).map(|_| Cell::new(value)).collect(),
        }
    }

    /// Take ownership of existing data.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data: data.into_iter().map(Cell::new).collect(),
        }
    }

    /// Convenience: allocate and wrap in `Rc` in one step.
    pub fn shared(n: usize) -> Rc<Self> {
        Rc::new(Self::create(n))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the element at storage position `pos`.
    ///
    /// Panics if `pos` is outside the buffer.
    #[inline]
    pub fn get(&self, pos: usize) -> T {
        self.data[pos].get()
    }

    /// Write the element at storage position `pos`.
    ///
    /// Panics if `pos` is outside the buffer.
    #[inline]
    pub fn set(&self, pos: usize, value: T) {
        self.data[pos].set(value)
    }

    /// Copy `src` into consecutive positions starting at `pos`.
    pub fn write_slice(&self, pos: usize, src: &[T]) {
        for (cell, &v) in self.data[pos..pos + src.len()].iter().zip(src) {
            cell.set(v);
        }
    }

    /// Resize an unshared buffer. New elements are default-initialized.
    pub fn resize(&mut self, n: usize) {
        let mut data = std::mem::take(&mut self.data).into_vec();
        data.resize_with(n, || Cell::new(T::default()));
        self.data = data.into_boxed_slice();
    }

    /// Copy the whole buffer out in storage order.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().map(Cell::get).collect()
    }

    /// Pointer to the first element.
    ///
    /// `Cell<T>` has the same layout as `T`. Writing through the pointer is
    /// allowed (interior mutability) as long as no other access to the same
    /// elements happens concurrently.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.data.as_ptr() as *mut T
    }
}

impl<T: Pod> Buffer<T> {
    /// Raw bytes of the whole buffer in storage order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let values = self.to_vec();
        bytemuck::cast_slice::<T, u8>(&values).to_vec()
    }

    /// Rebuild a buffer from raw bytes. Returns `None` if the byte count is
    /// not a multiple of `size_of::<T>()`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let size = std::mem::size_of::<T>();
        if size == 0 || bytes.len() % size != 0 {
            return None;
        }
        let values: Vec<T> = bytes
            .chunks_exact(size)
            .map(bytemuck::pod_read_unaligned::<T>)
            .collect();
        Some(Self::from_vec(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default() {
        let b = Buffer::<i32>::create(4);
        assert_eq!(b.len(), 4);
        assert_eq!(b.to_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_create_filled() {
        let b = Buffer::create_filled(3, true);
        assert_eq!(b.to_vec(), vec![true; 3]);
    }

    #[test]
    fn test_get_set_through_shared_ref() {
        let b = Rc::new(Buffer::from_vec(vec![1.0, 2.0, 3.0]));
        let alias = Rc::clone(&b);
        alias.set(1, 20.0);
        assert_eq!(b.get(1), 20.0);
    }

    #[test]
    fn test_resize_requires_exclusive_owner() {
        let mut b = Rc::new(Buffer::from_vec(vec![1u8, 2]));
        let alias = Rc::clone(&b);
        assert!(Rc::get_mut(&mut b).is_none());
        drop(alias);
        Rc::get_mut(&mut b).unwrap().resize(4);
        assert_eq!(b.to_vec(), vec![1, 2, 0, 0]);
    }

    #[test]
    fn test_write_slice() {
        let b = Buffer::<u16>::create(5);
        b.write_slice(1, &[7, 8, 9]);
        assert_eq!(b.to_vec(), vec![0, 7, 8, 9, 0]);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let b = Buffer::from_vec(vec![1u32, 0x0102_0304]);
        let bytes = b.to_bytes();
        assert_eq!(bytes.len(), 8);
        let back = Buffer::<u32>::from_bytes(&bytes).unwrap();
        assert_eq!(back.to_vec(), vec![1, 0x0102_0304]);
        assert!(Buffer::<u32>::from_bytes(&bytes[..7]).is_none());
    }
}
