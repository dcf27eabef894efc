//! Visiting elements and axis lanes.
//!
//! Each callback shape has its own entry point, so the compiler picks the
//! traversal from the function name and a closure with the wrong arity is a
//! type error:
//!
//! | callback                     | N-D view                      | linear view               |
//! |------------------------------|-------------------------------|---------------------------|
//! | `f(value)`                   | [`for_each`]                  | [`for_each_flat`]         |
//! | `f(linear_index, value)`     | [`for_each_indexed`]          | [`for_each_flat_indexed`] |
//! | `f(&multi_index, value)`     | [`for_each_multi_indexed`]    | n/a                       |
//!
//! Axis-wise traversal hands the callback a 1-D [`ArrayRef`] per lane, plus
//! optionally the lane's index among the other axes.

use crate::{ArrayRef, Element, NdArrayRef, Result};

/// Visit every element in row-major order.
pub fn for_each<T: Element, F>(view: &NdArrayRef<T>, mut f: F)
where
    F: FnMut(T),
{
    for value in view.iter() {
        f(value);
    }
}

/// Visit every element with its row-major linear index.
pub fn for_each_indexed<T: Element, F>(view: &NdArrayRef<T>, mut f: F)
where
    F: FnMut(usize, T),
{
    for (i, value) in view.iter().enumerate() {
        f(i, value);
    }
}

/// Visit every element with its multi-index.
pub fn for_each_multi_indexed<T: Element, F>(view: &NdArrayRef<T>, mut f: F)
where
    F: FnMut(&[usize], T),
{
    let buf = view.buffer();
    let mut cursor = view.cursor();
    while !cursor.is_exhausted() {
        f(cursor.indices(), buf.get(cursor.pos() as usize));
        cursor.advance();
    }
}

pub fn for_each_flat<T: Element, F>(view: &ArrayRef<T>, mut f: F)
where
    F: FnMut(T),
{
    for value in view.iter() {
        f(value);
    }
}

pub fn for_each_flat_indexed<T: Element, F>(view: &ArrayRef<T>, mut f: F)
where
    F: FnMut(usize, T),
{
    for (i, value) in view.iter().enumerate() {
        f(i, value);
    }
}

/// Call `f` with every 1-D lane along `axis`.
///
/// Lanes come in row-major order of the other axes and share the view's
/// buffer. Negative `axis` counts from the end.
pub fn for_each_axis<T: Element, F>(view: &NdArrayRef<T>, axis: isize, mut f: F) -> Result<()>
where
    F: FnMut(ArrayRef<T>),
{
    for lane in view.lanes(axis)? {
        f(lane);
    }
    Ok(())
}

/// Like [`for_each_axis`], passing the lane's linear index among the other
/// axes.
pub fn for_each_axis_indexed<T: Element, F>(
    view: &NdArrayRef<T>,
    axis: isize,
    mut f: F,
) -> Result<()>
where
    F: FnMut(usize, ArrayRef<T>),
{
    for (i, lane) in view.lanes(axis)?.enumerate() {
        f(i, lane);
    }
    Ok(())
}

/// Like [`for_each_axis`], passing the lane's multi-index among the other
/// axes.
pub fn for_each_axis_multi_indexed<T: Element, F>(
    view: &NdArrayRef<T>,
    axis: isize,
    mut f: F,
) -> Result<()>
where
    F: FnMut(&[usize], ArrayRef<T>),
{
    let mut lanes = view.lanes(axis)?;
    let mut index = Vec::with_capacity(view.ndim().saturating_sub(1));
    loop {
        index.clear();
        index.extend_from_slice(lanes.outer_indices());
        match lanes.next() {
            Some(lane) => f(&index, lane),
            None => break,
        }
    }
    Ok(())
}
