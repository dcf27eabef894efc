//! Elementwise maps producing fresh arrays.
//!
//! A broadcast operand (every stride zero) is read once instead of per
//! element. A unary map over a broadcast returns a broadcast of the single
//! result, so mapping a huge expanded scalar costs one call.

use tracing::trace;

use crate::{broadcast_shape, ArrayRef, Element, NdArrayRef, NdError, Result};

/// The single value a broadcast view repeats.
#[inline]
fn broadcast_value<T: Element>(view: &NdArrayRef<T>) -> T {
    view.buffer().get(view.offset() as usize)
}

/// `f` applied to every element; the result has the input's shape.
pub fn apply<T, U, F>(view: &NdArrayRef<T>, mut f: F) -> NdArrayRef<U>
where
    T: Element,
    U: Element,
    F: FnMut(T) -> U,
{
    if view.is_broadcast() {
        trace!(shape = ?view.shape(), "apply: broadcast input, evaluating once");
        return NdArrayRef::broadcast_scalar(f(broadcast_value(view)), view.shape());
    }
    view.map(f)
}

/// `f` applied pairwise.
///
/// Shapes must match unless one operand is a broadcast, in which case its
/// value is captured and the result takes the other operand's shape.
pub fn apply2<T, U, V, F>(a: &NdArrayRef<T>, b: &NdArrayRef<U>, mut f: F) -> Result<NdArrayRef<V>>
where
    T: Element,
    U: Element,
    V: Element,
    F: FnMut(T, U) -> V,
{
    match (a.is_broadcast(), b.is_broadcast()) {
        (true, true) => {
            trace!(shape = ?a.shape(), "apply2: both inputs broadcast");
            Ok(NdArrayRef::broadcast_scalar(
                f(broadcast_value(a), broadcast_value(b)),
                a.shape(),
            ))
        }
        (true, false) => {
            trace!(shape = ?a.shape(), "apply2: lhs broadcast");
            let x = broadcast_value(a);
            Ok(b.map(|y| f(x, y)))
        }
        (false, true) => {
            trace!(shape = ?b.shape(), "apply2: rhs broadcast");
            let y = broadcast_value(b);
            Ok(a.map(|x| f(x, y)))
        }
        (false, false) => {
            if a.shape() != b.shape() {
                return Err(NdError::ShapeMismatch(a.shape().to_vec(), b.shape().to_vec()));
            }
            let data: Vec<V> = a.iter().zip(b.iter()).map(|(x, y)| f(x, y)).collect();
            ArrayRef::from_vec(data).unflatten(a.shape())
        }
    }
}

/// `f` applied pairwise after numpy-style broadcasting of both shapes.
pub fn apply2_broadcast<T, U, V, F>(
    a: &NdArrayRef<T>,
    b: &NdArrayRef<U>,
    f: F,
) -> Result<NdArrayRef<V>>
where
    T: Element,
    U: Element,
    V: Element,
    F: FnMut(T, U) -> V,
{
    let shape = broadcast_shape(a.shape(), b.shape())?;
    apply2(&a.expand(&shape)?, &b.expand(&shape)?, f)
}

/// `f` applied to every element of a linear view.
pub fn apply_flat<T, U, F>(view: &ArrayRef<T>, mut f: F) -> ArrayRef<U>
where
    T: Element,
    U: Element,
    F: FnMut(T) -> U,
{
    if view.is_broadcast() && !view.is_empty() {
        trace!(numel = view.numel(), "apply_flat: broadcast input, evaluating once");
        return ArrayRef::broadcast(f(view.get(0)), view.numel());
    }
    view.map(f)
}

/// `f` applied pairwise over two linear views of equal length, or against a
/// broadcast operand of any length.
pub fn apply2_flat<T, U, V, F>(a: &ArrayRef<T>, b: &ArrayRef<U>, mut f: F) -> Result<ArrayRef<V>>
where
    T: Element,
    U: Element,
    V: Element,
    F: FnMut(T, U) -> V,
{
    let a_bc = a.is_broadcast() && !a.is_empty();
    let b_bc = b.is_broadcast() && !b.is_empty();
    match (a_bc, b_bc) {
        (true, true) => Ok(ArrayRef::broadcast(f(a.get(0), b.get(0)), a.numel())),
        (true, false) => {
            let x = a.get(0);
            Ok(b.map(|y| f(x, y)))
        }
        (false, true) => {
            let y = b.get(0);
            Ok(a.map(|x| f(x, y)))
        }
        (false, false) => {
            if a.numel() != b.numel() {
                return Err(NdError::ShapeMismatch(vec![a.numel()], vec![b.numel()]));
            }
            Ok(ArrayRef::from_vec(
                a.iter().zip(b.iter()).map(|(x, y)| f(x, y)).collect(),
            ))
        }
    }
}
