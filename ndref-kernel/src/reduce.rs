//! Folds over whole views or along one axis.

use crate::{normalize_axis, ArrayRef, Element, NdArrayRef, Result};

/// Fold every element, in row-major order, into `init`.
pub fn fold<T, A, F>(view: &NdArrayRef<T>, init: A, mut f: F) -> A
where
    T: Element,
    F: FnMut(A, T) -> A,
{
    view.iter().fold(init, |acc, x| f(acc, x))
}

/// Reduce with `f(acc, x)` starting from `init`.
///
/// With `axis == None` every element is folded and the result is
/// 0-dimensional (`keep_dims` has no effect). With an axis, each lane along
/// that axis is folded independently; the result has the input's shape with
/// that axis set to 1 (`keep_dims`) or removed.
pub fn reduce<T, A, F>(
    view: &NdArrayRef<T>,
    axis: Option<isize>,
    init: A,
    keep_dims: bool,
    mut f: F,
) -> Result<NdArrayRef<A>>
where
    T: Element,
    A: Element,
    F: FnMut(A, T) -> A,
{
    let Some(axis) = axis else {
        return Ok(NdArrayRef::scalar(fold(view, init, f)));
    };
    let axis = normalize_axis(axis, view.ndim())?;
    let mut out_shape = view.shape().to_vec();
    if keep_dims {
        out_shape[axis] = 1;
    } else {
        out_shape.remove(axis);
    }
    let data: Vec<A> = view
        .lanes(axis as isize)?
        .map(|lane| lane.iter().fold(init, |acc, x| f(acc, x)))
        .collect();
    ArrayRef::from_vec(data).unflatten(&out_shape)
}

/// [`reduce`] along one axis, dropping it.
pub fn reduce_axis<T, A, F>(view: &NdArrayRef<T>, axis: isize, init: A, f: F) -> Result<NdArrayRef<A>>
where
    T: Element,
    A: Element,
    F: FnMut(A, T) -> A,
{
    reduce(view, Some(axis), init, false, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NdError;

    fn sample() -> NdArrayRef<i64> {
        NdArrayRef::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap()
    }

    #[test]
    fn test_reduce_all_is_scalar() {
        let r = reduce(&sample(), None, 0, true, |acc, x| acc + x).unwrap();
        assert_eq!(r.ndim(), 0);
        assert_eq!(r.get(&[]), 21);
    }

    #[test]
    fn test_reduce_axis_keep_dims() {
        let a = sample();
        let kept = reduce(&a, Some(0), 0, true, |acc, x| acc + x).unwrap();
        assert_eq!(kept.shape(), &[1, 3]);
        assert_eq!(kept.to_vec(), vec![5, 7, 9]);
        let dropped = reduce(&a, Some(-1), 0, false, |acc, x| acc + x).unwrap();
        assert_eq!(dropped.shape(), &[2]);
        assert_eq!(dropped.to_vec(), vec![6, 15]);
    }

    #[test]
    fn test_reduce_fold_order() {
        let a = NdArrayRef::from_vec(vec![1, 2, 3], &[3]).unwrap();
        let r = reduce(&a, Some(0), 0, false, |acc, x| acc * 10 + x).unwrap();
        assert_eq!(r.get(&[]), 123);
    }

    #[test]
    fn test_reduce_changes_type() {
        let a = NdArrayRef::from_vec(vec![true, false, true, true], &[2, 2]).unwrap();
        let counts = reduce_axis(&a, 1, 0u32, |acc, b| acc + b as u32).unwrap();
        assert_eq!(counts.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_reduce_invalid_axis() {
        assert_eq!(
            reduce(&sample(), Some(2), 0, false, |acc, x| acc + x).unwrap_err(),
            NdError::InvalidAxis { axis: 2, rank: 2 }
        );
    }

    #[test]
    fn test_fold() {
        let a = sample().transpose();
        let seq = fold(&a, Vec::new(), |mut acc, x| {
            acc.push(x);
            acc
        });
        assert_eq!(seq, vec![1, 4, 2, 5, 3, 6]);
    }
}
