//! Shape and stride algebra.
//!
//! Pure functions over shape and stride vectors. Nothing here touches element
//! data. Shape and axis errors are always reported, never silently corrected.

use crate::{NdError, Result};

/// Number of elements addressed by `shape`. The empty shape is a scalar.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major strides of a freshly allocated contiguous buffer.
pub fn compact_strides(shape: &[usize]) -> Vec<isize> {
    linear_strides(1, shape)
}

/// Strides that walk `shape` in row-major order with a global step of `step`.
///
/// `linear_strides(1, shape)` is [`compact_strides`]. A linear view with
/// stride `s` unflattens to `linear_strides(s, shape)` without copying.
pub fn linear_strides(step: isize, shape: &[usize]) -> Vec<isize> {
    let rank = shape.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![step; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1] as isize;
    }
    strides
}

/// Single step that reaches every element of a strided layout in row-major
/// order, or `None` if no such step exists.
///
/// Axes of extent 1 never contribute to an address and are skipped; the
/// remaining axes must satisfy `strides[k] == strides[k'] * shape[k']` for
/// each consecutive pair. Views with at most one element report step 1.
pub fn linear_step(shape: &[usize], strides: &[isize]) -> Option<isize> {
    debug_assert_eq!(shape.len(), strides.len());
    if numel(shape) <= 1 {
        return Some(1);
    }
    let mut step = None;
    let mut inner: Option<(isize, usize)> = None;
    for k in (0..shape.len()).rev() {
        if shape[k] == 1 {
            continue;
        }
        match inner {
            None => step = Some(strides[k]),
            Some((s, d)) => {
                if strides[k] != s * d as isize {
                    return None;
                }
            }
        }
        inner = Some((strides[k], shape[k]));
    }
    step
}

/// Whether the layout is reachable as one linear view without copying.
///
/// 0- and 1-dimensional layouts are trivially linear.
pub fn is_linear(shape: &[usize], strides: &[isize]) -> bool {
    shape.len() <= 1 || linear_step(shape, strides).is_some()
}

/// Whether the layout is row-major contiguous.
pub fn is_compact(shape: &[usize], strides: &[isize]) -> bool {
    linear_step(shape, strides) == Some(1)
}

/// Resolve a possibly negative axis against `rank`.
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize> {
    let r = rank as isize;
    if axis < -r || axis >= r {
        return Err(NdError::InvalidAxis { axis, rank });
    }
    Ok(if axis < 0 { (axis + r) as usize } else { axis as usize })
}

/// Numpy-style broadcast of two shapes, aligned from the right.
///
/// Dimensions are compatible if equal or if either is 1; the result takes
/// the larger one.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut result = vec![0usize; rank];

    for i in 0..rank {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        result[rank - 1 - i] = if a_dim == b_dim || b_dim == 1 {
            a_dim
        } else if a_dim == 1 {
            b_dim
        } else {
            return Err(NdError::NotBroadcastable(a.to_vec(), b.to_vec()));
        };
    }

    Ok(result)
}

/// Validate a matrix product and return `(M, N, K)`.
///
/// Both operands must be rank 2 and agree on the inner dimension.
pub fn deduce_matmul_shape(lhs: &[usize], rhs: &[usize]) -> Result<(usize, usize, usize)> {
    if lhs.len() != 2 {
        return Err(NdError::RankMismatch(lhs.len(), 2));
    }
    if rhs.len() != 2 {
        return Err(NdError::RankMismatch(rhs.len(), 2));
    }
    if lhs[1] != rhs[0] {
        return Err(NdError::InnerDimMismatch {
            lhs: lhs[1],
            rhs: rhs[0],
        });
    }
    Ok((lhs[0], rhs[1], lhs[1]))
}

/// Validate shapes for concatenation along `axis` and return the output
/// shape together with the resolved axis.
///
/// All shapes must share one rank and agree on every axis except `axis`.
pub fn deduce_concatenate_shape(shapes: &[&[usize]], axis: isize) -> Result<(Vec<usize>, usize)> {
    let first = shapes.first().ok_or(NdError::EmptyInput)?;
    let rank = first.len();
    let axis = normalize_axis(axis, rank)?;

    let mut out = first.to_vec();
    for shape in &shapes[1..] {
        if shape.len() != rank {
            return Err(NdError::RankMismatch(rank, shape.len()));
        }
        for k in 0..rank {
            if k != axis && shape[k] != first[k] {
                return Err(NdError::ShapeMismatch(first.to_vec(), shape.to_vec()));
            }
        }
        out[axis] += shape[axis];
    }
    Ok((out, axis))
}

/// Row-major linear index of a multi-index.
pub fn flatten_index(index: &[usize], shape: &[usize]) -> usize {
    debug_assert_eq!(index.len(), shape.len());
    index
        .iter()
        .zip(shape)
        .fold(0usize, |acc, (&i, &d)| acc * d + i)
}

/// Multi-index of a row-major linear index.
pub fn unflatten_index(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0usize; shape.len()];
    for k in (0..shape.len()).rev() {
        if shape[k] == 0 {
            continue;
        }
        index[k] = linear % shape[k];
        linear /= shape[k];
    }
    index
}

/// Validate that every addressable element stays within `[0, len)`.
pub(crate) fn validate_bounds(
    len: usize,
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> Result<()> {
    if shape.len() != strides.len() {
        return Err(NdError::StrideLengthMismatch);
    }
    // Empty array - no access needed
    if shape.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in shape.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(NdError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(NdError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(NdError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 || max_offset as usize >= len {
        return Err(NdError::OffsetOverflow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[]), 1);
        assert_eq!(numel(&[2, 3, 4]), 24);
        assert_eq!(numel(&[2, 0]), 0);
    }

    #[test]
    fn test_compact_strides() {
        assert_eq!(compact_strides(&[]), Vec::<isize>::new());
        assert_eq!(compact_strides(&[5]), vec![1]);
        assert_eq!(compact_strides(&[3, 4]), vec![4, 1]);
        assert_eq!(compact_strides(&[2, 3, 4]), vec![12, 4, 1]);
    }

    #[test]
    fn test_linear_strides() {
        assert_eq!(linear_strides(2, &[2, 3]), vec![6, 2]);
        assert_eq!(linear_strides(-1, &[2, 3]), vec![-3, -1]);
    }

    #[test]
    fn test_linear_step() {
        assert_eq!(linear_step(&[2, 3], &[3, 1]), Some(1));
        assert_eq!(linear_step(&[2, 3], &[6, 2]), Some(2));
        assert_eq!(linear_step(&[2, 3], &[-3, -1]), Some(-1));
        // transposed
        assert_eq!(linear_step(&[3, 2], &[1, 3]), None);
        // size-1 axes do not matter
        assert_eq!(linear_step(&[3, 1], &[1, 7]), Some(1));
        assert_eq!(linear_step(&[1, 3], &[100, 1]), Some(1));
        // fully broadcast
        assert_eq!(linear_step(&[2, 3], &[0, 0]), Some(0));
        // row broadcast is not linear
        assert_eq!(linear_step(&[2, 3], &[0, 1]), None);
    }

    #[test]
    fn test_is_linear_and_compact() {
        assert!(is_linear(&[], &[]));
        assert!(is_linear(&[7], &[-3]));
        assert!(is_linear(&[2, 3], &[6, 2]));
        assert!(!is_compact(&[2, 3], &[6, 2]));
        assert!(is_compact(&[2, 3], &[3, 1]));
        assert!(is_compact(&[], &[]));
        assert!(!is_linear(&[2, 3], &[1, 2]));
    }

    #[test]
    fn test_normalize_axis() {
        assert_eq!(normalize_axis(0, 3).unwrap(), 0);
        assert_eq!(normalize_axis(-1, 3).unwrap(), 2);
        assert_eq!(normalize_axis(-3, 3).unwrap(), 0);
        assert_eq!(
            normalize_axis(3, 3),
            Err(NdError::InvalidAxis { axis: 3, rank: 3 })
        );
        assert!(normalize_axis(-4, 3).is_err());
        assert!(normalize_axis(0, 0).is_err());
    }

    #[test]
    fn test_broadcast_shape() {
        assert_eq!(broadcast_shape(&[4, 3], &[3]).unwrap(), vec![4, 3]);
        assert_eq!(broadcast_shape(&[4, 1], &[1, 5]).unwrap(), vec![4, 5]);
        assert_eq!(broadcast_shape(&[], &[2, 2]).unwrap(), vec![2, 2]);
        assert_eq!(
            broadcast_shape(&[2, 3], &[3, 2]),
            Err(NdError::NotBroadcastable(vec![2, 3], vec![3, 2]))
        );
    }

    #[test]
    fn test_deduce_matmul_shape() {
        assert_eq!(deduce_matmul_shape(&[2, 3], &[3, 5]).unwrap(), (2, 5, 3));
        assert_eq!(
            deduce_matmul_shape(&[2, 3], &[4, 5]),
            Err(NdError::InnerDimMismatch { lhs: 3, rhs: 4 })
        );
        assert_eq!(
            deduce_matmul_shape(&[2, 3, 1], &[3, 5]),
            Err(NdError::RankMismatch(3, 2))
        );
    }

    #[test]
    fn test_deduce_concatenate_shape() {
        let a: &[usize] = &[2, 2];
        let b: &[usize] = &[2, 3];
        assert_eq!(
            deduce_concatenate_shape(&[a, b], 1).unwrap(),
            (vec![2, 5], 1)
        );
        assert_eq!(
            deduce_concatenate_shape(&[a, b], -1).unwrap(),
            (vec![2, 5], 1)
        );
        assert_eq!(
            deduce_concatenate_shape(&[a, b], 0),
            Err(NdError::ShapeMismatch(vec![2, 2], vec![2, 3]))
        );
        let c: &[usize] = &[2];
        assert_eq!(
            deduce_concatenate_shape(&[a, c], 0),
            Err(NdError::RankMismatch(2, 1))
        );
        assert_eq!(deduce_concatenate_shape(&[], 0), Err(NdError::EmptyInput));
    }

    #[test]
    fn test_flatten_unflatten_index() {
        let shape = [2, 3, 4];
        for linear in 0..24 {
            let idx = unflatten_index(linear, &shape);
            assert_eq!(flatten_index(&idx, &shape), linear);
        }
        assert_eq!(unflatten_index(23, &shape), vec![1, 2, 3]);
        assert_eq!(flatten_index(&[], &[]), 0);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 0).is_ok());
        assert!(validate_bounds(5, &[2, 3], &[3, 1], 0).is_err());
        assert!(validate_bounds(6, &[6], &[-1], 5).is_ok());
        assert!(validate_bounds(6, &[6], &[-1], 4).is_err());
        assert!(validate_bounds(0, &[0, 3], &[3, 1], 0).is_ok());
        assert_eq!(
            validate_bounds(6, &[2, 3], &[1], 0),
            Err(NdError::StrideLengthMismatch)
        );
    }
}
