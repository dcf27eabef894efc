//! Elementwise arithmetic, comparisons and reductions built on the dispatch
//! layer.

use std::ops::{Add, Mul, Neg, Sub};

use num_traits::Zero;

use crate::apply::{apply, apply2};
use crate::reduce::{fold, reduce};
use crate::{Element, NdArrayRef, Numeric, Result};

/// Element-wise addition.
pub fn add<T: Element + Add<Output = T>>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>> {
    apply2(a, b, |x, y| x + y)
}

/// Element-wise subtraction.
pub fn sub<T: Element + Sub<Output = T>>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>> {
    apply2(a, b, |x, y| x - y)
}

/// Element-wise multiplication.
pub fn mul<T: Element + Mul<Output = T>>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>> {
    apply2(a, b, |x, y| x * y)
}

/// Element-wise division. Ring elements without a division stop at
/// [`mul`].
pub fn div<T: Numeric>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>> {
    apply2(a, b, |x, y| x / y)
}

pub fn neg<T: Element + Neg<Output = T>>(a: &NdArrayRef<T>) -> NdArrayRef<T> {
    apply(a, |x| -x)
}

pub fn equal<T: Element>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<bool>> {
    apply2(a, b, |x, y| x == y)
}

pub fn less<T: Numeric>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<bool>> {
    apply2(a, b, |x, y| x < y)
}

pub fn and(a: &NdArrayRef<bool>, b: &NdArrayRef<bool>) -> Result<NdArrayRef<bool>> {
    apply2(a, b, |x, y| x & y)
}

pub fn xor(a: &NdArrayRef<bool>, b: &NdArrayRef<bool>) -> Result<NdArrayRef<bool>> {
    apply2(a, b, |x, y| x ^ y)
}

/// Sum of all elements.
pub fn sum<T: Element + Zero>(a: &NdArrayRef<T>) -> T {
    fold(a, T::zero(), |acc, x| acc + x)
}

/// Sum along one axis.
pub fn sum_axis<T: Element + Zero>(a: &NdArrayRef<T>, axis: isize, keep_dims: bool) -> Result<NdArrayRef<T>> {
    reduce(a, Some(axis), T::zero(), keep_dims, |acc, x| acc + x)
}

/// Sum of element-wise products of two equal-shape views.
pub fn dot<T: Element + Zero + Mul<Output = T>>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<T> {
    Ok(sum(&mul(a, b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn f64s(data: &[f64], shape: &[usize]) -> NdArrayRef<f64> {
        NdArrayRef::from_vec(data.to_vec(), shape).unwrap()
    }

    #[test]
    fn test_arith() {
        let a = f64s(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let b = f64s(&[0.5, 0.5, 2.0, 2.0], &[2, 2]);
        assert_eq!(add(&a, &b).unwrap().to_vec(), vec![1.5, 2.5, 5.0, 6.0]);
        assert_eq!(sub(&a, &b).unwrap().to_vec(), vec![0.5, 1.5, 1.0, 2.0]);
        assert_eq!(mul(&a, &b).unwrap().to_vec(), vec![0.5, 1.0, 6.0, 8.0]);
        assert_eq!(div(&a, &b).unwrap().to_vec(), vec![2.0, 4.0, 1.5, 2.0]);
        assert_eq!(neg(&a).to_vec(), vec![-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_add_transposed() {
        let a = f64s(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let b = f64s(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0], &[3, 2]);
        let c = add(&a, &b.transpose()).unwrap();
        assert_eq!(c.to_vec(), vec![11.0, 32.0, 53.0, 24.0, 45.0, 66.0]);
    }

    #[test]
    fn test_comparisons_and_logic() {
        let a = NdArrayRef::from_vec(vec![1, 5, 3], &[3]).unwrap();
        let b = NdArrayRef::from_vec(vec![2, 5, 1], &[3]).unwrap();
        let lt = less(&a, &b).unwrap();
        let eq = equal(&a, &b).unwrap();
        assert_eq!(lt.to_vec(), vec![true, false, false]);
        assert_eq!(eq.to_vec(), vec![false, true, false]);
        assert_eq!(and(&lt, &eq).unwrap().to_vec(), vec![false; 3]);
        assert_eq!(xor(&lt, &eq).unwrap().to_vec(), vec![true, true, false]);
    }

    #[test]
    fn test_sum_and_dot() {
        let a = f64s(&[0.1, 0.2, 0.3, 0.4], &[2, 2]);
        assert_relative_eq!(sum(&a), 1.0, epsilon = 1e-12);
        assert_relative_eq!(dot(&a, &a).unwrap(), 0.3, epsilon = 1e-12);
        let s = sum_axis(&a, 0, true).unwrap();
        assert_eq!(s.shape(), &[1, 2]);
        assert_relative_eq!(s.get(&[0, 1]), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_elements() {
        let a = NdArrayRef::from_vec(
            vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)],
            &[2],
        )
        .unwrap();
        let p = mul(&a, &a).unwrap();
        assert_eq!(p.get(&[0]), Complex64::new(0.0, 2.0));
        assert_eq!(p.get(&[1]), Complex64::new(-4.0, 0.0));
    }

    #[test]
    fn test_shape_errors_propagate() {
        let a = f64s(&[1.0, 2.0], &[2]);
        let b = f64s(&[1.0, 2.0, 3.0], &[3]);
        assert!(add(&a, &b).unwrap_err().is_shape_error());
        assert!(dot(&a, &b).is_err());
    }
}
