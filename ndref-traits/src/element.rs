//! Element capability contract.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Minimum bounds for a value stored in a `Buffer`.
///
/// Buffers keep their elements in `Cell`s so that several views can read and
/// write the same storage, which requires `Copy`. `Default` supplies the
/// initial value of freshly created buffers.
pub trait Element: Copy + Default + PartialEq + Debug + 'static {}

impl<T> Element for T where T: Copy + Default + PartialEq + Debug + 'static {}

/// Element types with field-like arithmetic and an ordering.
///
/// Ring types that lack division (e.g. `Z2^k`) are still [`Element`]s and can
/// go through every generic traversal; they only miss the arithmetic helpers.
pub trait Numeric:
    Element
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
    + num_traits::Zero
    + num_traits::One
{
}

impl<T> Numeric for T where
    T: Element
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + PartialOrd
        + num_traits::Zero
        + num_traits::One
{
}

/// Elements that are plain bytes in memory.
///
/// Declaring a type `Pod` permits raw bulk operations such as
/// `Buffer::to_bytes`. Correctness never depends on it.
pub trait Pod: Element + bytemuck::Pod {}

impl<T> Pod for T where T: Element + bytemuck::Pod {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_element<T: Element>() {}
    fn assert_numeric<T: Numeric>() {}
    fn assert_pod<T: Pod>() {}

    #[test]
    fn test_builtin_types() {
        assert_element::<bool>();
        assert_element::<u8>();
        assert_numeric::<i32>();
        assert_numeric::<u64>();
        assert_numeric::<f64>();
        assert_pod::<u8>();
        assert_pod::<f32>();
    }

    #[test]
    fn test_complex_is_element_not_ordered() {
        // Complex numbers have no ordering, so they stop at `Element`.
        assert_element::<num_complex::Complex64>();
    }

    #[test]
    fn test_ring_type_without_division() {
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        struct Ring64(u64);

        impl Add for Ring64 {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Ring64(self.0.wrapping_add(rhs.0))
            }
        }

        impl Mul for Ring64 {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Ring64(self.0.wrapping_mul(rhs.0))
            }
        }

        assert_element::<Ring64>();
        let a = Ring64(u64::MAX);
        assert_eq!(a + Ring64(2), Ring64(1));
        assert_eq!(a * Ring64(2), Ring64(u64::MAX - 1));
    }

    #[test]
    fn test_numeric_identities() {
        fn identity_sum<T: Numeric>(x: T) -> T {
            x * T::one() + T::zero()
        }
        assert_eq!(identity_sum(7i64), 7);
        assert_eq!(identity_sum(2.5f32), 2.5);
    }
}
