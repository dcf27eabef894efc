//! Matrix multiply over strided rank-2 views.
//!
//! Operands are validated with [`deduce_matmul_shape`] and then read in place
//! through their raw parts; neither input is copied. [`matmul`] is a plain
//! triple loop usable with any element that has `+`, `*` and a zero, such as
//! ring elements. With the `faer` feature, [`matmul_faer`] hands the same
//! strided storage to faer.

use std::ops::Mul;

use num_traits::Zero;
use tracing::debug;

use crate::{deduce_matmul_shape, Element, NdArrayRef, Result};

/// `C = A * B` for `A: (M, K)` and `B: (K, N)`, returning a compact `(M, N)`
/// array.
pub fn matmul<T>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>>
where
    T: Element + Zero + Mul<Output = T>,
{
    let (m, n, k) = deduce_matmul_shape(a.shape(), b.shape())?;
    debug!(m, n, k, backend = "naive", "matmul");

    let ra = a.raw_parts();
    let rb = b.raw_parts();
    let (a_buf, b_buf) = (a.buffer(), b.buffer());
    let (a_rs, a_cs) = (ra.strides[0], ra.strides[1]);
    let (b_rs, b_cs) = (rb.strides[0], rb.strides[1]);

    let mut data = Vec::with_capacity(m * n);
    for i in 0..m {
        let a_row = ra.offset + i as isize * a_rs;
        for j in 0..n {
            let b_col = rb.offset + j as isize * b_cs;
            let mut acc = T::zero();
            for p in 0..k {
                let x = a_buf.get((a_row + p as isize * a_cs) as usize);
                let y = b_buf.get((b_col + p as isize * b_rs) as usize);
                acc = acc + x * y;
            }
            data.push(acc);
        }
    }
    NdArrayRef::from_vec(data, &[m, n])
}

/// `C = A * B` computed by faer, reading both operands in place.
#[cfg(feature = "faer")]
pub fn matmul_faer<T>(a: &NdArrayRef<T>, b: &NdArrayRef<T>) -> Result<NdArrayRef<T>>
where
    T: Element + faer_traits::ComplexField + num_traits::One,
{
    use faer::linalg::matmul::matmul_with_conj;
    use faer::mat::{MatMut, MatRef};
    use faer::{Accum, Conj, Par};

    let (m, n, k) = deduce_matmul_shape(a.shape(), b.shape())?;
    debug!(m, n, k, backend = "faer", "matmul");

    let ra = a.raw_parts();
    let rb = b.raw_parts();
    let c = NdArrayRef::<T>::zeros(&[m, n]);
    let rc = c.raw_parts();

    // SAFETY: raw parts come from views validated at construction, so every
    // (row, col) pair addresses an element of the owning buffer. `c` is a
    // fresh buffer nobody else can observe during the call.
    unsafe {
        let a_mat: MatRef<'_, T> = MatRef::from_raw_parts(
            ra.ptr.offset(ra.offset) as *const T,
            m,
            k,
            ra.strides[0],
            ra.strides[1],
        );
        let b_mat: MatRef<'_, T> = MatRef::from_raw_parts(
            rb.ptr.offset(rb.offset) as *const T,
            k,
            n,
            rb.strides[0],
            rb.strides[1],
        );
        let c_mat: MatMut<'_, T> =
            MatMut::from_raw_parts_mut(rc.ptr, m, n, rc.strides[0], rc.strides[1]);
        matmul_with_conj(
            c_mat,
            Accum::Replace,
            a_mat,
            Conj::No,
            b_mat,
            Conj::No,
            <T as num_traits::One>::one(),
            Par::Seq,
        );
    }
    Ok(c)
}
