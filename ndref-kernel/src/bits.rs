//! Packing booleans into bytes and back, LSB first.
//!
//! Without an axis the array is taken in row-major order: bit `i % 8` of
//! byte `i / 8` holds logical element `i`. With an axis, every lane along it
//! is packed independently and the axis extent becomes `ceil(extent / 8)`.
//! Padding bits of a trailing partial byte are 0.

use tracing::debug;

use crate::{normalize_axis, ArrayRef, NdArrayRef, Result, BITS_PER_BYTE};

/// Pack a boolean array into bytes.
pub fn packbits(view: &NdArrayRef<bool>, axis: Option<isize>) -> Result<NdArrayRef<u8>> {
    let Some(axis) = axis else {
        return Ok(packbits_flat(view).into());
    };
    let axis = normalize_axis(axis, view.ndim())?;
    let mut out_shape = view.shape().to_vec();
    out_shape[axis] = out_shape[axis].div_ceil(BITS_PER_BYTE);
    let out = NdArrayRef::<u8>::zeros(&out_shape);
    for (src, dst) in view.lanes(axis as isize)?.zip(out.lanes(axis as isize)?) {
        or_bits_into(&src, &dst);
    }
    Ok(out)
}

fn packbits_flat(view: &NdArrayRef<bool>) -> ArrayRef<u8> {
    let n = view.numel();
    let nbytes = n.div_ceil(BITS_PER_BYTE);
    if view.is_linear() {
        let flat = view.flatten();
        let bytes: Vec<u8> = (0..nbytes)
            .map(|j| {
                let start = j * BITS_PER_BYTE;
                let end = (start + BITS_PER_BYTE).min(n);
                (start..end).fold(0u8, |byte, i| byte | (flat.get(i) as u8) << (i - start))
            })
            .collect();
        return ArrayRef::from_vec(bytes);
    }
    debug!(
        shape = ?view.shape(),
        strides = ?view.strides(),
        "packbits: non-linear input, zero-filling output and OR-ing bits"
    );
    let out = ArrayRef::<u8>::zeros(nbytes);
    let mut cursor = view.cursor();
    let buf = view.buffer();
    while !cursor.is_exhausted() {
        let i = cursor.index();
        if buf.get(cursor.pos() as usize) {
            let j = i / BITS_PER_BYTE;
            out.set(j, out.get(j) | 1 << (i % BITS_PER_BYTE));
        }
        cursor.advance();
    }
    out
}

/// OR the bits of `src` into the zero-initialized bytes of `dst`.
fn or_bits_into(src: &ArrayRef<bool>, dst: &ArrayRef<u8>) {
    for (i, bit) in src.iter().enumerate() {
        if bit {
            let j = i / BITS_PER_BYTE;
            dst.set(j, dst.get(j) | 1 << (i % BITS_PER_BYTE));
        }
    }
}

/// Expand every byte into 8 booleans, LSB first.
///
/// The result has `8 * numel` elements (no axis) or `8 * shape[axis]` along
/// `axis`. Padding bits from a partial byte come back as `false` and are the
/// caller's to discard.
pub fn unpackbits(view: &NdArrayRef<u8>, axis: Option<isize>) -> Result<NdArrayRef<bool>> {
    let Some(axis) = axis else {
        let bits: Vec<bool> = view
            .iter()
            .flat_map(|byte| (0..BITS_PER_BYTE).map(move |b| byte >> b & 1 == 1))
            .collect();
        return Ok(ArrayRef::from_vec(bits).into());
    };
    let axis = normalize_axis(axis, view.ndim())?;
    let mut out_shape = view.shape().to_vec();
    out_shape[axis] *= BITS_PER_BYTE;
    let out = NdArrayRef::<bool>::zeros(&out_shape);
    for (src, dst) in view.lanes(axis as isize)?.zip(out.lanes(axis as isize)?) {
        for (j, byte) in src.iter().enumerate() {
            for b in 0..BITS_PER_BYTE {
                dst.set(j * BITS_PER_BYTE + b, byte >> b & 1 == 1);
            }
        }
    }
    Ok(out)
}
