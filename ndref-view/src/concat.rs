//! Concatenation along an axis.

use std::rc::Rc;

use tracing::debug;

use crate::buffer::Buffer;
use crate::iter::NdCursor;
use crate::nd_array_ref::NdArrayRef;
use crate::shape::{compact_strides, deduce_concatenate_shape, numel};
use crate::{Element, Result};

/// Join views along `axis` (negative counts from the end) into one fresh
/// compact array.
///
/// All inputs must share a rank and agree on every other axis. The output is
/// written in row-major order: for each combination of the axes before
/// `axis`, the matching block of every input is copied in input order.
pub fn concatenate<T: Element>(inputs: &[NdArrayRef<T>], axis: isize) -> Result<NdArrayRef<T>> {
    let shapes: Vec<&[usize]> = inputs.iter().map(|a| a.shape()).collect();
    let (out_shape, axis) = deduce_concatenate_shape(&shapes, axis)?;
    let total = numel(&out_shape);
    debug!(
        inputs = inputs.len(),
        axis,
        shape = ?out_shape,
        "concatenate: allocating output"
    );

    let out = Buffer::create(total);
    let outer = numel(&out_shape[..axis]);
    let mut outer_cursors: Vec<NdCursor> = inputs
        .iter()
        .map(|a| NdCursor::new(&a.shape()[..axis], &a.strides()[..axis], a.offset()))
        .collect();

    let mut dst = 0usize;
    for _ in 0..outer {
        for (input, cursor) in inputs.iter().zip(outer_cursors.iter_mut()) {
            let buf = input.buffer();
            let mut block = NdCursor::new(&input.shape()[axis..], &input.strides()[axis..], cursor.pos());
            while !block.is_exhausted() {
                out.set(dst, buf.get(block.pos() as usize));
                dst += 1;
                block.advance();
            }
            cursor.advance();
        }
    }
    debug_assert!(total == 0 || dst == total);

    NdArrayRef::new(Rc::new(out), &out_shape, &compact_strides(&out_shape), 0)
}
