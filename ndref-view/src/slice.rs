//! Python-style slice specs and their normalization.
//!
//! A [`Slice`] is what callers write: optional, signed, possibly negative
//! bounds. Normalizing against an axis length produces a [`NormalizedSlice`]
//! with concrete in-range bounds, or an error if the range is empty.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::{NdError, Result};

/// User-facing slice `start:stop:step`.
///
/// Negative `start`/`stop` count from the end. Defaults depend on the sign
/// of `step`: `0:n` for positive steps, `n-1:(before 0)` for negative ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `:`, the whole axis.
    pub fn full() -> Self {
        Self::default()
    }

    /// `start:stop`.
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `::-1`, the whole axis reversed.
    pub fn reversed() -> Self {
        Self::new(None, None, Some(-1))
    }

    /// Same bounds with a different step.
    pub fn with_step(self, step: isize) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }

    /// Normalize against an axis of length `n`.
    pub fn normalize(&self, n: usize) -> Result<NormalizedSlice> {
        self.normalize_on_axis(n, 0)
    }

    pub(crate) fn normalize_on_axis(&self, n: usize, axis: usize) -> Result<NormalizedSlice> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(NdError::ZeroStep { axis });
        }
        let len = n as isize;
        let shift = |v: isize| if v < 0 { v + len } else { v };
        let empty = || NdError::EmptySlice {
            axis,
            start: self.start,
            stop: self.stop,
            step,
            dim: n,
        };

        if step > 0 {
            let start = self.start.map_or(0, |s| shift(s).clamp(0, len));
            let stop = self.stop.map_or(len, |s| shift(s).clamp(0, len));
            if start >= stop {
                return Err(empty());
            }
            Ok(NormalizedSlice {
                start: start as usize,
                stop: Some(stop as usize),
                step,
            })
        } else {
            // -1 stands for "before index 0" while comparing.
            let start = self.start.map_or(len - 1, |s| shift(s).clamp(-1, len - 1));
            let stop = self.stop.map_or(-1, |s| shift(s).clamp(-1, len - 1));
            if stop >= start {
                return Err(empty());
            }
            Ok(NormalizedSlice {
                start: start as usize,
                stop: (stop >= 0).then_some(stop as usize),
                step,
            })
        }
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

impl From<Range<isize>> for Slice {
    fn from(r: Range<isize>) -> Self {
        Slice::range(r.start, r.end)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(r: RangeFrom<isize>) -> Self {
        Slice::new(Some(r.start), None, None)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(r: RangeTo<isize>) -> Self {
        Slice::new(None, Some(r.end), None)
    }
}

/// Slice with concrete bounds inside `[0, n)`.
///
/// `stop` is exclusive. It is `None` only for negative steps that run
/// through index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSlice {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: isize,
}

impl NormalizedSlice {
    /// Number of indices `start, start+step, ...` strictly before `stop`.
    pub fn numel(&self) -> usize {
        let start = self.start as isize;
        let stop = self.stop.map_or(-1, |s| s as isize);
        let dist = if self.step > 0 { stop - start } else { start - stop };
        if dist <= 0 {
            return 0;
        }
        // Steps near isize::MAX/MIN must not overflow.
        (dist as usize - 1) / self.step.unsigned_abs() + 1
    }

    /// The `i`-th selected index.
    #[inline]
    pub fn index(&self, i: usize) -> usize {
        (self.start as isize + self.step * i as isize) as usize
    }

    /// Stride of the sliced axis given the source stride.
    ///
    /// A slice that selects one element keeps `stride`; the step is never
    /// applied, so an extreme step cannot overflow.
    #[inline]
    pub fn stride(&self, stride: isize) -> isize {
        if self.numel() <= 1 {
            stride
        } else {
            stride * self.step
        }
    }
}

/// Number of elements a slice selects on an axis of length `n`.
pub fn calc_numel(slice: &Slice, n: usize) -> Result<usize> {
    Ok(slice.normalize(n)?.numel())
}

/// One entry of a mixed index list: a single integer or a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisIndex {
    /// Fix the axis at one position (negative counts from the end).
    At(isize),
    /// Keep the axis, restricted to a slice.
    Slice(Slice),
}

impl From<isize> for AxisIndex {
    fn from(i: isize) -> Self {
        AxisIndex::At(i)
    }
}

impl From<Slice> for AxisIndex {
    fn from(s: Slice) -> Self {
        AxisIndex::Slice(s)
    }
}

impl From<RangeFull> for AxisIndex {
    fn from(r: RangeFull) -> Self {
        AxisIndex::Slice(r.into())
    }
}

impl From<Range<isize>> for AxisIndex {
    fn from(r: Range<isize>) -> Self {
        AxisIndex::Slice(r.into())
    }
}

impl From<RangeFrom<isize>> for AxisIndex {
    fn from(r: RangeFrom<isize>) -> Self {
        AxisIndex::Slice(r.into())
    }
}

impl From<RangeTo<isize>> for AxisIndex {
    fn from(r: RangeTo<isize>) -> Self {
        AxisIndex::Slice(r.into())
    }
}

/// Normalized entry of a mixed index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedIndex {
    At(usize),
    Slice(NormalizedSlice),
}

/// Normalize a mixed index list against a full shape.
///
/// Missing trailing axes are padded with full slices. Negative integer
/// indices are resolved; out-of-range integers and lists longer than the
/// rank are errors.
pub fn normalize_indices(indices: &[AxisIndex], shape: &[usize]) -> Result<Vec<NormalizedIndex>> {
    if indices.len() > shape.len() {
        return Err(NdError::TooManyIndices {
            got: indices.len(),
            rank: shape.len(),
        });
    }
    let full = AxisIndex::Slice(Slice::full());
    shape
        .iter()
        .enumerate()
        .map(|(axis, &dim)| match indices.get(axis).unwrap_or(&full) {
            AxisIndex::At(index) => {
                let resolved = if *index < 0 {
                    *index + dim as isize
                } else {
                    *index
                };
                if resolved < 0 || resolved >= dim as isize {
                    return Err(NdError::IndexOutOfRange {
                        axis,
                        index: *index,
                        dim,
                    });
                }
                Ok(NormalizedIndex::At(resolved as usize))
            }
            AxisIndex::Slice(s) => Ok(NormalizedIndex::Slice(s.normalize_on_axis(dim, axis)?)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(start: Option<isize>, stop: Option<isize>, step: Option<isize>, n: usize) -> Result<NormalizedSlice> {
        Slice::new(start, stop, step).normalize(n)
    }

    #[test]
    fn test_defaults_positive_step() {
        let s = norm(None, None, None, 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 0, stop: Some(5), step: 1 });
        assert_eq!(s.numel(), 5);
    }

    #[test]
    fn test_full_reverse() {
        let s = norm(Some(-1), None, Some(-1), 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 4, stop: None, step: -1 });
        assert_eq!(s.numel(), 5);
        assert_eq!(Slice::reversed().normalize(5).unwrap(), s);
    }

    #[test]
    fn test_negative_bounds_shift_and_clamp() {
        let s = norm(Some(-3), Some(100), None, 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 2, stop: Some(5), step: 1 });
        let s = norm(Some(-100), Some(-1), None, 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 0, stop: Some(4), step: 1 });
        let s = norm(Some(100), Some(-100), Some(-2), 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 4, stop: None, step: -2 });
        assert_eq!(s.numel(), 3);
    }

    #[test]
    fn test_step_numel() {
        assert_eq!(calc_numel(&Slice::new(Some(1), Some(8), Some(3)), 10).unwrap(), 3);
        assert_eq!(calc_numel(&Slice::new(Some(1), Some(7), Some(3)), 10).unwrap(), 2);
        assert_eq!(calc_numel(&Slice::new(Some(8), Some(1), Some(-3)), 10).unwrap(), 3);
        assert_eq!(calc_numel(&Slice::new(None, None, Some(-4)), 10).unwrap(), 3);
    }

    #[test]
    fn test_extreme_steps_select_one_element() {
        let s = norm(None, None, Some(isize::MAX), 5).unwrap();
        assert_eq!(s.numel(), 1);
        assert_eq!(s.stride(3), 3);
        let s = norm(None, None, Some(isize::MIN), 5).unwrap();
        assert_eq!(s, NormalizedSlice { start: 4, stop: None, step: isize::MIN });
        assert_eq!(s.numel(), 1);
        assert_eq!(s.stride(-2), -2);
        assert_eq!(calc_numel(&Slice::new(Some(1), None, Some(isize::MAX / 2)), 5).unwrap(), 1);
    }

    #[test]
    fn test_index_of_selected() {
        let s = norm(Some(8), Some(1), Some(-3), 10).unwrap();
        let picked: Vec<usize> = (0..s.numel()).map(|i| s.index(i)).collect();
        assert_eq!(picked, vec![8, 5, 2]);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            norm(Some(3), Some(3), None, 5),
            Err(NdError::EmptySlice { .. })
        ));
        assert!(matches!(
            norm(Some(1), Some(3), Some(-1), 5),
            Err(NdError::EmptySlice { .. })
        ));
        assert!(matches!(norm(None, None, None, 0), Err(NdError::EmptySlice { .. })));
        assert!(matches!(
            norm(Some(-10), None, Some(-1), 5),
            Err(NdError::EmptySlice { .. })
        ));
    }

    #[test]
    fn test_zero_step() {
        assert_eq!(norm(None, None, Some(0), 5), Err(NdError::ZeroStep { axis: 0 }));
    }

    #[test]
    fn test_range_conversions() {
        assert_eq!(Slice::from(1..3), Slice::range(1, 3));
        assert_eq!(Slice::from(2..), Slice::new(Some(2), None, None));
        assert_eq!(Slice::from(..-1), Slice::new(None, Some(-1), None));
        assert_eq!(Slice::from(..), Slice::full());
        assert_eq!(AxisIndex::from(-2), AxisIndex::At(-2));
    }

    #[test]
    fn test_normalize_indices_pads_and_resolves() {
        let idx = normalize_indices(&[AxisIndex::At(-1)], &[3, 4]).unwrap();
        assert_eq!(
            idx,
            vec![
                NormalizedIndex::At(2),
                NormalizedIndex::Slice(NormalizedSlice { start: 0, stop: Some(4), step: 1 }),
            ]
        );
    }

    #[test]
    fn test_normalize_indices_errors() {
        assert_eq!(
            normalize_indices(&[AxisIndex::At(3)], &[3]),
            Err(NdError::IndexOutOfRange { axis: 0, index: 3, dim: 3 })
        );
        assert_eq!(
            normalize_indices(&[AxisIndex::from(..), AxisIndex::At(-5)], &[3, 4]),
            Err(NdError::IndexOutOfRange { axis: 1, index: -5, dim: 4 })
        );
        assert_eq!(
            normalize_indices(&[AxisIndex::At(0), AxisIndex::At(0)], &[3]),
            Err(NdError::TooManyIndices { got: 2, rank: 1 })
        );
        assert_eq!(
            normalize_indices(
                &[AxisIndex::from(..), AxisIndex::Slice(Slice::full().with_step(0))],
                &[3, 4]
            ),
            Err(NdError::ZeroStep { axis: 1 })
        );
    }
}
