//! Reductions along a single axis.
//!
//! Every reduction removes the reduced axis from the shape. The axis defaults
//! to the last one when `None` is given, and reducing a rank-1 array yields a
//! rank-0 array holding one element.

use crate::kernel::lane_offsets;
use crate::scalar::Scalar;
use crate::shape::{remove_axis, resolve_axis};
use crate::view::NdArray;
use crate::{NdArrayError, Result};

/// Lane layout of one axis of a dense array.
struct Lanes {
    out_dims: Vec<usize>,
    starts: Vec<usize>,
    stride: usize,
    extent: usize,
}

impl Lanes {
    fn new<T>(a: &NdArray<T>, axis: Option<usize>) -> Result<Self> {
        let axis = resolve_axis(axis, a.ndim())?;
        let extent = a.dims()[axis];
        if extent == 0 {
            return Err(NdArrayError::EmptyAxis { axis });
        }
        let starts = lane_offsets(a.dims(), a.strides(), axis);
        log::trace!(
            "reduce: {} lanes of extent {} along axis {}",
            starts.len(),
            extent,
            axis
        );
        Ok(Self {
            out_dims: remove_axis(a.dims(), axis),
            starts,
            stride: a.strides()[axis] as usize,
            extent,
        })
    }

    /// Elements of the lane starting at `start`, in axis order.
    fn lane<'d, T: Copy>(&self, data: &'d [T], start: usize) -> impl Iterator<Item = T> + 'd {
        let stride = self.stride;
        (0..self.extent).map(move |j| data[start + j * stride])
    }

    /// One output element per lane, in row-major order of the remaining axes.
    fn map<U>(&self, f: impl FnMut(usize) -> U) -> NdArray<U> {
        let out: Vec<U> = self.starts.iter().copied().map(f).collect();
        NdArray::from_dense(out, &self.out_dims)
    }
}

/// Collapse `axis` with `combine(next, accumulator)`, seeded by the first
/// element of each lane.
///
/// # Errors
/// - [`NdArrayError::InvalidAxis`] if `axis` is out of range.
/// - [`NdArrayError::EmptyAxis`] if the axis has extent 0.
pub fn reduce_axis<T: Copy>(
    a: &NdArray<T>,
    axis: Option<usize>,
    combine: impl Fn(T, T) -> T,
) -> Result<NdArray<T>> {
    let lanes = Lanes::new(a, axis)?;
    let data = a.data();
    Ok(lanes.map(|start| {
        lanes
            .lane(data, start)
            .skip(1)
            .fold(data[start], |acc, x| combine(x, acc))
    }))
}

/// Collapse `axis` by folding every lane into an explicit accumulator.
///
/// # Errors
/// Same as [`reduce_axis`].
pub fn fold_axis<T: Copy, A: Clone>(
    a: &NdArray<T>,
    axis: Option<usize>,
    init: A,
    fold: impl Fn(A, T) -> A,
) -> Result<NdArray<A>> {
    let lanes = Lanes::new(a, axis)?;
    Ok(lanes.map(|start| lanes.lane(a.data(), start).fold(init.clone(), &fold)))
}

/// Maximum along `axis`.
pub fn max<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    reduce_axis(a, axis, |x, acc| if x > acc { x } else { acc })
}

/// Minimum along `axis`.
pub fn min<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    reduce_axis(a, axis, |x, acc| if x < acc { x } else { acc })
}

/// Sum along `axis`.
pub fn sum<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    reduce_axis(a, axis, |x, acc| x + acc)
}

/// Arithmetic mean along `axis`.
pub fn mean<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    let extent = a.dims()[resolve_axis(axis, a.ndim())?];
    let total = sum(a, axis)?;
    let n = T::narrow(extent as f64);
    Ok(crate::map::map(&total, |s| s / n))
}

/// Population variance `E[x^2] - E[x]^2` along `axis`.
///
/// Uses running sums of `x` and `x^2`, so data far from zero loses precision
/// to cancellation.
pub fn var<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    let sums = fold_axis(a, axis, (0.0f64, 0.0f64, 0usize), |(s, s2, n), x: T| {
        let x = x.widen();
        (s + x, s2 + x * x, n + 1)
    })?;
    Ok(crate::map::map(&sums, |(s, s2, n)| {
        let n = n as f64;
        let m = s / n;
        T::narrow(s2 / n - m * m)
    }))
}

/// Population standard deviation along `axis`, the square root of [`var`].
pub fn std<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    Ok(crate::map::map(&var(a, axis)?, |v| v.sqrt()))
}

fn arg_extreme<T: Copy>(
    a: &NdArray<T>,
    axis: Option<usize>,
    better: impl Fn(T, T) -> bool,
) -> Result<NdArray<usize>> {
    let lanes = Lanes::new(a, axis)?;
    let data = a.data();
    Ok(lanes.map(|start| {
        let mut best = (0, data[start]);
        for (j, x) in lanes.lane(data, start).enumerate().skip(1) {
            if better(x, best.1) {
                best = (j, x);
            }
        }
        best.0
    }))
}

/// Index of the largest element along `axis`; ties keep the first index.
pub fn argmax<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<usize>> {
    arg_extreme(a, axis, |x, best| x > best)
}

/// Index of the smallest element along `axis`; ties keep the first index.
pub fn argmin<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<usize>> {
    arg_extreme(a, axis, |x, best| x < best)
}
