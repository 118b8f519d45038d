//! Axis-aware merge sort.
//!
//! Each lane along the sorted axis is addressed as `start + j * stride` in the
//! flat buffer and sorted with an iterative bottom-up merge: run widths double
//! (1, 2, 4, ...) until one run covers the axis. Merging takes from the left
//! run on `<=`, so equal elements keep their order.

use crate::kernel::lane_offsets;
use crate::scalar::Scalar;
use crate::shape::{ensure_same_shape, resolve_axis};
use crate::view::NdArray;
use crate::{NdArrayError, Result};

/// Sorts the lane `buf[start + j * stride]`, `j < n`, with `le` as `<=`.
fn merge_sort_lane<E: Copy>(
    buf: &mut [E],
    start: usize,
    stride: usize,
    n: usize,
    scratch: &mut Vec<E>,
    le: impl Fn(E, E) -> bool,
) {
    let at = |j: usize| start + j * stride;
    let mut width = 1;
    while width < n {
        let mut lo = 0;
        while lo < n {
            let mid = (lo + width).min(n);
            let hi = (lo + 2 * width).min(n);
            if mid < hi {
                scratch.clear();
                let (mut i, mut j) = (lo, mid);
                while i < mid && j < hi {
                    if le(buf[at(i)], buf[at(j)]) {
                        scratch.push(buf[at(i)]);
                        i += 1;
                    } else {
                        scratch.push(buf[at(j)]);
                        j += 1;
                    }
                }
                scratch.extend((i..mid).map(|k| buf[at(k)]));
                scratch.extend((j..hi).map(|k| buf[at(k)]));
                for (k, &value) in scratch.iter().enumerate() {
                    buf[at(lo + k)] = value;
                }
            }
            lo += 2 * width;
        }
        width *= 2;
    }
}

/// Lane start offsets, axis stride and axis extent for sorting along `axis`.
fn lanes_of<T>(a: &NdArray<T>, axis: Option<usize>) -> Result<(Vec<usize>, usize, usize)> {
    let axis = resolve_axis(axis, a.ndim())?;
    let starts = lane_offsets(a.dims(), a.strides(), axis);
    log::trace!("sort: {} lanes along axis {}", starts.len(), axis);
    Ok((starts, a.strides()[axis] as usize, a.dims()[axis]))
}

/// Sort `a` in place, ascending and stable, along `axis` (default last).
///
/// # Errors
/// Returns [`NdArrayError::InvalidAxis`] if `axis` is out of range.
pub fn sort<T: Scalar>(a: &mut NdArray<T>, axis: Option<usize>) -> Result<()> {
    let (starts, stride, n) = lanes_of(a, axis)?;
    let mut scratch = Vec::with_capacity(n);
    let data = a.data_mut();
    for start in starts {
        merge_sort_lane(data, start, stride, n, &mut scratch, |x, y| x <= y);
    }
    Ok(())
}

/// Sorted copy of `a`; the input is left untouched.
pub fn sorted<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<T>> {
    let mut out = a.clone();
    sort(&mut out, axis)?;
    Ok(out)
}

/// Indices that sort `a` along `axis`.
///
/// The result has the shape of `a`; along `axis` it lists, for each output
/// position, the source index giving ascending order.
pub fn argsort<T: Scalar>(a: &NdArray<T>, axis: Option<usize>) -> Result<NdArray<usize>> {
    let (starts, stride, n) = lanes_of(a, axis)?;
    let mut indices = NdArray::from_fn(a.dims(), |_| 0usize);
    for &start in &starts {
        for j in 0..n {
            indices.data_mut()[start + j * stride] = j;
        }
    }

    let data = a.data();
    let mut scratch = Vec::with_capacity(n);
    for start in starts {
        merge_sort_lane(
            indices.data_mut(),
            start,
            stride,
            n,
            &mut scratch,
            |i, j| data[start + i * stride] <= data[start + j * stride],
        );
    }
    Ok(indices)
}

/// Gather `a` along `axis` with an index array of the same shape.
///
/// # Errors
/// - [`NdArrayError::ShapeMismatch`] if the shapes differ.
/// - [`NdArrayError::OffsetOverflow`] if an index exceeds the axis extent.
pub fn take_along_axis<T: Copy>(
    a: &NdArray<T>,
    indices: &NdArray<usize>,
    axis: Option<usize>,
) -> Result<NdArray<T>> {
    ensure_same_shape(a.dims(), indices.dims())?;
    let (starts, stride, n) = lanes_of(a, axis)?;
    let src = a.data();
    let idx = indices.data();
    let mut out = a.clone();
    let dst = out.data_mut();
    for start in starts {
        for j in 0..n {
            let k = idx[start + j * stride];
            if k >= n {
                return Err(NdArrayError::OffsetOverflow);
            }
            dst[start + j * stride] = src[start + k * stride];
        }
    }
    Ok(out)
}
