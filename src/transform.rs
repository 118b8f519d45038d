//! Shape transforms. Every transform returns a freshly allocated array.

use crate::shape::{check_axis, total_len};
use crate::view::NdArray;
use crate::{NdArrayError, Result};

/// Row-major linearization into a rank-1 array.
pub fn flatten<T: Clone>(a: &NdArray<T>) -> NdArray<T> {
    a.clone().with_dims(&[a.len()])
}

/// Refill a new array of shape `dims` with the row-major elements of `a`.
///
/// # Errors
/// Returns [`NdArrayError::ReshapeSize`] if the element counts differ.
pub fn reshape<T: Clone>(a: &NdArray<T>, dims: &[usize]) -> Result<NdArray<T>> {
    if total_len(dims) != a.len() {
        return Err(NdArrayError::ReshapeSize {
            size: a.len(),
            shape: dims.to_vec(),
        });
    }
    log::trace!("reshape {:?} -> {:?}", a.dims(), dims);
    Ok(a.clone().with_dims(dims))
}

/// Permute axes. Output axis `j` takes input axis `axes[j]`; `None` reverses
/// the axis order.
///
/// # Errors
/// Returns [`NdArrayError::InvalidPermutation`] if `axes` is not a
/// permutation of `0..rank`.
pub fn transpose<T: Copy>(a: &NdArray<T>, axes: Option<&[usize]>) -> Result<NdArray<T>> {
    let reversed: Vec<usize> = (0..a.ndim()).rev().collect();
    let perm = axes.unwrap_or(&reversed);
    Ok(a.view().permute(perm)?.to_array())
}

impl<T: Copy> NdArray<T> {
    /// Full transpose (axis order reversed).
    pub fn t(&self) -> NdArray<T> {
        let dims: Vec<usize> = self.dims().iter().rev().copied().collect();
        let mut src = vec![0usize; self.ndim()];
        NdArray::from_fn(&dims, |idx| {
            for (s, &i) in src.iter_mut().rev().zip(idx) {
                *s = i;
            }
            self[&src[..]]
        })
    }
}

/// Remove the listed unit-length axes. An empty list removes every unit axis.
///
/// # Errors
/// - [`NdArrayError::InvalidAxis`] if an axis is out of range.
/// - [`NdArrayError::SqueezeNonUnit`] if a listed axis has extent other than 1.
pub fn squeeze<T: Clone>(a: &NdArray<T>, axes: &[usize]) -> Result<NdArray<T>> {
    let rank = a.ndim();
    let mut remove = vec![false; rank];
    if axes.is_empty() {
        for (flag, &extent) in remove.iter_mut().zip(a.dims()) {
            *flag = extent == 1;
        }
    } else {
        for &axis in axes {
            check_axis(axis, rank)?;
            let extent = a.dims()[axis];
            if extent != 1 {
                return Err(NdArrayError::SqueezeNonUnit { axis, extent });
            }
            remove[axis] = true;
        }
    }
    let dims: Vec<usize> = a
        .dims()
        .iter()
        .zip(&remove)
        .filter(|&(_, &r)| !r)
        .map(|(&d, _)| d)
        .collect();
    Ok(a.clone().with_dims(&dims))
}

/// Insert unit-length axes at the given positions of the output shape.
///
/// Positions are applied in ascending order, each checked against the rank
/// reached so far.
///
/// # Errors
/// Returns [`NdArrayError::InvalidAxis`] if a position exceeds that rank.
pub fn expand_dims<T: Clone>(a: &NdArray<T>, axes: &[usize]) -> Result<NdArray<T>> {
    let mut positions = axes.to_vec();
    positions.sort_unstable();
    positions.dedup();
    let mut dims = a.dims().to_vec();
    for axis in positions {
        if axis > dims.len() {
            return Err(NdArrayError::InvalidAxis {
                axis,
                rank: dims.len() + 1,
            });
        }
        dims.insert(axis, 1);
    }
    Ok(a.clone().with_dims(&dims))
}
