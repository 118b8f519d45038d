//! Shape and stride bookkeeping shared by every operation.

use crate::{NdArrayError, Result};

/// Compute row-major strides (C default: last index varies fastest).
///
/// `strides[last] == 1` and `strides[i] == dims[i + 1] * strides[i + 1]`.
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Total number of elements described by `dims` (1 for rank 0).
#[inline]
pub(crate) fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// True when `strides` describe a dense row-major layout of `dims`.
pub(crate) fn is_contiguous(dims: &[usize], strides: &[isize]) -> bool {
    if dims.len() != strides.len() {
        return false;
    }
    let mut expected = 1isize;
    for (&dim, &stride) in dims.iter().rev().zip(strides.iter().rev()) {
        if dim <= 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(dim as isize);
    }
    true
}

pub(crate) fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<()> {
    if a != b {
        return Err(NdArrayError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

pub(crate) fn check_axis(axis: usize, rank: usize) -> Result<usize> {
    if axis >= rank {
        return Err(NdArrayError::InvalidAxis { axis, rank });
    }
    Ok(axis)
}

/// Resolve an optional axis argument; `None` selects the last axis.
pub(crate) fn resolve_axis(axis: Option<usize>, rank: usize) -> Result<usize> {
    match axis {
        Some(axis) => check_axis(axis, rank),
        None if rank == 0 => Err(NdArrayError::InvalidAxis { axis: 0, rank }),
        None => Ok(rank - 1),
    }
}

/// Check that `perm` is a permutation of `0..rank`.
pub(crate) fn validate_permutation(perm: &[usize], rank: usize) -> Result<()> {
    if perm.len() != rank {
        return Err(NdArrayError::InvalidPermutation(perm.to_vec()));
    }
    let mut seen = vec![false; rank];
    for &p in perm {
        if p >= rank || seen[p] {
            return Err(NdArrayError::InvalidPermutation(perm.to_vec()));
        }
        seen[p] = true;
    }
    Ok(())
}

/// Drop entry `axis` from a per-axis list.
pub(crate) fn remove_axis<T: Copy>(values: &[T], axis: usize) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != axis)
        .map(|(_, &v)| v)
        .collect()
}
