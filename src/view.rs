//! Owned arrays and borrowed strided views.
//!
//! - [`NdArray`]: Owned, dense row-major array. Every factory, transform and
//!   reduction returns a freshly allocated `NdArray`.
//! - [`NdView`]: Immutable strided view over a borrowed buffer. Metadata
//!   transformations (`permute`, `index_axis`, `broadcast`) never touch the data;
//!   [`NdView::to_array`] materializes a view into a new `NdArray`.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::map::copy_into;
use crate::shape::{is_contiguous, row_major_strides, total_len, validate_permutation};
use crate::{NdArrayError, Result};

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that all accessed offsets stay within `[0, len)`.
fn validate_bounds(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(NdArrayError::RankMismatch(dims.len(), strides.len()));
    }
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(NdArrayError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(NdArrayError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(NdArrayError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset as usize >= len {
        return Err(NdArrayError::OffsetOverflow);
    }
    Ok(())
}

fn checked_offset(dims: &[usize], strides: &[isize], indices: &[usize]) -> Option<isize> {
    if indices.len() != dims.len() {
        return None;
    }
    let mut offset = 0isize;
    for ((&index, &dim), &stride) in indices.iter().zip(dims).zip(strides) {
        if index >= dim {
            return None;
        }
        offset += index as isize * stride;
    }
    Some(offset)
}

// ============================================================================
// NdView
// ============================================================================

/// Dynamic-rank immutable strided view.
///
/// Element `index` lives at `offset + Σ index[i] * strides[i]` in `data`.
pub struct NdView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for NdView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for NdView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> NdView<'a, T> {
    /// Create a new strided view over a borrowed slice.
    ///
    /// # Errors
    /// Returns an error if the view would address memory outside `data`.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        total_len(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// True when the view addresses a dense row-major block.
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.dims, &self.strides)
    }

    /// Permute dimensions: output axis `j` is input axis `perm[j]`.
    pub fn permute(&self, perm: &[usize]) -> Result<NdView<'a, T>> {
        validate_permutation(perm, self.ndim())?;
        let new_dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        let new_strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(NdView {
            data: self.data,
            dims: Arc::from(new_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }

    /// Fix `axis` at `index`, dropping that axis from the view.
    ///
    /// `view.index_axis(0, i)` is the sub-array `a[i]`.
    pub fn index_axis(&self, axis: usize, index: usize) -> Result<NdView<'a, T>> {
        let rank = self.ndim();
        if axis >= rank {
            return Err(NdArrayError::InvalidAxis { axis, rank });
        }
        if index >= self.dims[axis] {
            return Err(NdArrayError::OffsetOverflow);
        }
        let dims: Vec<usize> = crate::shape::remove_axis(&self.dims, axis);
        let strides: Vec<isize> = crate::shape::remove_axis(&self.strides, axis);
        Ok(NdView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: self.offset + index as isize * self.strides[axis],
        })
    }

    /// Broadcast this view to a target shape.
    ///
    /// Missing leading axes and size-1 axes are expanded with stride 0, so a
    /// rank-0 view replicates its single element over any shape.
    pub fn broadcast(&self, target_dims: &[usize]) -> Result<NdView<'a, T>> {
        let rank = self.ndim();
        if rank > target_dims.len() {
            return Err(NdArrayError::RankMismatch(rank, target_dims.len()));
        }
        let lead = target_dims.len() - rank;
        let mut new_strides = vec![0isize; lead];
        for i in 0..rank {
            let target = target_dims[lead + i];
            if self.dims[i] == target {
                new_strides.push(self.strides[i]);
            } else if self.dims[i] == 1 {
                new_strides.push(0);
            } else {
                return Err(NdArrayError::ShapeMismatch(
                    self.dims.to_vec(),
                    target_dims.to_vec(),
                ));
            }
        }
        Ok(NdView {
            data: self.data,
            dims: Arc::from(target_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }
}

impl<'a, T: Copy> NdView<'a, T> {
    /// Get an element by multi-dimensional index.
    ///
    /// # Panics
    /// Panics if the index has the wrong rank or is out of bounds.
    pub fn get(&self, indices: &[usize]) -> T {
        let offset = checked_offset(&self.dims, &self.strides, indices).unwrap_or_else(|| {
            panic!("index {:?} out of bounds for dims {:?}", indices, self.dims)
        });
        self.data[(self.offset + offset) as usize]
    }

    /// Copy the viewed elements into a new row-major array.
    pub fn to_array(&self) -> NdArray<T> {
        let mut data = Vec::with_capacity(self.len());
        copy_into(&mut data, self);
        NdArray::from_dense(data, &self.dims)
    }
}

// ============================================================================
// NdArray
// ============================================================================

/// Owned, dense, row-major N-dimensional array.
///
/// Invariants: `dims.len() == strides.len()`, `data.len() == product(dims)`,
/// and `strides` are the row-major strides of `dims`.
#[derive(Clone, PartialEq)]
pub struct NdArray<T = f64> {
    data: Vec<T>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("data", &self.data)
            .finish()
    }
}

impl<T> NdArray<T> {
    /// Create from a row-major buffer whose length is already known to match.
    pub(crate) fn from_dense(data: Vec<T>, dims: &[usize]) -> Self {
        debug_assert_eq!(data.len(), total_len(dims));
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
        }
    }

    /// Create from a row-major buffer and a shape.
    ///
    /// # Errors
    /// Returns [`NdArrayError::DataLength`] if `data.len() != product(dims)`.
    pub fn from_shape_vec(dims: &[usize], data: Vec<T>) -> Result<Self> {
        if data.len() != total_len(dims) {
            return Err(NdArrayError::DataLength {
                len: data.len(),
                shape: dims.to_vec(),
            });
        }
        Ok(Self::from_dense(data, dims))
    }

    /// Create an array with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total = total_len(dims);
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in (0..rank).rev() {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self::from_dense(data, dims)
    }

    /// Rank-0 array holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_dense(vec![value], &[])
    }

    /// Per-axis extents, outermost first.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Alias of [`NdArray::dims`].
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total element count, `product(dims)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Flat offset of a multi-index, or `None` when out of bounds.
    pub fn offset_of(&self, indices: &[usize]) -> Option<usize> {
        checked_offset(&self.dims, &self.strides, indices).map(|o| o as usize)
    }

    /// Create an immutable view over this array.
    pub fn view(&self) -> NdView<'_, T> {
        NdView {
            data: &self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: 0,
        }
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Mutable iteration over all elements in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Same buffer under a new shape with an equal element count.
    pub(crate) fn with_dims(self, dims: &[usize]) -> Self {
        Self::from_dense(self.data, dims)
    }
}

impl<T: Copy> NdArray<T> {
    /// Get an element by multi-dimensional index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, indices: &[usize]) -> T {
        self[indices]
    }

    /// Set an element by multi-dimensional index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, indices: &[usize], value: T) {
        self[indices] = value;
    }

    /// Copy of the sub-array at `index` along the first axis (`a[index]`).
    pub fn subarray(&self, index: usize) -> Result<NdArray<T>> {
        Ok(self.view().index_axis(0, index)?.to_array())
    }

    /// The single element of a one-element array.
    pub fn item(&self) -> Option<T> {
        match self.data.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }
}

impl<T> Index<&[usize]> for NdArray<T> {
    type Output = T;

    fn index(&self, indices: &[usize]) -> &T {
        match self.offset_of(indices) {
            Some(offset) => &self.data[offset],
            None => panic!("index {:?} out of bounds for dims {:?}", indices, self.dims),
        }
    }
}

impl<T> IndexMut<&[usize]> for NdArray<T> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut T {
        match self.offset_of(indices) {
            Some(offset) => &mut self.data[offset],
            None => panic!("index {:?} out of bounds for dims {:?}", indices, self.dims),
        }
    }
}

impl<T, const N: usize> Index<[usize; N]> for NdArray<T> {
    type Output = T;

    fn index(&self, indices: [usize; N]) -> &T {
        &self[&indices[..]]
    }
}

impl<T, const N: usize> IndexMut<[usize; N]> for NdArray<T> {
    fn index_mut(&mut self, indices: [usize; N]) -> &mut T {
        &mut self[&indices[..]]
    }
}

// ============================================================================
// Tests
// ============================================================================
