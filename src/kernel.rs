//! Offset iteration engine.
//!
//! Two walks cover every operation in the crate:
//!
//! - [`for_each_offset`]: visit every multi-index of `dims` in row-major order
//!   (last axis fastest), carrying one running offset per stride set.
//! - [`lane_offsets`]: enumerate the start offsets of the 1-D lanes of a dense
//!   row-major array along one axis. Reductions and sorting address each lane
//!   as `start + j * strides[axis]`.

use crate::shape::total_len;

/// Call `f` with the offsets of every element, one offset per stride set.
///
/// Offsets start at zero; callers add their own base offset. Rank 0 visits a
/// single element, and any zero extent visits nothing.
pub(crate) fn for_each_offset<F>(dims: &[usize], strides_list: &[&[isize]], mut f: F)
where
    F: FnMut(&[isize]),
{
    let total = total_len(dims);
    if total == 0 {
        return;
    }
    let rank = dims.len();
    let mut index = vec![0usize; rank];
    let mut offsets = vec![0isize; strides_list.len()];

    for _ in 0..total {
        f(&offsets);
        for d in (0..rank).rev() {
            index[d] += 1;
            for (offset, strides) in offsets.iter_mut().zip(strides_list) {
                *offset += strides[d];
            }
            if index[d] < dims[d] {
                break;
            }
            // rewind axis d and carry into d - 1
            for (offset, strides) in offsets.iter_mut().zip(strides_list) {
                *offset -= strides[d] * dims[d] as isize;
            }
            index[d] = 0;
        }
    }
}

/// Start offsets of every lane along `axis` of a dense row-major array.
///
/// Starting at 0, the walk advances by one element; whenever the offset lands
/// on a multiple of the axis stride it has finished a block of lanes and jumps
/// over the remaining `extent - 1` rows of that block. For the last axis
/// (stride 1) this degenerates to advancing by the axis extent.
pub(crate) fn lane_offsets(dims: &[usize], strides: &[isize], axis: usize) -> Vec<usize> {
    let extent = dims[axis];
    let lanes: usize = dims
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != axis)
        .map(|(_, &d)| d)
        .product();
    if lanes == 0 || extent == 0 {
        return Vec::new();
    }

    let stride = strides[axis] as usize;
    let last = axis + 1 == dims.len();
    let mut starts = Vec::with_capacity(lanes);
    let mut offset = 0usize;
    for _ in 0..lanes {
        starts.push(offset);
        if last {
            offset += extent;
        } else {
            offset += 1;
            if offset % stride == 0 {
                offset += stride * (extent - 1);
            }
        }
    }
    starts
}
