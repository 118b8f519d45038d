//! Map operations on strided views.
//!
//! The `*_into` functions append results to a destination buffer in row-major
//! order of the source view, so the buffer can be wrapped directly into a
//! dense [`NdArray`]. Contiguous sources take a slice fast path.

use crate::kernel::for_each_offset;
use crate::shape::ensure_same_shape;
use crate::view::{NdArray, NdView};
use crate::Result;

/// Append the elements of `src` to `dest` in row-major order.
pub fn copy_into<T: Copy>(dest: &mut Vec<T>, src: &NdView<'_, T>) {
    map_into(dest, src, |x| x);
}

/// Append `f(x)` for every element `x` of `src`, in row-major order.
pub fn map_into<T: Copy, U>(dest: &mut Vec<U>, src: &NdView<'_, T>, f: impl Fn(T) -> U) {
    dest.reserve(src.len());
    let data = src.data();
    let base = src.offset();
    if src.is_contiguous() {
        if src.is_empty() {
            return;
        }
        let start = base as usize;
        dest.extend(data[start..start + src.len()].iter().map(|&x| f(x)));
        return;
    }
    for_each_offset(src.dims(), &[src.strides()], |offsets| {
        dest.push(f(data[(base + offsets[0]) as usize]));
    });
}

/// Append `f(a, b)` for every pair of elements at equal indices.
///
/// # Errors
/// Returns [`crate::NdArrayError::ShapeMismatch`] if the views differ in shape.
pub fn zip_map2_into<A: Copy, B: Copy, U>(
    dest: &mut Vec<U>,
    a: &NdView<'_, A>,
    b: &NdView<'_, B>,
    f: impl Fn(A, B) -> U,
) -> Result<()> {
    ensure_same_shape(a.dims(), b.dims())?;
    dest.reserve(a.len());
    let (da, db) = (a.data(), b.data());
    let (oa, ob) = (a.offset(), b.offset());
    if a.is_contiguous() && b.is_contiguous() {
        if a.is_empty() {
            return Ok(());
        }
        let (sa, sb) = (oa as usize, ob as usize);
        let n = a.len();
        dest.extend(
            da[sa..sa + n]
                .iter()
                .zip(&db[sb..sb + n])
                .map(|(&x, &y)| f(x, y)),
        );
        return Ok(());
    }
    for_each_offset(a.dims(), &[a.strides(), b.strides()], |offsets| {
        dest.push(f(
            da[(oa + offsets[0]) as usize],
            db[(ob + offsets[1]) as usize],
        ));
    });
    Ok(())
}

/// New array of the same shape with `f` applied to every element.
pub fn map<T: Copy, U>(a: &NdArray<T>, f: impl Fn(T) -> U) -> NdArray<U> {
    let data: Vec<U> = a.iter().map(|&x| f(x)).collect();
    NdArray::from_dense(data, a.dims())
}

/// New array combining two equally shaped arrays elementwise.
///
/// # Errors
/// Returns [`crate::NdArrayError::ShapeMismatch`] if the shapes differ.
pub fn zip<A: Copy, B: Copy, U>(
    a: &NdArray<A>,
    b: &NdArray<B>,
    f: impl Fn(A, B) -> U,
) -> Result<NdArray<U>> {
    let mut data = Vec::new();
    zip_map2_into(&mut data, &a.view(), &b.view(), f)?;
    Ok(NdArray::from_dense(data, a.dims()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NdArrayError;

    #[test]
    fn test_map_preserves_shape() {
        let a = NdArray::from_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let b = map(&a, |x| x * 2.0);
        assert_eq!(b.dims(), &[2, 3]);
        assert_eq!(b.data(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_map_into_permuted() {
        let a = NdArray::from_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let t = a.view().permute(&[1, 0]).unwrap();
        let mut out = Vec::new();
        map_into(&mut out, &t, |x| x + 1.0);
        assert_eq!(out, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_copy_into_offset_view() {
        let a = NdArray::from_fn(&[3, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
        let row = a.view().index_axis(0, 2).unwrap();
        let mut out = Vec::new();
        copy_into(&mut out, &row);
        assert_eq!(out, vec![4.0, 5.0]);
    }

    #[test]
    fn test_zip_same_shape() {
        let a = NdArray::from_fn(&[2, 2], |idx| idx[0] as f64);
        let b = NdArray::from_fn(&[2, 2], |idx| idx[1] as f64);
        let c = zip(&a, &b, |x, y| x * 10.0 + y).unwrap();
        assert_eq!(c.data(), &[0.0, 1.0, 10.0, 11.0]);
    }

    #[test]
    fn test_zip_shape_mismatch() {
        let a = NdArray::from_fn(&[2, 2], |_| 0.0);
        let b = NdArray::from_fn(&[4], |_| 0.0);
        assert!(matches!(
            zip(&a, &b, |x: f64, y: f64| x + y),
            Err(NdArrayError::ShapeMismatch(..))
        ));
    }

    #[test]
    fn test_zip_map2_into_broadcast_scalar() {
        let a = NdArray::from_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let s = NdArray::scalar(100.0);
        let sb = s.view().broadcast(a.dims()).unwrap();
        let mut out = Vec::new();
        zip_map2_into(&mut out, &a.view(), &sb, |x, y| x + y).unwrap();
        assert_eq!(out, vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
    }
}
