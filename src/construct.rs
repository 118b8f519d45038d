//! Array factories.

use crate::scalar::Scalar;
use crate::shape::total_len;
use crate::view::NdArray;
use crate::Result;

/// New array of the given shape filled with `value`.
pub fn full<T: Clone>(dims: &[usize], value: T) -> NdArray<T> {
    NdArray::from_dense(vec![value; total_len(dims)], dims)
}

/// New array of the given shape filled with zeros.
pub fn zeros<T: Scalar>(dims: &[usize]) -> NdArray<T> {
    full(dims, T::zero())
}

/// New array of the given shape filled with ones.
pub fn ones<T: Scalar>(dims: &[usize]) -> NdArray<T> {
    full(dims, T::one())
}

/// `n x m` array with ones on the main diagonal; `m` defaults to `n`.
pub fn eye<T: Scalar>(n: usize, m: Option<usize>) -> NdArray<T> {
    let m = m.unwrap_or(n);
    let mut out = zeros(&[n, m]);
    for i in 0..n.min(m) {
        out[[i, i]] = T::one();
    }
    out
}

/// Deep copy with an independent buffer.
pub fn copy<T: Clone>(a: &NdArray<T>) -> NdArray<T> {
    a.clone()
}

/// `num` evenly spaced samples over `[start, stop]`, endpoints included.
pub fn linspace<T: Scalar>(start: T, stop: T, num: usize) -> NdArray<T> {
    let data: Vec<T> = match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (lo, hi) = (start.widen(), stop.widen());
            let step = (hi - lo) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i + 1 == num {
                        stop
                    } else {
                        T::narrow(lo + step * i as f64)
                    }
                })
                .collect()
        }
    };
    NdArray::from_dense(data, &[num])
}

/// Wrap a row-major buffer in an array of the given shape.
///
/// # Errors
/// Returns [`crate::NdArrayError::DataLength`] if the lengths disagree.
pub fn from_shape_vec<T>(dims: &[usize], data: Vec<T>) -> Result<NdArray<T>> {
    NdArray::from_shape_vec(dims, data)
}
