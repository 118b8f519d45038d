//! Dense linear algebra: batched matrix product and LU-based inverse/solve.
//!
//! # Key functions
//!
//! - [`matmul`]: contraction of the last axis of `a` with the second-to-last
//!   axis of `b`, batched over leading axes
//! - [`LuDecomposition`]: `P·A = L·U` with partial (row) pivoting
//! - [`inv`], [`solve`]: built on the factorization; a singular matrix yields
//!   `Ok(None)`
//!
//! All accumulation happens in `f64` regardless of the storage type.

use crate::kernel::for_each_offset;
use crate::scalar::Scalar;
use crate::shape::row_major_strides;
use crate::view::NdArray;
use crate::{NdArrayError, Result};

// ============================================================================
// Matrix product
// ============================================================================

fn require_rank_at_least<T>(a: &NdArray<T>, rank: usize) -> Result<()> {
    if a.ndim() < rank {
        return Err(NdArrayError::Dimension {
            expected: rank,
            found: a.ndim(),
        });
    }
    Ok(())
}

/// Matrix product over the last two axes, batched over the leading axes.
///
/// `a[..., m, k] · b[..., k, n] -> out[..., m, n]`. The leading axes of `a`
/// and `b` must match, unless `b` is rank 2, in which case it is shared by
/// every batch of `a`.
///
/// # Errors
/// - [`NdArrayError::Dimension`] if either operand has rank below 2.
/// - [`NdArrayError::ShapeMismatch`] if the contracted extents or the batch
///   axes disagree.
pub fn matmul<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>> {
    require_rank_at_least(a, 2)?;
    require_rank_at_least(b, 2)?;
    let (ra, rb) = (a.ndim(), b.ndim());
    let (m, k) = (a.dims()[ra - 2], a.dims()[ra - 1]);
    let (kb, n) = (b.dims()[rb - 2], b.dims()[rb - 1]);
    let shared_b = rb == 2;
    if k != kb || (!shared_b && a.dims()[..ra - 2] != b.dims()[..rb - 2]) {
        return Err(NdArrayError::ShapeMismatch(
            a.dims().to_vec(),
            b.dims().to_vec(),
        ));
    }

    let mut out_dims = a.dims().to_vec();
    out_dims[ra - 1] = n;
    let out_strides = row_major_strides(&out_dims);
    let batch_dims = &a.dims()[..ra - 2];
    let a_batch = &a.strides()[..ra - 2];
    let b_batch: Vec<isize> = if shared_b {
        vec![0; ra - 2]
    } else {
        b.strides()[..rb - 2].to_vec()
    };
    let out_batch = &out_strides[..ra - 2];

    let (ad, bd) = (a.data(), b.data());
    let mut out = vec![T::zero(); out_dims.iter().product()];
    for_each_offset(batch_dims, &[a_batch, &b_batch[..], out_batch], |offsets| {
        let (ao, bo, oo) = (
            offsets[0] as usize,
            offsets[1] as usize,
            offsets[2] as usize,
        );
        for i in 0..m {
            for j in 0..n {
                let mut acc = 0.0f64;
                for p in 0..k {
                    acc += ad[ao + i * k + p].widen() * bd[bo + p * n + j].widen();
                }
                out[oo + i * n + j] = T::narrow(acc);
            }
        }
    });
    Ok(NdArray::from_dense(out, &out_dims))
}

/// Alias of [`matmul`].
pub fn dot<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>> {
    matmul(a, b)
}

// ============================================================================
// LU decomposition
// ============================================================================

/// Side length of a square rank-2 array.
fn square_side<T>(a: &NdArray<T>) -> Result<usize> {
    if a.ndim() != 2 {
        return Err(NdArrayError::Dimension {
            expected: 2,
            found: a.ndim(),
        });
    }
    let (rows, cols) = (a.dims()[0], a.dims()[1]);
    if rows != cols {
        return Err(NdArrayError::NonSquare { rows, cols });
    }
    Ok(rows)
}

/// In-place partial-pivoting LU of a row-major `n x n` buffer.
///
/// On a zero pivot the column index is returned and `lu`/`perm` are left
/// partially factored.
fn factor(lu: &mut [f64], perm: &mut [usize], n: usize) -> std::result::Result<(), usize> {
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    for k in 0..n {
        let mut pivot = k;
        let mut best = lu[k * n + k].abs();
        for i in k + 1..n {
            let v = lu[i * n + k].abs();
            if v > best {
                best = v;
                pivot = i;
            }
        }
        if best == 0.0 {
            log::debug!("LU factorization: zero pivot in column {} of {}x{}", k, n, n);
            return Err(k);
        }
        if pivot != k {
            for j in 0..n {
                lu.swap(k * n + j, pivot * n + j);
            }
            perm.swap(k, pivot);
        }
        let diag = lu[k * n + k];
        for i in k + 1..n {
            let mult = lu[i * n + k] / diag;
            lu[i * n + k] = mult;
            for j in k + 1..n {
                lu[i * n + j] -= mult * lu[k * n + j];
            }
        }
    }
    Ok(())
}

/// Factor a square matrix in place as `P·A = L·U`.
///
/// `perm` receives the row permutation (`perm[i]` is the original row now at
/// position `i`); `lu` receives the unit-lower multipliers below the diagonal
/// and `U` on and above it. Returns `Ok(false)` if a pivot column is exactly
/// zero, in which case the contents are unspecified.
///
/// # Errors
/// - [`NdArrayError::Dimension`] / [`NdArrayError::NonSquare`] if `lu` is not
///   a square matrix.
/// - [`NdArrayError::ShapeMismatch`] if `perm.len()` differs from its side.
pub fn decompose_lup<T: Scalar>(perm: &mut [usize], lu: &mut NdArray<T>) -> Result<bool> {
    let n = square_side(lu)?;
    if perm.len() != n {
        return Err(NdArrayError::ShapeMismatch(vec![perm.len()], vec![n]));
    }
    let mut work: Vec<f64> = lu.iter().map(|x| x.widen()).collect();
    let ok = factor(&mut work, perm, n).is_ok();
    for (dst, &src) in lu.iter_mut().zip(&work) {
        *dst = T::narrow(src);
    }
    Ok(ok)
}

/// LU factorization with partial pivoting, held in double precision.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Vec<f64>,
    perm: Vec<usize>,
    n: usize,
}

impl LuDecomposition {
    /// Factor a square matrix.
    ///
    /// # Errors
    /// - [`NdArrayError::SingularMatrix`] if a pivot column is exactly zero.
    /// - [`NdArrayError::Dimension`] / [`NdArrayError::NonSquare`] for
    ///   non-square input.
    pub fn new<T: Scalar>(a: &NdArray<T>) -> Result<Self> {
        let n = square_side(a)?;
        let mut lu: Vec<f64> = a.iter().map(|x| x.widen()).collect();
        let mut perm = vec![0; n];
        factor(&mut lu, &mut perm, n).map_err(|column| NdArrayError::SingularMatrix { column })?;
        Ok(Self { lu, perm, n })
    }

    /// Side length of the factored matrix.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Row permutation: `perm()[i]` is the original row at position `i`.
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// Unit lower-triangular factor `L`.
    pub fn lower(&self) -> NdArray<f64> {
        let n = self.n;
        NdArray::from_fn(&[n, n], |idx| match idx[0].cmp(&idx[1]) {
            std::cmp::Ordering::Greater => self.lu[idx[0] * n + idx[1]],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }

    /// Upper-triangular factor `U`.
    pub fn upper(&self) -> NdArray<f64> {
        let n = self.n;
        NdArray::from_fn(&[n, n], |idx| {
            if idx[0] <= idx[1] {
                self.lu[idx[0] * n + idx[1]]
            } else {
                0.0
            }
        })
    }

    /// Solve `A·x = rhs` for one right-hand side of length `n`.
    ///
    /// # Panics
    /// Panics if `rhs.len() != n`.
    pub fn solve_column(&self, rhs: &[f64]) -> Vec<f64> {
        let n = self.n;
        assert_eq!(rhs.len(), n, "right-hand side length must match matrix size");
        let lu = &self.lu;

        // forward substitution with the row permutation applied to rhs
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut acc = rhs[self.perm[i]];
            for j in 0..i {
                acc -= lu[i * n + j] * y[j];
            }
            y[i] = acc;
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut acc = y[i];
            for j in i + 1..n {
                acc -= lu[i * n + j] * x[j];
            }
            x[i] = acc / lu[i * n + i];
        }
        x
    }
}

/// Factor `a`, mapping a singular matrix to `None`.
fn factor_or_none<T: Scalar>(a: &NdArray<T>) -> Result<Option<LuDecomposition>> {
    match LuDecomposition::new(a) {
        Ok(lu) => Ok(Some(lu)),
        Err(NdArrayError::SingularMatrix { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Inverse of a square matrix, or `None` if it is singular.
///
/// # Errors
/// Returns [`NdArrayError::Dimension`] / [`NdArrayError::NonSquare`] for
/// non-square input.
pub fn inv<T: Scalar>(a: &NdArray<T>) -> Result<Option<NdArray<T>>> {
    let Some(lu) = factor_or_none(a)? else {
        return Ok(None);
    };
    let n = lu.size();
    let mut out = vec![T::zero(); n * n];
    let mut basis = vec![0.0; n];
    for c in 0..n {
        basis[c] = 1.0;
        let x = lu.solve_column(&basis);
        basis[c] = 0.0;
        for (r, v) in x.into_iter().enumerate() {
            out[r * n + c] = T::narrow(v);
        }
    }
    Ok(Some(NdArray::from_dense(out, &[n, n])))
}

/// Solve `a·x = b`, or `None` if `a` is singular.
///
/// `b` is either a vector of shape `[n]` or a matrix of shape `[n, k]`, in
/// which case every column is solved and `x` has shape `[n, k]`.
///
/// # Errors
/// - [`NdArrayError::Dimension`] / [`NdArrayError::NonSquare`] for non-square `a`.
/// - [`NdArrayError::ShapeMismatch`] if `b` does not have `n` rows.
pub fn solve<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<Option<NdArray<T>>> {
    let n = square_side(a)?;
    let cols = match b.dims() {
        [rows] if *rows == n => 1,
        [rows, k] if *rows == n => *k,
        _ => {
            return Err(NdArrayError::ShapeMismatch(
                a.dims().to_vec(),
                b.dims().to_vec(),
            ))
        }
    };
    let Some(lu) = factor_or_none(a)? else {
        return Ok(None);
    };
    let bd = b.data();
    let mut out = vec![T::zero(); n * cols];
    let mut rhs = vec![0.0; n];
    for c in 0..cols {
        for (r, slot) in rhs.iter_mut().enumerate() {
            *slot = bd[r * cols + c].widen();
        }
        for (r, v) in lu.solve_column(&rhs).into_iter().enumerate() {
            out[r * cols + c] = T::narrow(v);
        }
    }
    Ok(Some(NdArray::from_dense(out, b.dims())))
}
