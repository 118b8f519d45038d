//! Array comparison primitives for tests.
//!
//! The comparison functions never print; they return every mismatch as a
//! structured [`ComparisonFailure`]. The [`assert_array_eq!`] and
//! [`assert_array_near!`] macros panic with its rendering.
//!
//! Operands may have different element types as long as both convert to
//! `f64` through [`ToPrimitive`], so an `NdArray<usize>` of indices compares
//! directly with an expected `NdArray<f64>`.
//!
//! [`assert_array_eq!`]: crate::assert_array_eq
//! [`assert_array_near!`]: crate::assert_array_near

use std::fmt;

use num_traits::ToPrimitive;

use crate::view::NdArray;

/// One reason two arrays failed to compare equal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayMismatch {
    #[error("shape mismatch: {left:?} vs {right:?}")]
    Shape { left: Vec<usize>, right: Vec<usize> },

    #[error("at {index:?}: {left} vs {right} (difference {diff})")]
    Value {
        index: Vec<usize>,
        left: f64,
        right: f64,
        diff: f64,
    },

    #[error("at {index:?}: non-finite value {value}")]
    NonFinite { index: Vec<usize>, value: f64 },
}

/// Every mismatch found by a comparison.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct ComparisonFailure {
    pub mismatches: Vec<ArrayMismatch>,
}

impl fmt::Display for ComparisonFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mismatching element(s)", self.mismatches.len())?;
        for m in &self.mismatches {
            write!(f, "\n  {}", m)?;
        }
        Ok(())
    }
}

fn unravel(mut flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut index = vec![0; dims.len()];
    for (slot, &d) in index.iter_mut().zip(dims).rev() {
        *slot = flat % d;
        flat /= d;
    }
    index
}

fn compare<A, B>(
    x: &NdArray<A>,
    y: &NdArray<B>,
    check: impl Fn(Vec<usize>, f64, f64) -> Option<ArrayMismatch>,
) -> Result<(), ComparisonFailure>
where
    A: ToPrimitive,
    B: ToPrimitive,
{
    if x.dims() != y.dims() {
        return Err(ComparisonFailure {
            mismatches: vec![ArrayMismatch::Shape {
                left: x.dims().to_vec(),
                right: y.dims().to_vec(),
            }],
        });
    }
    let mismatches: Vec<ArrayMismatch> = x
        .iter()
        .zip(y.iter())
        .enumerate()
        .filter_map(|(flat, (l, r))| {
            let l = l.to_f64().unwrap_or(f64::NAN);
            let r = r.to_f64().unwrap_or(f64::NAN);
            check(unravel(flat, x.dims()), l, r)
        })
        .collect();
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(ComparisonFailure { mismatches })
    }
}

/// Exact elementwise equality. Shapes must agree and every value on both
/// sides must be finite.
pub fn assert_array_equal<A, B>(x: &NdArray<A>, y: &NdArray<B>) -> Result<(), ComparisonFailure>
where
    A: ToPrimitive,
    B: ToPrimitive,
{
    compare(x, y, |index, l, r| {
        if !l.is_finite() {
            Some(ArrayMismatch::NonFinite { index, value: l })
        } else if !r.is_finite() {
            Some(ArrayMismatch::NonFinite { index, value: r })
        } else if l != r {
            Some(ArrayMismatch::Value {
                index,
                left: l,
                right: r,
                diff: (l - r).abs(),
            })
        } else {
            None
        }
    })
}

/// Elementwise `|x - y| <= eps`. A NaN on either side never matches.
pub fn assert_array_near<A, B>(
    x: &NdArray<A>,
    y: &NdArray<B>,
    eps: f64,
) -> Result<(), ComparisonFailure>
where
    A: ToPrimitive,
    B: ToPrimitive,
{
    compare(x, y, |index, l, r| {
        let diff = (l - r).abs();
        if diff <= eps {
            None
        } else {
            Some(ArrayMismatch::Value {
                index,
                left: l,
                right: r,
                diff,
            })
        }
    })
}

/// Panics unless two arrays are exactly equal (see [`assert_array_equal`]).
#[macro_export]
macro_rules! assert_array_eq {
    ($left:expr, $right:expr $(,)?) => {
        if let ::std::result::Result::Err(failure) =
            $crate::testing::assert_array_equal(&$left, &$right)
        {
            panic!("arrays are not equal: {}", failure);
        }
    };
}

/// Panics unless two arrays agree within `eps` (see [`assert_array_near`]).
#[macro_export]
macro_rules! assert_array_near {
    ($left:expr, $right:expr, $eps:expr $(,)?) => {
        if let ::std::result::Result::Err(failure) =
            $crate::testing::assert_array_near(&$left, &$right, $eps)
        {
            panic!("arrays are not within {}: {}", $eps, failure);
        }
    };
}
