//! Scalar type bounds for numeric array operations.

use num_traits::Float;

/// Shared trait bounds for element types usable with the numeric routines.
///
/// Storage may be single or double precision, but matmul, variance and LU
/// accumulate through [`Scalar::widen`] in `f64` and convert back with
/// [`Scalar::narrow`].
pub trait Scalar:
    Float + Default + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Convert to `f64` without loss.
    fn widen(self) -> f64;

    /// Convert from `f64`, rounding to the storage precision.
    fn narrow(value: f64) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value
    }
}

impl Scalar for f32 {
    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value as f32
    }
}
