//! Elementwise arithmetic and transcendental functions.
//!
//! Binary operations take [`Operand`]s so that either side may be a plain
//! scalar. A scalar is broadcast through a zero-stride view of a one-element
//! buffer; arrays on both sides must have identical shapes.

use crate::map::{map, zip, zip_map2_into};
use crate::scalar::Scalar;
use crate::view::{NdArray, NdView};
use crate::Result;

/// Scalar-or-array argument of a binary elementwise operation.
#[derive(Debug)]
pub enum Operand<'a, T> {
    Scalar(T),
    Array(&'a NdArray<T>),
}

impl<T: Copy> Clone for Operand<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy> Copy for Operand<'_, T> {}

impl<'a, T> From<&'a NdArray<T>> for Operand<'a, T> {
    fn from(a: &'a NdArray<T>) -> Self {
        Operand::Array(a)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {$(
        impl From<$t> for Operand<'_, $t> {
            fn from(value: $t) -> Self {
                Operand::Scalar(value)
            }
        }
    )*};
}

impl_operand_from_scalar!(f32, f64);

/// Apply `f` pairwise, broadcasting a scalar side to the other side's shape.
///
/// Two scalars produce a rank-0 array.
///
/// # Errors
/// Returns [`crate::NdArrayError::ShapeMismatch`] if both sides are arrays
/// of different shapes.
pub fn zip_operands<'a, 'b, T, U>(
    a: impl Into<Operand<'a, T>>,
    b: impl Into<Operand<'b, T>>,
    f: impl Fn(T, T) -> U,
) -> Result<NdArray<U>>
where
    T: Scalar,
{
    match (a.into(), b.into()) {
        (Operand::Scalar(x), Operand::Scalar(y)) => Ok(NdArray::scalar(f(x, y))),
        (Operand::Array(a), Operand::Array(b)) => zip(a, b, f),
        (Operand::Array(a), Operand::Scalar(y)) => {
            let cell = [y];
            let sv = scalar_view(&cell, a.dims())?;
            let mut data = Vec::new();
            zip_map2_into(&mut data, &a.view(), &sv, f)?;
            Ok(NdArray::from_dense(data, a.dims()))
        }
        (Operand::Scalar(x), Operand::Array(b)) => {
            let cell = [x];
            let sv = scalar_view(&cell, b.dims())?;
            let mut data = Vec::new();
            zip_map2_into(&mut data, &sv, &b.view(), f)?;
            Ok(NdArray::from_dense(data, b.dims()))
        }
    }
}

fn scalar_view<'a, T>(cell: &'a [T; 1], dims: &[usize]) -> Result<NdView<'a, T>> {
    NdView::new(cell, &[], &[], 0)?.broadcast(dims)
}

macro_rules! binary_ops {
    ($($(#[$meta:meta])* $name:ident => |$x:ident, $y:ident| $body:expr;)*) => {$(
        $(#[$meta])*
        pub fn $name<'a, 'b, T: Scalar>(
            a: impl Into<Operand<'a, T>>,
            b: impl Into<Operand<'b, T>>,
        ) -> Result<NdArray<T>> {
            zip_operands(a, b, |$x: T, $y: T| $body)
        }
    )*};
}

binary_ops! {
    /// Elementwise `a + b`.
    add => |x, y| x + y;
    /// Elementwise `a - b`.
    sub => |x, y| x - y;
    /// Elementwise `a * b`.
    mul => |x, y| x * y;
    /// Elementwise `a / b`.
    div => |x, y| x / y;
    /// Elementwise `a ^ b`.
    power => |x, y| x.powf(y);
    /// Elementwise four-quadrant arctangent of `a / b`.
    atan2 => |x, y| x.atan2(y);
}

/// Alias of [`sub`].
pub fn subtract<'a, 'b, T: Scalar>(
    a: impl Into<Operand<'a, T>>,
    b: impl Into<Operand<'b, T>>,
) -> Result<NdArray<T>> {
    sub(a, b)
}

/// Alias of [`mul`].
pub fn multiply<'a, 'b, T: Scalar>(
    a: impl Into<Operand<'a, T>>,
    b: impl Into<Operand<'b, T>>,
) -> Result<NdArray<T>> {
    mul(a, b)
}

/// Alias of [`div`].
pub fn divide<'a, 'b, T: Scalar>(
    a: impl Into<Operand<'a, T>>,
    b: impl Into<Operand<'b, T>>,
) -> Result<NdArray<T>> {
    div(a, b)
}

/// Alias of [`atan2`].
pub fn arctan2<'a, 'b, T: Scalar>(
    a: impl Into<Operand<'a, T>>,
    b: impl Into<Operand<'b, T>>,
) -> Result<NdArray<T>> {
    atan2(a, b)
}

macro_rules! unary_ops {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        pub fn $name<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
            map(a, |x: T| x.$method())
        }
    )*};
}

unary_ops! {
    sin => sin;
    cos => cos;
    tan => tan;
    asin => asin;
    acos => acos;
    atan => atan;
    exp => exp;
    /// Natural logarithm.
    log => ln;
    log2 => log2;
    log10 => log10;
    sqrt => sqrt;
    abs => abs;
}

/// Elementwise negation.
pub fn neg<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
    map(a, |x: T| -x)
}

/// Alias of [`asin`].
pub fn arcsin<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
    asin(a)
}

/// Alias of [`acos`].
pub fn arccos<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
    acos(a)
}

/// Alias of [`atan`].
pub fn arctan<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
    atan(a)
}

/// `-1`, `0` or `1` according to the sign of each element; NaN stays NaN.
pub fn sign<T: Scalar>(a: &NdArray<T>) -> NdArray<T> {
    map(a, |x: T| {
        if x > T::zero() {
            T::one()
        } else if x < T::zero() {
            -T::one()
        } else {
            x * T::zero()
        }
    })
}

/// Limit every element to `[min, max]`; an absent bound is not applied.
pub fn clip<T: Scalar>(a: &NdArray<T>, min: Option<T>, max: Option<T>) -> NdArray<T> {
    map(a, |mut x: T| {
        if let Some(lo) = min {
            if x < lo {
                x = lo;
            }
        }
        if let Some(hi) = max {
            if x > hi {
                x = hi;
            }
        }
        x
    })
}
