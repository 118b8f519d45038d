//! Row-major strided N-dimensional arrays.
//!
//! This crate provides an owned, strided [`NdArray`] together with the numeric
//! routines usually expected from a small NumPy-like engine: construction from
//! nested literals, elementwise arithmetic with scalar broadcasting, shape
//! transforms, axis reductions, in-place sorting and dense 2-D linear algebra.
//!
//! # Core Types
//!
//! - [`NdArray`]: Owned row-major array (`dims`, `strides`, flat buffer)
//! - [`NdView`]: Borrowed strided view with zero-copy `permute`/`index_axis`/`broadcast`
//! - [`Operand`]: Scalar-or-array argument of binary elementwise operations
//! - [`Scalar`]: Element bound for numeric routines (`f64`, `f32`)
//!
//! # Primary API
//!
//! ## Construction
//!
//! - [`array`], [`matrix`], [`zeros`], [`ones`], [`full`], [`eye`], [`linspace`], [`copy`]
//!
//! ## Elementwise
//!
//! - [`map`], [`zip`]: unary / binary primitives
//! - [`add`], [`sub`], [`mul`], [`div`], [`power`], [`atan2`]: scalar-broadcastable
//! - [`sin`], [`cos`], [`exp`], [`log`], [`sqrt`], [`abs`], [`sign`], [`clip`], ...
//!
//! ## Shape Transforms
//!
//! - [`flatten`], [`reshape`], [`transpose`], [`squeeze`], [`expand_dims`]
//!
//! ## Reductions
//!
//! - [`max`], [`min`], [`sum`], [`mean`], [`var`], [`std()`](fn@std), [`argmax`], [`argmin`]
//!
//! ## Ordering
//!
//! - [`sort`] (in place), [`sorted`], [`argsort`], [`take_along_axis`]
//!
//! ## Linear Algebra
//!
//! - [`matmul`] / [`dot`], [`inv`], [`solve`], [`LuDecomposition`], [`decompose_lup`]
//!
//! # Example
//!
//! ```rust
//! use strided_ndarray::{array, inv, matmul, eye};
//!
//! let a = array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! let a_inv = inv(&a).unwrap().expect("matrix is not singular");
//! let id = matmul(&a, &a_inv).unwrap();
//! strided_ndarray::assert_array_near!(id, eye::<f64>(2, None), 1e-9);
//! ```

mod construct;
mod display;
mod element;
mod kernel;
pub mod linalg;
mod map;
mod nested;
mod reduce;
mod scalar;
mod shape;
mod sort;
pub mod testing;
mod transform;
pub mod view;

// ============================================================================
// Core types
// ============================================================================
pub use scalar::Scalar;
pub use view::{NdArray, NdView};

// ============================================================================
// Construction
// ============================================================================
pub use construct::{copy, eye, from_shape_vec, full, linspace, ones, zeros};
pub use nested::{array, matrix, Nested, NestedLiteral};

// ============================================================================
// Elementwise operations
// ============================================================================
pub use element::{
    abs, acos, add, arccos, arcsin, arctan, arctan2, asin, atan, atan2, clip, cos, div, divide,
    exp, log, log10, log2, mul, multiply, neg, power, sign, sin, sqrt, sub, subtract, tan,
    zip_operands, Operand,
};
pub use map::{copy_into, map, map_into, zip, zip_map2_into};

// ============================================================================
// Shape transforms and reductions
// ============================================================================
pub use reduce::{argmax, argmin, fold_axis, max, mean, min, reduce_axis, std, sum, var};
pub use shape::row_major_strides;
pub use transform::{expand_dims, flatten, reshape, squeeze, transpose};

// ============================================================================
// Ordering and linear algebra
// ============================================================================
pub use linalg::{decompose_lup, dot, inv, matmul, solve, LuDecomposition};
pub use sort::{argsort, sort, sorted, take_along_axis};

// ============================================================================
// Display configuration
// ============================================================================
pub use display::{DisplayArray, PrintOptions};
pub use testing::{assert_array_equal, assert_array_near, ArrayMismatch, ComparisonFailure};

// ============================================================================
// Constants
// ============================================================================

/// Number of fractional digits printed by `Display` when the formatter does
/// not request a precision.
pub const DEFAULT_PRINT_PRECISION: usize = 6;

// ============================================================================
// Error types
// ============================================================================

/// Coarse classification of [`NdArrayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operands have incompatible, non-broadcastable shapes.
    ShapeMismatch,
    /// An axis, rank or element count is invalid for the operation.
    Dimension,
    /// LU factorization met an exactly zero pivot.
    SingularMatrix,
}

/// Errors that can occur during array operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NdArrayError {
    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Axis list is not a permutation of `0..rank`.
    #[error("invalid permutation {0:?}")]
    InvalidPermutation(Vec<usize>),

    /// Target shape does not hold the same number of elements.
    #[error("cannot reshape array of size {size} into shape {shape:?}")]
    ReshapeSize { size: usize, shape: Vec<usize> },

    /// Squeezed axis does not have extent 1.
    #[error("cannot squeeze axis {axis} with extent {extent}")]
    SqueezeNonUnit { axis: usize, extent: usize },

    /// Operation requires a specific rank.
    #[error("expected a {expected}-dimensional array, found rank {found}")]
    Dimension { expected: usize, found: usize },

    /// Nested literal is a bare scalar.
    #[error("array input must be a (possibly nested) sequence")]
    NotASequence,

    /// Sibling sequences in a nested literal have different lengths.
    #[error("ragged nested sequence at depth {depth}: expected {expected} elements, found {found}")]
    Ragged {
        depth: usize,
        expected: usize,
        found: usize,
    },

    /// Buffer length doesn't match the product of the shape.
    #[error("data length {len} does not match shape {shape:?}")]
    DataLength { len: usize, shape: Vec<usize> },

    /// Reduction over an axis with no elements.
    #[error("cannot reduce over empty axis {axis}")]
    EmptyAxis { axis: usize },

    /// Matrix is not square when a square matrix was required.
    #[error("non-square matrix: rows={rows}, cols={cols}")]
    NonSquare { rows: usize, cols: usize },

    /// View would address memory outside its buffer.
    #[error("offset out of bounds while computing view")]
    OffsetOverflow,

    /// Pivot column has maximum magnitude exactly zero.
    #[error("singular matrix: zero pivot in column {column}")]
    SingularMatrix { column: usize },
}

impl NdArrayError {
    /// Classify the error into the three-way shape / dimension / singular taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NdArrayError::ShapeMismatch(..) | NdArrayError::RankMismatch(..) => {
                ErrorKind::ShapeMismatch
            }
            NdArrayError::SingularMatrix { .. } => ErrorKind::SingularMatrix,
            _ => ErrorKind::Dimension,
        }
    }
}

/// Result type for array operations.
pub type Result<T> = ::std::result::Result<T, NdArrayError>;
