//! Construction from nested literals.
//!
//! A literal is any tree of sequences whose leaves are scalars: fixed arrays,
//! slices, `Vec`s, or the runtime-built [`Nested`] enum. The shape is read
//! off the first-element chain and every sibling sequence must agree with it.

use crate::scalar::Scalar;
use crate::view::NdArray;
use crate::{NdArrayError, Result};

/// A node of a nested numeric literal.
pub trait NestedLiteral {
    /// Leaf element type.
    type Elem: Scalar;

    /// The value of a leaf node, `None` for a sequence.
    fn leaf(&self) -> Option<Self::Elem>;

    /// Child nodes of a sequence, in order. Leaves have none.
    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = Self::Elem>>;
}

macro_rules! impl_scalar_literal {
    ($($t:ty),*) => {$(
        impl NestedLiteral for $t {
            type Elem = $t;

            fn leaf(&self) -> Option<$t> {
                Some(*self)
            }

            fn children(&self) -> Vec<&dyn NestedLiteral<Elem = $t>> {
                Vec::new()
            }
        }
    )*};
}

impl_scalar_literal!(f32, f64);

impl<U: NestedLiteral> NestedLiteral for [U] {
    type Elem = U::Elem;

    fn leaf(&self) -> Option<U::Elem> {
        None
    }

    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = U::Elem>> {
        self.iter()
            .map(|c| c as &dyn NestedLiteral<Elem = U::Elem>)
            .collect()
    }
}

impl<U: NestedLiteral, const N: usize> NestedLiteral for [U; N] {
    type Elem = U::Elem;

    fn leaf(&self) -> Option<U::Elem> {
        None
    }

    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = U::Elem>> {
        self.as_slice().children()
    }
}

impl<U: NestedLiteral> NestedLiteral for Vec<U> {
    type Elem = U::Elem;

    fn leaf(&self) -> Option<U::Elem> {
        None
    }

    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = U::Elem>> {
        self.as_slice().children()
    }
}

/// Dynamically nested literal, for shapes only known at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(T),
    Seq(Vec<Nested<T>>),
}

impl<T: Scalar> NestedLiteral for Nested<T> {
    type Elem = T;

    fn leaf(&self) -> Option<T> {
        match self {
            Nested::Leaf(v) => Some(*v),
            Nested::Seq(_) => None,
        }
    }

    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = T>> {
        match self {
            Nested::Leaf(_) => Vec::new(),
            Nested::Seq(items) => items.children(),
        }
    }
}

/// Infer the shape from the chain of first elements.
fn infer_shape<E: Scalar>(root: &dyn NestedLiteral<Elem = E>) -> Result<Vec<usize>> {
    if root.leaf().is_some() {
        return Err(NdArrayError::NotASequence);
    }
    let mut dims = Vec::new();
    let mut node = root;
    loop {
        let children = node.children();
        dims.push(children.len());
        match children.first() {
            Some(&first) if first.leaf().is_none() => node = first,
            _ => break,
        }
    }
    Ok(dims)
}

/// Build an array from a nested literal, copying values into owned storage.
///
/// # Errors
/// - [`NdArrayError::NotASequence`] if the literal is a bare scalar.
/// - [`NdArrayError::Ragged`] if sibling sequences differ in length or depth.
///
/// # Example
/// ```rust
/// use strided_ndarray::array;
///
/// let a = array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(a.dims(), &[2, 3]);
/// ```
pub fn array<L>(literal: &L) -> Result<NdArray<L::Elem>>
where
    L: NestedLiteral + ?Sized,
{
    let root: &dyn NestedLiteral<Elem = L::Elem> = &Wrapped(literal);
    let dims = infer_shape(root)?;
    let rank = dims.len();
    let mut data = Vec::with_capacity(dims.iter().product());

    // depth-first, children pushed in reverse so leaves pop in row-major order
    let mut worklist = vec![(root, 0usize)];
    while let Some((node, depth)) = worklist.pop() {
        if depth == rank {
            match node.leaf() {
                Some(value) => data.push(value),
                None => {
                    return Err(NdArrayError::Ragged {
                        depth,
                        expected: 0,
                        found: node.children().len(),
                    })
                }
            }
            continue;
        }
        let children = node.children();
        if node.leaf().is_some() || children.len() != dims[depth] {
            return Err(NdArrayError::Ragged {
                depth,
                expected: dims[depth],
                found: children.len(),
            });
        }
        worklist.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
    Ok(NdArray::from_dense(data, &dims))
}

/// Like [`array`], but the literal must describe a rank-2 array.
///
/// # Errors
/// Returns [`NdArrayError::Dimension`] for any other rank.
pub fn matrix<L>(literal: &L) -> Result<NdArray<L::Elem>>
where
    L: NestedLiteral + ?Sized,
{
    let a = array(literal)?;
    if a.ndim() != 2 {
        return Err(NdArrayError::Dimension {
            expected: 2,
            found: a.ndim(),
        });
    }
    Ok(a)
}

/// Sized adapter so unsized literals (`[U]`) can be viewed as trait objects.
struct Wrapped<'a, L: ?Sized>(&'a L);

impl<L: NestedLiteral + ?Sized> NestedLiteral for Wrapped<'_, L> {
    type Elem = L::Elem;

    fn leaf(&self) -> Option<L::Elem> {
        self.0.leaf()
    }

    fn children(&self) -> Vec<&dyn NestedLiteral<Elem = L::Elem>> {
        self.0.children()
    }
}
