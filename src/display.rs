//! Text rendering of arrays.
//!
//! ```text
//! ndarray(
//! [[1.000000,2.000000],
//! [3.000000,4.000000]]
//! )
//! ```
//!
//! Leaves of the last axis are separated by `,`; sub-arrays of outer axes by
//! `,` and a newline.

use std::fmt;

use crate::view::NdArray;
use crate::DEFAULT_PRINT_PRECISION;

/// Rendering options for [`NdArray::display_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Fractional digits printed for each element.
    pub precision: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRINT_PRECISION,
        }
    }
}

/// Display adapter returned by [`NdArray::display_with`].
pub struct DisplayArray<'a, T> {
    array: &'a NdArray<T>,
    options: PrintOptions,
}

impl<T> NdArray<T> {
    /// Render with explicit options instead of the formatter's precision.
    pub fn display_with(&self, options: PrintOptions) -> DisplayArray<'_, T> {
        DisplayArray {
            array: self,
            options,
        }
    }
}

fn write_level<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    a: &NdArray<T>,
    depth: usize,
    offset: usize,
    precision: usize,
) -> fmt::Result {
    let dims = a.dims();
    if depth == dims.len() {
        return write!(f, "{:.*}", precision, a.data()[offset]);
    }
    let stride = a.strides()[depth] as usize;
    let last = depth + 1 == dims.len();
    f.write_str("[")?;
    for i in 0..dims[depth] {
        if i > 0 {
            f.write_str(if last { "," } else { ",\n" })?;
        }
        write_level(f, a, depth + 1, offset + i * stride, precision)?;
    }
    f.write_str("]")
}

fn write_array<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    a: &NdArray<T>,
    precision: usize,
) -> fmt::Result {
    f.write_str("ndarray(\n")?;
    write_level(f, a, 0, 0, precision)?;
    f.write_str("\n)")
}

impl<T: fmt::Display> fmt::Display for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRINT_PRECISION);
        write_array(f, self, precision)
    }
}

impl<T: fmt::Display> fmt::Display for DisplayArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_array(f, self.array, self.options.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::zeros;
    use crate::nested::array;

    #[test]
    fn test_display_zeros_221() {
        let a = zeros::<f64>(&[2, 2, 1]);
        assert_eq!(
            a.to_string(),
            "ndarray(\n[[[0.000000],\n[0.000000]],\n[[0.000000],\n[0.000000]]]\n)"
        );
    }

    #[test]
    fn test_display_precision() {
        let a = array(&[[1.0, 2.5], [3.0, 4.3]]).unwrap();
        assert_eq!(format!("{:.2}", a), "ndarray(\n[[1.00,2.50],\n[3.00,4.30]]\n)");
        assert_eq!(
            a.display_with(PrintOptions { precision: 1 }).to_string(),
            "ndarray(\n[[1.0,2.5],\n[3.0,4.3]]\n)"
        );
    }

    #[test]
    fn test_display_rank0_and_empty() {
        assert_eq!(NdArray::scalar(1.5).to_string(), "ndarray(\n1.500000\n)");
        let empty = zeros::<f64>(&[0]);
        assert_eq!(empty.to_string(), "ndarray(\n[]\n)");
    }
}
