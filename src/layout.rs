// src/layout.rs
//! Pixel ordering shared by every stage that flattens or reshapes a grid.
//!
//! Flat position `i` is pixel `(i / width, i % width)`: row 0 left to right,
//! then row 1, and so on. This is ndarray's standard (C) layout for an
//! `Array2` indexed `[[row, col]]`. The raster reader, the feature tables,
//! the scorer and the point emitter all go through [`RowMajor`] so the pixel
//! to probability mapping cannot drift between stages.

use ndarray::{Array2, ArrayView1};

use crate::error::Result;

/// Row-major, row 0 first.
pub struct RowMajor;

impl RowMajor {
    /// Flat index of `(row, col)` in a grid `width` pixels wide.
    #[inline]
    pub const fn index(row: usize, col: usize, width: usize) -> usize {
        row * width + col
    }

    /// `(row, col)` of flat index `index` in a grid `width` pixels wide.
    #[inline]
    pub const fn pixel(index: usize, width: usize) -> (usize, usize) {
        (index / width, index % width)
    }

    /// Number of cells in a `(height, width)` grid.
    #[inline]
    pub const fn len(shape: (usize, usize)) -> usize {
        shape.0 * shape.1
    }

    /// View `array` as one value per pixel in scan order.
    ///
    /// Fails for arrays that are not in standard layout.
    pub fn flatten(array: &Array2<f64>) -> Result<ArrayView1<'_, f64>> {
        let len = Self::len(array.dim());
        Ok(array.view().into_shape(len)?)
    }

    /// Lay `values` out as a `(height, width)` array, row 0 first.
    pub fn reshape(values: Vec<f64>, shape: (usize, usize)) -> Result<Array2<f64>> {
        Ok(Array2::from_shape_vec(shape, values)?)
    }
}
