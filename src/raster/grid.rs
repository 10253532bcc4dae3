// src/raster/grid.rs
use ndarray::{Array2, ArrayView1};

use crate::error::{FireError, Result};
use crate::layout::RowMajor;

/// A 2-D `f64` grid indexed `[[row, col]]`.
///
/// Used for band arrays, spectral index arrays and the probability grid. The
/// array is always kept in standard layout so it can be flattened in
/// [`RowMajor`] order without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Array2<f64>,
}

impl Grid {
    /// Wrap row-major `data` as a `(height, width)` grid.
    pub fn new(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let expected = RowMajor::len(shape);
        if data.len() != expected {
            return Err(FireError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: RowMajor::reshape(data, shape)?,
        })
    }

    pub fn filled(shape: (usize, usize), value: f64) -> Self {
        Self {
            data: Array2::from_elem(shape, value),
        }
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new((height, width), data)
    }

    pub fn from_array(data: Array2<f64>) -> Self {
        if data.is_standard_layout() {
            Self { data }
        } else {
            Self {
                data: data.as_standard_layout().into_owned(),
            }
        }
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// One value per pixel in scan order.
    pub fn flat(&self) -> Result<ArrayView1<'_, f64>> {
        RowMajor::flatten(&self.data)
    }

    /// Flattened values in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Iterate `(row, col, value)` in row-major scan order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .indexed_iter()
            .map(|((row, col), &value)| (row, col, value))
    }
}
