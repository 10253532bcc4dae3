// src/processing/table.rs
use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{FireError, Result};

/// Named `f64` columns over a fixed number of rows.
///
/// Row `i` of every column belongs to the same pixel and no operation here
/// reorders rows. Backed by one `(n_rows, n_cols)` array.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    data: Array2<f64>,
}

impl FeatureTable {
    pub fn new(n_rows: usize) -> Self {
        Self {
            names: Vec::new(),
            data: Array2::zeros((n_rows, 0)),
        }
    }

    /// Wrap `data` with one name per column.
    pub fn from_parts(names: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(FireError::ShapeMismatch {
                expected: data.ncols(),
                actual: names.len(),
            });
        }
        Ok(Self { names, data })
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// First column called `name`.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.position(name).map(|i| self.data.column(i))
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Append a column. Its length must equal the table's row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.n_rows() {
            return Err(FireError::ShapeMismatch {
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        self.data.push_column(Array1::from(values).view())?;
        self.names.push(name.into());
        Ok(())
    }

    /// Append `block` (one column per name) after the existing columns.
    pub fn append(&mut self, names: Vec<String>, block: ArrayView2<'_, f64>) -> Result<()> {
        if block.nrows() != self.n_rows() {
            return Err(FireError::ShapeMismatch {
                expected: self.n_rows(),
                actual: block.nrows(),
            });
        }
        if names.len() != block.ncols() {
            return Err(FireError::ShapeMismatch {
                expected: block.ncols(),
                actual: names.len(),
            });
        }
        let joined = concatenate(Axis(1), &[self.data.view(), block.view()])?;
        self.data = joined;
        self.names.extend(names);
        Ok(())
    }

    /// Append every column of `other` after the existing ones.
    pub fn hconcat(&mut self, other: FeatureTable) -> Result<()> {
        self.append(other.names, other.data.view())
    }

    /// Rows in pixel order.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.outer_iter()
    }
}
