// src/processing/reconcile.rs
use ndarray::{Array1, Array2, ArrayView1};

use super::aggregate::SummaryVector;
use super::table::FeatureTable;
use crate::error::{FireError, Result};
use crate::model::FeatureSchema;

/// Value placed in schema columns that no input provides.
pub const MISSING_MARKER: f64 = f64::NAN;

/// Feature matrix whose columns are exactly a classifier schema, in order.
///
/// One row per pixel, one column per schema name.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    data: Array2<f64>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, f64> {
        self.data.column(col)
    }

    pub fn column_by_name(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.data.column(i))
    }

    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }
}

/// Tile `summary` across every row of `pixels` and append it after the pixel
/// columns.
pub fn broadcast_summary(mut pixels: FeatureTable, summary: &SummaryVector) -> Result<FeatureTable> {
    let names: Vec<String> = summary.entries().iter().map(|(n, _)| n.clone()).collect();
    let values: Array1<f64> = summary.entries().iter().map(|(_, v)| *v).collect();
    let shape = (pixels.n_rows(), values.len());
    let block = values
        .broadcast(shape)
        .ok_or(FireError::ShapeMismatch {
            expected: values.len(),
            actual: shape.1,
        })?;
    pixels.append(names, block)?;
    Ok(pixels)
}

/// Select and order the columns of `table` to match `schema` exactly.
///
/// Schema columns absent from `table` are filled with [`MISSING_MARKER`];
/// table columns absent from the schema are dropped. When `table` holds two
/// columns with the same name the first one wins.
pub fn reconcile(table: FeatureTable, schema: &FeatureSchema) -> Result<FeatureMatrix> {
    if schema.is_empty() {
        return Err(FireError::SchemaMismatch(
            "classifier declares no feature names".to_string(),
        ));
    }

    let mut data = Array2::from_elem((table.n_rows(), schema.len()), MISSING_MARKER);
    let mut used = vec![false; table.n_cols()];
    let mut missing = Vec::new();

    for (col, name) in schema.names().iter().enumerate() {
        match table.position(name) {
            Some(source) => {
                data.column_mut(col).assign(&table.data().column(source));
                used[source] = true;
            }
            None => missing.push(name.as_str()),
        }
    }

    if !missing.is_empty() {
        log::debug!(
            "Filled {} schema columns absent from the inputs: {:?}",
            missing.len(),
            missing
        );
    }
    let dropped = used.iter().filter(|&&u| !u).count();
    if dropped > 0 {
        log::debug!("Dropped {} columns not in the classifier schema", dropped);
    }

    Ok(FeatureMatrix {
        names: schema.names().to_vec(),
        data,
    })
}

/// Broadcast the summary over the pixel table, then reconcile against `schema`.
pub fn assemble_features(
    pixels: FeatureTable,
    summary: &SummaryVector,
    schema: &FeatureSchema,
) -> Result<FeatureMatrix> {
    reconcile(broadcast_summary(pixels, summary)?, schema)
}
