// src/processing/score.rs
use super::reconcile::FeatureMatrix;
use crate::error::{FireError, Result};
use crate::layout::RowMajor;
use crate::model::Classifier;
use crate::raster::Grid;

/// Score every row of `matrix` and reshape the positive-class probabilities
/// to the raster's `(height, width)`.
pub fn score<C: Classifier + ?Sized>(
    classifier: &C,
    matrix: &FeatureMatrix,
    shape: (usize, usize),
) -> Result<Grid> {
    let expected = RowMajor::len(shape);
    if matrix.n_rows() != expected {
        return Err(FireError::ShapeMismatch {
            expected,
            actual: matrix.n_rows(),
        });
    }

    let probabilities = classifier.predict_proba(matrix)?;
    log::debug!(
        "Scored {} pixels against {} features",
        probabilities.len(),
        matrix.n_cols()
    );

    Ok(Grid::from_array(RowMajor::reshape(probabilities, shape)?))
}
