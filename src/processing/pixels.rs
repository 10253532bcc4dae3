// src/processing/pixels.rs
use ndarray::Array2;

use super::indices::{SpectralBands, SpectralIndices};
use super::table::FeatureTable;
use crate::error::Result;
use crate::layout::RowMajor;
use crate::raster::Grid;

/// Column names of the pixel feature table, in order.
pub const PIXEL_COLUMNS: [&str; 10] = [
    "red", "green", "blue", "nir", "ndvi", "evi", "savi", "ndwi", "sr", "gndvi",
];

/// Flatten raw bands and derived indices into one row per pixel.
///
/// Row `i` of the table is pixel `RowMajor::pixel(i, width)`.
pub fn assemble_pixel_table(bands: SpectralBands, indices: SpectralIndices) -> Result<FeatureTable> {
    let [ndvi, evi, savi, ndwi, sr, gndvi] = indices.into_columns();
    let grids: [&Grid; 10] = [
        &bands.red,
        &bands.green,
        &bands.blue,
        &bands.nir,
        &ndvi.1,
        &evi.1,
        &savi.1,
        &ndwi.1,
        &sr.1,
        &gndvi.1,
    ];

    let n_pixels = RowMajor::len(bands.shape());
    let mut data = Array2::<f64>::zeros((n_pixels, grids.len()));
    for (i, grid) in grids.iter().enumerate() {
        data.column_mut(i).assign(&grid.flat()?);
    }

    let names = PIXEL_COLUMNS.iter().map(|s| s.to_string()).collect();
    FeatureTable::from_parts(names, data)
}
