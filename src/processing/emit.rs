// src/processing/emit.rs
use crate::geojson::DetectionPoint;
use crate::raster::{GeoTransform, Grid};

/// Report every pixel whose probability is strictly above `threshold`.
///
/// Pixels are scanned row by row, left to right, and points come out in that
/// order. NaN probabilities never pass the threshold.
pub fn emit_points(
    probabilities: &Grid,
    transform: &GeoTransform,
    threshold: f64,
) -> Vec<DetectionPoint> {
    probabilities
        .indexed_iter()
        .filter(|&(_, _, p)| p > threshold)
        .map(|(row, col, probability)| {
            let (x, y) = transform.pixel_to_geo(row, col);
            DetectionPoint {
                x,
                y,
                row,
                col,
                probability,
            }
        })
        .collect()
}
