// src/raster/geotransform.rs
//! Affine georeferencing of raster pixels.

use serde::{Deserialize, Serialize};

/// Placement of a raster on the map: pixel `(row, col)` to `(x, y)` in the
/// raster's own reference system.
///
/// ```text
/// x = origin_x + (col + 0.5) * pixel_width  + (row + 0.5) * row_rotation
/// y = origin_y + (col + 0.5) * col_rotation + (row + 0.5) * pixel_height
/// ```
///
/// North-up scenes have zero rotations and a negative `pixel_height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Coefficients in the order `Dataset::geo_transform` returns them.
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        let [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height] = coeffs;
        Self {
            origin_x,
            pixel_width,
            row_rotation,
            origin_y,
            col_rotation,
            pixel_height,
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        let Self {
            origin_x,
            pixel_width,
            row_rotation,
            origin_y,
            col_rotation,
            pixel_height,
        } = *self;
        [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]
    }

    /// Map coordinates of the centre of pixel `(row, col)`. Row first.
    pub fn pixel_to_geo(&self, row: usize, col: usize) -> (f64, f64) {
        let (r, c) = (row as f64 + 0.5, col as f64 + 0.5);
        (
            self.origin_x + c * self.pixel_width + r * self.row_rotation,
            self.origin_y + c * self.col_rotation + r * self.pixel_height,
        )
    }

    /// Inverse of [`pixel_to_geo`](Self::pixel_to_geo) without the centre
    /// offset: a pixel centre comes back as `(row + 0.5, col + 0.5)`.
    ///
    /// NaN when the transform cannot be inverted.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }

        let (east, north) = (x - self.origin_x, y - self.origin_y);
        let row = (self.pixel_width * north - self.col_rotation * east) / det;
        let col = (self.pixel_height * east - self.row_rotation * north) / det;
        (row, col)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}
