// src/raster/mod.rs
pub mod geotransform;
pub mod grid;

pub use geotransform::GeoTransform;
pub use grid::Grid;
