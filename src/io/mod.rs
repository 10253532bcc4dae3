// src/io/mod.rs
pub mod history;
pub mod reader;
pub mod writer;

pub use history::{SensorHistory, TableSource};
pub use reader::{load_pixel_features, read_bands, RasterBands, RasterInfo, RasterSource};
pub use writer::{write_feature_table, write_points, OutputFormat};
