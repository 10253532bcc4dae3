// src/lib.rs
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod geojson;
pub mod io;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod processing;
pub mod raster;
pub mod utils;

pub use config::PipelineConfig;
pub use error::{FireError, Result};
pub use geojson::DetectionPoint;
pub use pipeline::{detect_fire_points, FirePipeline};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
