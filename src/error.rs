// src/error.rs
use thiserror::Error;

/// Errors raised by the detection pipeline.
///
/// Numeric anomalies (NaN/Inf from the index formulas) and an empty sensor
/// history are not errors; they travel through the pipeline as values.
#[derive(Error, Debug)]
pub enum FireError {
    #[error("failed to read raster source {source_name}: {reason}")]
    RasterRead { source_name: String, reason: String },

    #[error("band {band} ({role}) is out of range for a raster with {count} bands")]
    BandOutOfRange {
        role: &'static str,
        band: usize,
        count: usize,
    },

    #[error("failed to read sensor table: {0}")]
    TableRead(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("classifier feature schema unavailable: {0}")]
    SchemaMismatch(String),

    #[error("failed to load classifier model: {0}")]
    ModelLoad(String),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FireError {
    /// True when the failure came from an unreadable raster or table input,
    /// as opposed to a model/schema problem.
    pub fn is_source_read(&self) -> bool {
        matches!(
            self,
            FireError::RasterRead { .. }
                | FireError::BandOutOfRange { .. }
                | FireError::TableRead(_)
                | FireError::Io(_)
                | FireError::Gdal(_)
                | FireError::Csv(_)
        )
    }

    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, FireError::SchemaMismatch(_))
    }
}

pub type Result<T> = std::result::Result<T, FireError>;
