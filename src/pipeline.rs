// src/pipeline.rs
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::geojson::DetectionPoint;
use crate::io::{load_pixel_features, RasterInfo, RasterSource, SensorHistory, TableSource};
use crate::model::{load_model, require_schema, Classifier, ModelHandle};
use crate::processing::{assemble_features, emit_points, score, summarize};
use crate::raster::Grid;

/// Probability per pixel together with the raster it was computed from.
#[derive(Debug, Clone)]
pub struct ScoredRaster {
    pub probabilities: Grid,
    pub info: RasterInfo,
}

/// Score every pixel of `raster` using the sensor history in `table`.
///
/// The raster and the table are loaded concurrently; neither load sees the
/// other's data.
pub fn score_pixels<C: Classifier + ?Sized>(
    classifier: &C,
    config: &PipelineConfig,
    raster: RasterSource,
    table: TableSource,
) -> Result<ScoredRaster> {
    let schema = require_schema(classifier)?;

    let (pixels, history) = rayon::join(
        || load_pixel_features(raster, &config.bands, config.epsilon),
        || SensorHistory::from_source(table),
    );
    let (pixels, info) = pixels?;
    let history = history?;

    let summary = summarize(&history, config.history_window);
    let matrix = assemble_features(pixels, &summary, schema)?;
    let probabilities = score(classifier, &matrix, info.shape())?;

    Ok(ScoredRaster {
        probabilities,
        info,
    })
}

/// Geographic locations of every pixel whose fire probability exceeds the
/// configured threshold, in row-major scan order.
pub fn detect_fire_points<C: Classifier + ?Sized>(
    classifier: &C,
    config: &PipelineConfig,
    raster: RasterSource,
    table: TableSource,
) -> Result<Vec<DetectionPoint>> {
    let started = Instant::now();
    let scored = score_pixels(classifier, config, raster, table)?;
    let points = emit_points(
        &scored.probabilities,
        &scored.info.geo_transform,
        config.threshold,
    );

    log::info!(
        "Detected {} of {} pixels above {} in {:?}",
        points.len(),
        scored.probabilities.len(),
        config.threshold,
        started.elapsed()
    );
    Ok(points)
}

/// A loaded classifier paired with the configuration it runs under.
///
/// Cloning is cheap and clones share the same classifier.
#[derive(Clone)]
pub struct FirePipeline {
    model: ModelHandle,
    config: PipelineConfig,
}

impl FirePipeline {
    /// Fails when the classifier declares no features.
    pub fn new(model: ModelHandle, config: PipelineConfig) -> Result<Self> {
        require_schema(model.as_ref())?;
        Ok(Self { model, config })
    }

    /// Load the model named by `config.model_path`.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let model = load_model(&config.model_path)?;
        Self::new(model, config)
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn score(&self, raster: RasterSource, table: TableSource) -> Result<ScoredRaster> {
        score_pixels(self.model.as_ref(), &self.config, raster, table)
    }

    pub fn detect(&self, raster: RasterSource, table: TableSource) -> Result<Vec<DetectionPoint>> {
        detect_fire_points(self.model.as_ref(), &self.config, raster, table)
    }
}
