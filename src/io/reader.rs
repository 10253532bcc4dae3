// src/io/reader.rs
use std::path::{Path, PathBuf};

use gdal::Dataset;

use crate::config::BandIndices;
use crate::error::{FireError, Result};
use crate::processing::{assemble_pixel_table, FeatureTable, SpectralBands, SpectralIndices};
use crate::raster::{GeoTransform, Grid};
use crate::utils::vsimem::MemFile;

/// Where a raster comes from.
#[derive(Debug, Clone)]
pub enum RasterSource {
    Path(PathBuf),
    /// Encoded raster file contents, e.g. an uploaded GeoTIFF
    Bytes(Vec<u8>),
}

impl RasterSource {
    fn describe(&self) -> String {
        match self {
            RasterSource::Path(path) => path.display().to_string(),
            RasterSource::Bytes(bytes) => format!("<in-memory raster, {} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for RasterSource {
    fn from(path: PathBuf) -> Self {
        RasterSource::Path(path)
    }
}

impl From<&Path> for RasterSource {
    fn from(path: &Path) -> Self {
        RasterSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for RasterSource {
    fn from(bytes: Vec<u8>) -> Self {
        RasterSource::Bytes(bytes)
    }
}

#[derive(Debug, Clone)]
pub struct RasterInfo {
    pub geo_transform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
}

impl RasterInfo {
    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

pub struct RasterBands {
    pub info: RasterInfo,
    pub bands: SpectralBands,
}

/// Open `source` and read the red, green, blue and near-infrared bands.
///
/// The dataset (and the in-memory mount for byte sources) is released before
/// this returns, whether reading succeeded or not.
pub fn read_bands(source: RasterSource, indices: &BandIndices) -> Result<RasterBands> {
    let name = source.describe();
    match source {
        RasterSource::Path(path) => {
            let dataset = open(&path, &name)?;
            read_from_dataset(&dataset, indices)
        }
        RasterSource::Bytes(bytes) => {
            let mem = MemFile::create("raster", "tif", bytes)
                .map_err(|e| read_error(&name, e))?;
            let dataset = open(mem.path(), &name)?;
            read_from_dataset(&dataset, indices)
        }
    }
}

/// Read the raster, compute spectral indices and flatten everything into the
/// 10-column pixel feature table.
pub fn load_pixel_features(
    source: RasterSource,
    indices: &BandIndices,
    epsilon: f64,
) -> Result<(FeatureTable, RasterInfo)> {
    let RasterBands { info, bands } = read_bands(source, indices)?;
    let spectral = SpectralIndices::calculate(&bands, epsilon);
    let table = assemble_pixel_table(bands, spectral)?;
    log::debug!(
        "Built pixel feature table: {} rows x {} columns",
        table.n_rows(),
        table.n_cols()
    );
    Ok((table, info))
}

fn open(path: &Path, name: &str) -> Result<Dataset> {
    Dataset::open(path).map_err(|e| read_error(name, e))
}

fn read_error(name: &str, reason: impl std::fmt::Display) -> FireError {
    FireError::RasterRead {
        source_name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn read_from_dataset(dataset: &Dataset, indices: &BandIndices) -> Result<RasterBands> {
    let (width, height) = dataset.raster_size();
    let band_count = dataset.raster_count() as usize;
    let geo_transform = match dataset.geo_transform() {
        Ok(coeffs) => GeoTransform::from_gdal(coeffs),
        Err(e) => {
            log::warn!("Raster has no geotransform ({}), using identity", e);
            GeoTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
        }
    };

    log::debug!(
        "Raster {} x {}, {} bands, geotransform {:?}",
        width,
        height,
        band_count,
        geo_transform.to_gdal()
    );

    let read = |role: &'static str, band: usize| -> Result<Grid> {
        if band == 0 || band > band_count {
            return Err(FireError::BandOutOfRange {
                role,
                band,
                count: band_count,
            });
        }
        let array = dataset
            .rasterband(band)?
            .read_as::<f64>((0, 0), (width, height), (width, height), None)?
            .to_array()?;
        Ok(Grid::from_array(array))
    };

    let red = read("red", indices.red)?;
    let green = read("green", indices.green)?;
    let blue = read("blue", indices.blue)?;
    let nir = read("nir", indices.nir)?;

    Ok(RasterBands {
        info: RasterInfo {
            geo_transform,
            width,
            height,
            band_count,
        },
        bands: SpectralBands::new(red, green, blue, nir)?,
    })
}
