// src/processing/indices/mod.rs
pub mod evi;
pub mod ndi;
pub mod savi;
pub mod sr;

pub use evi::EVI;
pub use ndi::NDI;
pub use savi::SAVI;
pub use sr::SR;

use ndarray::Zip;

use crate::error::{FireError, Result};
use crate::raster::Grid;

/// Spectral channel of the input raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Red,
    Green,
    Blue,
    Nir,
}

/// Reflectance values of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBands {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub nir: f64,
}

impl PixelBands {
    #[inline]
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Red => self.red,
            Band::Green => self.green,
            Band::Blue => self.blue,
            Band::Nir => self.nir,
        }
    }
}

/// Trait for per-pixel spectral index formulas
pub trait SpectralIndex: Send + Sync {
    /// Column name of the index in the pixel feature table
    fn name(&self) -> &str;

    /// Evaluate the formula for one pixel. NaN and Inf are returned as is.
    fn calculate(&self, px: PixelBands) -> f64;
}

/// Red, green, blue and near-infrared grids of identical shape.
#[derive(Debug, Clone)]
pub struct SpectralBands {
    pub red: Grid,
    pub green: Grid,
    pub blue: Grid,
    pub nir: Grid,
}

impl SpectralBands {
    pub fn new(red: Grid, green: Grid, blue: Grid, nir: Grid) -> Result<Self> {
        for other in [&green, &blue, &nir] {
            if other.shape() != red.shape() {
                return Err(FireError::ShapeMismatch {
                    expected: red.len(),
                    actual: other.len(),
                });
            }
        }
        Ok(Self {
            red,
            green,
            blue,
            nir,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.red.shape()
    }

    /// Apply `index` to every pixel. Output positions match input positions.
    pub fn apply<I: SpectralIndex + ?Sized>(&self, index: &I) -> Grid {
        let values = Zip::from(self.red.data())
            .and(self.green.data())
            .and(self.blue.data())
            .and(self.nir.data())
            .par_map_collect(|&red, &green, &blue, &nir| {
                index.calculate(PixelBands {
                    red,
                    green,
                    blue,
                    nir,
                })
            });

        Grid::from_array(values)
    }
}

/// The six derived index grids, in feature table column order.
#[derive(Debug, Clone)]
pub struct SpectralIndices {
    pub ndvi: Grid,
    pub evi: Grid,
    pub savi: Grid,
    pub ndwi: Grid,
    pub sr: Grid,
    pub gndvi: Grid,
}

impl SpectralIndices {
    /// Compute NDVI, EVI, SAVI, NDWI, SR and GNDVI.
    ///
    /// `epsilon` stabilizes every denominator except SAVI's.
    pub fn calculate(bands: &SpectralBands, epsilon: f64) -> Self {
        Self {
            ndvi: bands.apply(&NDI::ndvi(epsilon)),
            evi: bands.apply(&EVI::new(epsilon)),
            savi: bands.apply(&SAVI::new()),
            ndwi: bands.apply(&NDI::ndwi(epsilon)),
            sr: bands.apply(&SR::new(epsilon)),
            gndvi: bands.apply(&NDI::gndvi(epsilon)),
        }
    }

    /// `(column name, grid)` pairs in table order.
    pub fn into_columns(self) -> [(&'static str, Grid); 6] {
        [
            ("ndvi", self.ndvi),
            ("evi", self.evi),
            ("savi", self.savi),
            ("ndwi", self.ndwi),
            ("sr", self.sr),
            ("gndvi", self.gndvi),
        ]
    }
}
