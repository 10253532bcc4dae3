// src/processing/indices/savi.rs
use super::{PixelBands, SpectralIndex};

/// Soil adjustment factor
const SOIL_FACTOR: f64 = 0.5;

/// Soil Adjusted Vegetation Index (SAVI) calculator
///
/// `((NIR - RED) / (NIR + RED + L)) * (1 + L)` with L = 0.5. The denominator
/// carries no stabilizer: when `NIR + RED + L` is zero the result is NaN or
/// Inf and is returned unchanged.
pub struct SAVI {
    name: String,
}

impl SAVI {
    pub fn new() -> Self {
        Self {
            name: "savi".to_string(),
        }
    }
}

impl Default for SAVI {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralIndex for SAVI {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn calculate(&self, px: PixelBands) -> f64 {
        ((px.nir - px.red) / (px.nir + px.red + SOIL_FACTOR)) * (1.0 + SOIL_FACTOR)
    }
}
