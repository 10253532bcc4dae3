// src/processing/indices/ndi.rs
use super::{Band, PixelBands, SpectralIndex};

/// Stabilized normalized difference: (A - B) / (eps + A + B)
///
/// NDVI, NDWI and GNDVI are all instances of this form.
pub struct NDI {
    band_a: Band,
    band_b: Band,
    epsilon: f64,
    name: String,
}

impl NDI {
    pub fn new(band_a: Band, band_b: Band, epsilon: f64, name: Option<String>) -> Self {
        Self {
            band_a,
            band_b,
            epsilon,
            name: name.unwrap_or_else(|| "ndi".to_string()),
        }
    }

    /// (NIR - RED) / (eps + NIR + RED)
    pub fn ndvi(epsilon: f64) -> Self {
        Self::new(Band::Nir, Band::Red, epsilon, Some("ndvi".to_string()))
    }

    /// (GREEN - NIR) / (eps + GREEN + NIR)
    pub fn ndwi(epsilon: f64) -> Self {
        Self::new(Band::Green, Band::Nir, epsilon, Some("ndwi".to_string()))
    }

    /// (NIR - GREEN) / (eps + NIR + GREEN)
    pub fn gndvi(epsilon: f64) -> Self {
        Self::new(Band::Nir, Band::Green, epsilon, Some("gndvi".to_string()))
    }
}

impl SpectralIndex for NDI {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn calculate(&self, px: PixelBands) -> f64 {
        let a = px.get(self.band_a);
        let b = px.get(self.band_b);
        (a - b) / (self.epsilon + a + b)
    }
}
