// src/processing/indices/evi.rs
use super::{PixelBands, SpectralIndex};

// EVI coefficients from MODIS documentation
const G: f64 = 2.5; // Gain factor
const L: f64 = 1.0; // Canopy background adjustment
const C1: f64 = 6.0; // Aerosol resistance (red)
const C2: f64 = 7.5; // Aerosol resistance (blue)

/// Enhanced Vegetation Index (EVI) calculator
///
/// `G * (NIR - RED) / (eps + NIR + C1*RED - C2*BLUE + L)`. No clamping and no
/// saturation fallback: every pixel uses the 3-band formula.
pub struct EVI {
    epsilon: f64,
    name: String,
}

impl EVI {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            name: "evi".to_string(),
        }
    }
}

impl SpectralIndex for EVI {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn calculate(&self, px: PixelBands) -> f64 {
        let denominator = self.epsilon + px.nir + C1 * px.red - C2 * px.blue + L;
        G * (px.nir - px.red) / denominator
    }
}
