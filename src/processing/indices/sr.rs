// src/processing/indices/sr.rs
use super::{PixelBands, SpectralIndex};

/// Simple Ratio: NIR / (eps + RED)
pub struct SR {
    epsilon: f64,
    name: String,
}

impl SR {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            name: "sr".to_string(),
        }
    }
}

impl SpectralIndex for SR {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn calculate(&self, px: PixelBands) -> f64 {
        px.nir / (self.epsilon + px.red)
    }
}
