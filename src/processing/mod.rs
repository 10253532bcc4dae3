// src/processing/mod.rs
pub mod aggregate;
pub mod emit;
pub mod indices;
pub mod pixels;
pub mod reconcile;
pub mod score;
pub mod table;

// Re-export main components
pub use aggregate::{summarize, SummaryVector};
pub use emit::emit_points;
pub use indices::{SpectralBands, SpectralIndex, SpectralIndices};
pub use pixels::{assemble_pixel_table, PIXEL_COLUMNS};
pub use reconcile::{assemble_features, broadcast_summary, reconcile, FeatureMatrix, MISSING_MARKER};
pub use score::score;
pub use table::FeatureTable;
