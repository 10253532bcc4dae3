use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::io::OutputFormat;

#[derive(Parser)]
#[command(name = "fire-detect")]
#[command(about = "Per-pixel fire-risk detection from multispectral rasters and sensor history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pipeline config file (JSON); flags below override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Classifier model file
    #[arg(short, long, global = true)]
    pub model: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect fire-risk pixels and write their coordinates as GeoJSON
    Points {
        /// Multiband raster (red, green, blue, NIR, mask)
        #[arg(short = 'r', long)]
        raster: PathBuf,

        /// Sensor history CSV; first column is an identifier
        #[arg(short = 't', long)]
        table: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Probability threshold (strictly greater passes)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output layout
        #[arg(long, value_enum, default_value_t = OutputFormat::Points)]
        format: OutputFormat,
    },

    /// Write the per-pixel band and index table as CSV
    Features {
        /// Multiband raster (red, green, blue, NIR, mask)
        #[arg(short = 'r', long)]
        raster: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the feature names the classifier expects
    Schema,

    /// Run many detections from a batch config file
    Batch {
        /// Batch config (JSON)
        #[arg(short = 'b', long)]
        batch: PathBuf,
    },
}
