// src/io/writer.rs
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geojson::{DetectionPoint, FeatureCollection};
use crate::processing::FeatureTable;

/// Serialization of the detected points.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of GeoJSON `Point` geometries
    #[default]
    Points,
    /// GeoJSON `FeatureCollection` with a probability per feature
    Collection,
}

pub fn write_points<W: Write>(
    writer: W,
    points: &[DetectionPoint],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Points => serde_json::to_writer_pretty(writer, points)?,
        OutputFormat::Collection => {
            serde_json::to_writer_pretty(writer, &FeatureCollection::from_points(points))?
        }
    }
    Ok(())
}

/// Write `table` as CSV, one row per pixel in row-major order.
pub fn write_feature_table<W: Write>(writer: W, table: &FeatureTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.names())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
