// src/geojson.rs
//! Detection points and their GeoJSON representation.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A pixel whose fire probability passed the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPoint {
    pub x: f64,
    pub y: f64,
    pub row: usize,
    pub col: usize,
    pub probability: f64,
}

impl DetectionPoint {
    pub fn coordinates(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Serializes as a GeoJSON `Point` geometry: `{"type":"Point","coordinates":[x,y]}`.
impl Serialize for DetectionPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut point = serializer.serialize_struct("Point", 2)?;
        point.serialize_field("type", "Point")?;
        point.serialize_field("coordinates", &self.coordinates())?;
        point.end()
    }
}

#[derive(Serialize, Debug)]
struct FeatureProperties {
    probability: f64,
    row: usize,
    col: usize,
}

#[derive(Serialize, Debug)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: &'a DetectionPoint,
    properties: FeatureProperties,
}

#[derive(Serialize, Debug)]
pub struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

impl<'a> FeatureCollection<'a> {
    /// Wrap points as features carrying their probability and source pixel.
    pub fn from_points(points: &'a [DetectionPoint]) -> Self {
        let features = points
            .iter()
            .map(|point| Feature {
                kind: "Feature",
                geometry: point,
                properties: FeatureProperties {
                    probability: point.probability,
                    row: point.row,
                    col: point.col,
                },
            })
            .collect();

        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}
