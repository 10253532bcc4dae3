// src/model/oblivious.rs
//! Gradient-boosted ensemble of oblivious decision trees.
//!
//! The artifact is the JSON export of a fitted binary classifier:
//!
//! ```text
//! {
//!   "features_info": { "float_features": [
//!       { "feature_index": 0, "flat_feature_index": 0, "feature_id": "red",
//!         "nan_value_treatment": "AsFalse" }, ... ] },
//!   "oblivious_trees": [
//!       { "splits": [ { "float_feature_index": 0, "border": 0.25 }, ... ],
//!         "leaf_values": [ ... 2^depth values ... ] }, ... ],
//!   "scale_and_bias": [1.0, [0.0]]
//! }
//! ```
//!
//! Every level of an oblivious tree tests the same split, so the leaf is the
//! bitmask of the split outcomes: bit `d` is set when the feature value of
//! split `d` is greater than its border.

use std::collections::HashMap;
use std::path::Path;

use ndarray::ArrayView1;
use rayon::prelude::*;
use serde::Deserialize;

use super::{Classifier, FeatureSchema};
use crate::error::{FireError, Result};
use crate::processing::FeatureMatrix;

const MAX_DEPTH: usize = 16;

#[derive(Deserialize, Debug)]
struct ModelDocument {
    features_info: FeaturesInfo,
    #[serde(default)]
    oblivious_trees: Vec<TreeDocument>,
    #[serde(default)]
    scale_and_bias: Option<(f64, Bias)>,
}

#[derive(Deserialize, Debug, Default)]
struct FeaturesInfo {
    #[serde(default)]
    float_features: Vec<FloatFeatureDocument>,
    #[serde(default)]
    categorical_features: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct FloatFeatureDocument {
    feature_index: usize,
    flat_feature_index: usize,
    #[serde(default)]
    feature_id: Option<String>,
    #[serde(default)]
    nan_value_treatment: NanTreatment,
}

#[derive(Deserialize, Debug)]
struct TreeDocument {
    splits: Vec<SplitDocument>,
    leaf_values: Vec<f64>,
}

#[derive(Deserialize, Debug)]
struct SplitDocument {
    float_feature_index: usize,
    border: f64,
    #[serde(default)]
    split_type: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Bias {
    Scalar(f64),
    PerDimension(Vec<f64>),
}

/// How a NaN feature value answers a split test.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NanTreatment {
    /// NaN compares as smaller than every border.
    #[default]
    AsFalse,
    /// NaN compares as larger than every border.
    AsTrue,
    /// Plain IEEE comparison, which is false for NaN.
    AsIs,
}

#[derive(Debug, Clone)]
struct Split {
    column: usize,
    border: f32,
}

#[derive(Debug, Clone)]
struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
}

/// Fitted binary classifier over oblivious trees.
#[derive(Debug, Clone)]
pub struct ObliviousEnsemble {
    schema: FeatureSchema,
    nan_treatment: Vec<NanTreatment>,
    trees: Vec<ObliviousTree>,
    scale: f64,
    bias: f64,
}

impl ObliviousEnsemble {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading classifier from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            FireError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let model = Self::from_json(&content)?;
        log::info!(
            "Loaded {} trees over {} features",
            model.trees.len(),
            model.schema.len()
        );
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let document: ModelDocument = serde_json::from_str(content)
            .map_err(|e| FireError::ModelLoad(format!("invalid model document: {}", e)))?;
        Self::from_document(document)
    }

    fn from_document(document: ModelDocument) -> Result<Self> {
        if !document.features_info.categorical_features.is_empty() {
            return Err(FireError::ModelLoad(
                "categorical features are not supported".to_string(),
            ));
        }

        let mut features = document.features_info.float_features;
        features.sort_by_key(|f| f.flat_feature_index);

        // feature_index -> column in the schema
        let mut columns = HashMap::with_capacity(features.len());
        for (position, feature) in features.iter().enumerate() {
            if feature.flat_feature_index != position {
                return Err(FireError::ModelLoad(format!(
                    "feature flat indices are not contiguous: expected {}, found {}",
                    position, feature.flat_feature_index
                )));
            }
            columns.insert(feature.feature_index, position);
        }

        let schema = features
            .iter()
            .map(|f| {
                f.feature_id
                    .clone()
                    .unwrap_or_else(|| f.flat_feature_index.to_string())
            })
            .collect::<FeatureSchema>();
        let nan_treatment = features.iter().map(|f| f.nan_value_treatment).collect();

        let trees = document
            .oblivious_trees
            .into_iter()
            .enumerate()
            .map(|(t, tree)| {
                if tree.splits.len() > MAX_DEPTH {
                    return Err(FireError::ModelLoad(format!(
                        "tree {} is deeper than {} levels",
                        t, MAX_DEPTH
                    )));
                }
                let expected_leaves = 1usize << tree.splits.len();
                if tree.leaf_values.len() != expected_leaves {
                    return Err(FireError::ModelLoad(format!(
                        "tree {} has depth {} but {} leaf values",
                        t,
                        tree.splits.len(),
                        tree.leaf_values.len()
                    )));
                }

                let splits = tree
                    .splits
                    .into_iter()
                    .map(|split| {
                        if let Some(kind) = split.split_type.as_deref() {
                            if kind != "FloatFeature" {
                                return Err(FireError::ModelLoad(format!(
                                    "tree {} uses unsupported split type {}",
                                    t, kind
                                )));
                            }
                        }
                        let column = *columns.get(&split.float_feature_index).ok_or_else(|| {
                            FireError::ModelLoad(format!(
                                "tree {} splits on unknown feature {}",
                                t, split.float_feature_index
                            ))
                        })?;
                        Ok(Split {
                            column,
                            border: split.border as f32,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(ObliviousTree {
                    splits,
                    leaf_values: tree.leaf_values,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (scale, bias) = match document.scale_and_bias {
            Some((scale, Bias::Scalar(bias))) => (scale, bias),
            Some((scale, Bias::PerDimension(bias))) => {
                if bias.len() > 1 {
                    return Err(FireError::ModelLoad(format!(
                        "expected a binary classifier, found {} output dimensions",
                        bias.len()
                    )));
                }
                (scale, bias.first().copied().unwrap_or(0.0))
            }
            None => (1.0, 0.0),
        };

        Ok(Self {
            schema,
            nan_treatment,
            trees,
            scale,
            bias,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Raw additive score of one row before the sigmoid.
    fn raw_score(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut sum = 0.0;
        for tree in &self.trees {
            let mut leaf = 0usize;
            for (depth, split) in tree.splits.iter().enumerate() {
                let value = row[split.column];
                let goes_right = if value.is_nan() {
                    self.nan_treatment[split.column] == NanTreatment::AsTrue
                } else {
                    (value as f32) > split.border
                };
                if goes_right {
                    leaf |= 1 << depth;
                }
            }
            sum += tree.leaf_values[leaf];
        }
        self.scale * sum + self.bias
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for ObliviousEnsemble {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        if matrix.names() != self.schema.names() {
            return Err(FireError::SchemaMismatch(format!(
                "matrix columns {:?} do not match classifier schema {:?}",
                matrix.names(),
                self.schema.names()
            )));
        }

        let probabilities = matrix
            .data()
            .outer_iter()
            .into_par_iter()
            .map(|row| sigmoid(self.raw_score(row)))
            .collect();

        Ok(probabilities)
    }
}
