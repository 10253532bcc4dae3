// src/model/mod.rs
pub mod oblivious;

pub use oblivious::ObliviousEnsemble;

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{FireError, Result};
use crate::processing::FeatureMatrix;

/// Ordered list of the feature names a classifier expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSchema {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Trait for pretrained binary probability classifiers
///
/// Implementations are fitted before they are handed to the pipeline and are
/// only ever read afterwards, so one instance can serve concurrent callers.
pub trait Classifier: Send + Sync {
    /// Feature names in the column order `predict_proba` expects
    fn schema(&self) -> &FeatureSchema;

    /// Positive-class probability for each row of `matrix`, in row order
    fn predict_proba(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// Shared, read-only classifier handle.
pub type ModelHandle = Arc<dyn Classifier>;

/// Load the classifier artifact at `path`.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelHandle> {
    let model = ObliviousEnsemble::from_file(path)?;
    Ok(Arc::new(model))
}

static SHARED_MODEL: Mutex<Option<ModelHandle>> = parking_lot::const_mutex(None);

/// Process-wide classifier, loaded on first call and reused afterwards.
///
/// The artifact is read at most once: concurrent first callers wait on the
/// lock while one of them loads it. A failed load leaves the slot empty so a
/// later call can retry. Later calls return the loaded model regardless of
/// `path`.
pub fn shared_model<P: AsRef<Path>>(path: P) -> Result<ModelHandle> {
    let mut slot = SHARED_MODEL.lock();
    if let Some(model) = slot.as_ref() {
        return Ok(Arc::clone(model));
    }

    let model = load_model(path)?;
    *slot = Some(Arc::clone(&model));
    Ok(model)
}

/// Schema of `classifier`, failing when it declares no features.
pub fn require_schema<C: Classifier + ?Sized>(classifier: &C) -> Result<&FeatureSchema> {
    let schema = classifier.schema();
    if schema.is_empty() {
        return Err(FireError::SchemaMismatch(
            "classifier declares no feature names".to_string(),
        ));
    }
    Ok(schema)
}
