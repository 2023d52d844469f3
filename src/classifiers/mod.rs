//! Model implementations
//!
//! This module contains implementations of the Classifier trait for the model
//! families the training pipeline can export. The artifact's `kind` field
//! selects the implementation.

pub mod forest;
pub mod logistic;

use crate::artifacts::read_json;
use crate::classifier::Classifier;
use crate::error::PredictError;
use crate::record::FEATURE_COUNT;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    LogisticRegression(logistic::LogisticRegressionArtifact),
    DecisionTree(forest::DecisionTreeArtifact),
    RandomForest(forest::RandomForestArtifact),
}

/// Load the model file and build the matching classifier
pub fn load(path: &Path) -> Result<Arc<dyn Classifier>, PredictError> {
    let artifact: ModelArtifact = read_json(path)?;

    let model: Result<Arc<dyn Classifier>, PredictError> = match artifact {
        ModelArtifact::LogisticRegression(a) => {
            logistic::LogisticRegression::try_from(a).map(|m| Arc::new(m) as Arc<dyn Classifier>)
        }
        ModelArtifact::DecisionTree(a) => {
            forest::DecisionTree::try_from(a).map(|m| Arc::new(m) as Arc<dyn Classifier>)
        }
        ModelArtifact::RandomForest(a) => {
            forest::RandomForest::try_from(a).map(|m| Arc::new(m) as Arc<dyn Classifier>)
        }
    };

    let model = model.map_err(|e| e.context(path.display()))?;

    tracing::info!("Loaded {} model from {}", model.name(), path.display());
    Ok(model)
}

/// Validate the metadata every exported binary model carries
fn check_metadata(classes: Option<&[i64]>, n_features_in: Option<usize>) -> Result<(), PredictError> {
    if let Some(classes) = classes {
        if classes != [0, 1] {
            return Err(PredictError::ArtifactError(format!(
                "classes must be [0, 1], got {:?}",
                classes
            )));
        }
    }

    if let Some(n) = n_features_in {
        if n != FEATURE_COUNT {
            return Err(PredictError::ArtifactError(format!(
                "model was fitted on {} features, expected {}",
                n, FEATURE_COUNT
            )));
        }
    }
    Ok(())
}
