//! Loaders for the pre-fitted artifacts produced by the training pipeline
//!
//! Every artifact is a JSON document read once at startup and validated
//! against the fixed feature layout before the server accepts requests.

pub mod encoder;
pub mod scaler;

pub use encoder::EncoderSet;
pub use scaler::Scaler;

use crate::error::PredictError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read and deserialize one JSON artifact
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PredictError> {
    let bytes = fs::read(path).map_err(|e| {
        PredictError::ArtifactError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        PredictError::ArtifactError(format!("Failed to parse {}: {}", path.display(), e))
    })
}
