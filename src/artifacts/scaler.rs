use super::read_json;
use crate::error::PredictError;
use crate::record::Numeric;
use serde::Deserialize;
use std::path::Path;

/// Number of numeric columns the scaler was fitted on
pub const SCALED_COLUMNS: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerArtifact {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

/// Fitted per-column affine transform over the numeric fields
#[derive(Debug, Clone, PartialEq)]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        mean: [f64; SCALED_COLUMNS],
        scale: [f64; SCALED_COLUMNS],
    },
    /// `x * scale + min`
    MinMax {
        min: [f64; SCALED_COLUMNS],
        scale: [f64; SCALED_COLUMNS],
    },
}

impl Scaler {
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let artifact: ScalerArtifact = read_json(path)?;
        let scaler = Self::from_artifact(artifact).map_err(|e| e.context(path.display()))?;

        tracing::info!("Loaded {} scaler from {}", scaler.kind(), path.display());
        Ok(scaler)
    }

    fn from_artifact(artifact: ScalerArtifact) -> Result<Self, PredictError> {
        match artifact {
            ScalerArtifact::Standard {
                mean,
                scale,
                feature_names,
            } => {
                check_feature_names(feature_names.as_deref())?;
                let scale = columns("scale", &scale)?;
                if let Some(i) = scale.iter().position(|s| *s == 0.0) {
                    return Err(PredictError::ArtifactError(format!(
                        "scale for {} is zero",
                        Numeric::ALL[i].name()
                    )));
                }
                Ok(Self::Standard {
                    mean: columns("mean", &mean)?,
                    scale,
                })
            }
            ScalerArtifact::MinMax {
                min,
                scale,
                feature_names,
            } => {
                check_feature_names(feature_names.as_deref())?;
                Ok(Self::MinMax {
                    min: columns("min", &min)?,
                    scale: columns("scale", &scale)?,
                })
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "standard",
            Self::MinMax { .. } => "min_max",
        }
    }

    /// Scale one row given in scaler column order
    pub fn transform(&self, row: &[f64; SCALED_COLUMNS]) -> [f64; SCALED_COLUMNS] {
        match self {
            Self::Standard { mean, scale } => {
                std::array::from_fn(|i| (row[i] - mean[i]) / scale[i])
            }
            Self::MinMax { min, scale } => std::array::from_fn(|i| row[i] * scale[i] + min[i]),
        }
    }
}

fn columns(name: &str, values: &[f64]) -> Result<[f64; SCALED_COLUMNS], PredictError> {
    let arr: [f64; SCALED_COLUMNS] = values.try_into().map_err(|_| {
        PredictError::ArtifactError(format!(
            "{} has {} values, expected {}",
            name,
            values.len(),
            SCALED_COLUMNS
        ))
    })?;

    if let Some(i) = arr.iter().position(|v| !v.is_finite()) {
        return Err(PredictError::ArtifactError(format!(
            "{} for {} is not finite",
            name,
            Numeric::ALL[i].name()
        )));
    }
    Ok(arr)
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), PredictError> {
    let Some(names) = names else {
        return Ok(());
    };

    let expected: Vec<&str> = Numeric::ALL.iter().map(|n| n.name()).collect();
    if names.iter().map(String::as_str).ne(expected.iter().copied()) {
        return Err(PredictError::ArtifactError(format!(
            "feature_names [{}] do not match expected columns [{}]",
            names.join(", "),
            expected.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_scaler() -> Scaler {
    Scaler::Standard {
        mean: [53.51, 132.4, 198.8, 0.233, 136.81, 0.887],
        scale: [9.43, 18.5, 109.32, 0.423, 25.45, 1.066],
    }
}
