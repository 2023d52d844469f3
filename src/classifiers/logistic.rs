//! Logistic regression

use super::check_metadata;
use crate::classifier::{check_input, Classifier, Prediction};
use crate::error::PredictError;
use crate::record::FEATURE_COUNT;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LogisticRegressionArtifact {
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    #[serde(default)]
    n_features_in: Option<usize>,
}

/// Linear decision function passed through the logistic sigmoid
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl TryFrom<LogisticRegressionArtifact> for LogisticRegression {
    type Error = PredictError;

    fn try_from(artifact: LogisticRegressionArtifact) -> Result<Self, Self::Error> {
        check_metadata(artifact.classes.as_deref(), artifact.n_features_in)?;

        let coef: [f64; FEATURE_COUNT] = artifact.coef.as_slice().try_into().map_err(|_| {
            PredictError::ArtifactError(format!(
                "coef has {} values, expected {}",
                artifact.coef.len(),
                FEATURE_COUNT
            ))
        })?;

        if coef.iter().any(|c| !c.is_finite()) || !artifact.intercept.is_finite() {
            return Err(PredictError::ArtifactError(
                "coefficients must be finite".to_string(),
            ));
        }

        Ok(Self {
            coef,
            intercept: artifact.intercept,
        })
    }
}

impl LogisticRegression {
    fn decision_function(&self, features: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn description(&self) -> &'static str {
        "Logistic regression over the encoded and scaled features"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictError> {
        check_input(self, features)?;

        let decision = self.decision_function(features);
        Ok(Prediction {
            label: u8::from(decision > 0.0),
            probability: Some(sigmoid(decision)),
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Coefficients matching the sample encoders and scaler
#[cfg(test)]
pub(crate) fn sample_model() -> LogisticRegression {
    LogisticRegression {
        coef: [0.3, 1.2, -0.8, 0.1, -0.3, 0.5, -0.1, -0.3, 1.0, 0.5, -1.8],
        intercept: 2.0,
    }
}
