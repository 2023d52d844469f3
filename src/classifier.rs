use crate::error::PredictError;

/// Outcome shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Absent,
    Present,
}

impl Diagnosis {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Self::Present
        } else {
            Self::Absent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
        }
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// 0 = absent, 1 = present
    pub label: u8,
    /// Probability of the positive class, when the model provides one
    pub probability: Option<f64>,
}

impl Prediction {
    pub fn diagnosis(&self) -> Diagnosis {
        Diagnosis::from_label(self.label)
    }
}

/// Trait that all loaded models must implement
pub trait Classifier: Send + Sync {
    /// Returns the model identifier (e.g., "logistic_regression")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the model
    fn description(&self) -> &'static str;

    /// Number of features the model was fitted on
    fn n_features(&self) -> usize;

    /// Classify one feature vector
    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictError>;
}

/// Reject vectors whose length differs from what the model expects
pub fn check_input(model: &dyn Classifier, features: &[f64]) -> Result<(), PredictError> {
    if features.len() != model.n_features() {
        return Err(PredictError::InferenceError(format!(
            "{} expects {} features, got {}",
            model.name(),
            model.n_features(),
            features.len()
        )));
    }
    Ok(())
}
