use crate::artifacts::{EncoderSet, Scaler};
use crate::classifier::{Classifier, Prediction};
use crate::classifiers;
use crate::config::Config;
use crate::error::PredictError;
use crate::preprocessing::Preprocessor;
use crate::record::{Categorical, PatientRecord};
use std::sync::Arc;

/// Preprocessing plus classification over the artifacts loaded at startup
pub struct Predictor {
    preprocessor: Preprocessor,
    model: Arc<dyn Classifier>,
}

impl Predictor {
    /// Load the encoder set, scaler and model named by the configuration
    pub fn new(config: &Config) -> Result<Self, PredictError> {
        tracing::info!("Loading artifacts...");

        let encoders = EncoderSet::load(&config.encoders_path)?;
        let scaler = Scaler::load(&config.scaler_path)?;
        let model = classifiers::load(&config.model_path)?;

        Ok(Self::from_parts(
            Preprocessor::new(Arc::new(encoders), Arc::new(scaler)),
            model,
        ))
    }

    pub fn from_parts(preprocessor: Preprocessor, model: Arc<dyn Classifier>) -> Self {
        Self {
            preprocessor,
            model,
        }
    }

    /// Validate, preprocess and classify one record
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, PredictError> {
        record.validate()?;
        let features = self.preprocessor.transform(record)?;
        self.model.predict(features.as_slice())
    }

    /// Values the encoder for `field` was fitted on
    pub fn vocabulary(&self, field: Categorical) -> &[String] {
        self.preprocessor.encoders().get(field).classes()
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}

#[cfg(test)]
pub(crate) fn sample_predictor() -> Predictor {
    use crate::artifacts::encoder::sample_encoders;
    use crate::artifacts::scaler::sample_scaler;
    use crate::classifiers::logistic::sample_model;

    Predictor::from_parts(
        Preprocessor::new(Arc::new(sample_encoders()), Arc::new(sample_scaler())),
        Arc::new(sample_model()),
    )
}
