use crate::artifacts::{EncoderSet, Scaler};
use crate::error::PredictError;
use crate::record::{Categorical, Feature, PatientRecord, FEATURE_COUNT, FEATURE_ORDER};
use std::sync::Arc;

use super::steps;

/// Encoded and scaled features, laid out in `FEATURE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Converts patient records into model input using the fitted artifacts.
///
/// Holds shared read-only handles; `transform` never mutates them, so the
/// same record always yields the same vector.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    encoders: Arc<EncoderSet>,
    scaler: Arc<Scaler>,
}

impl Preprocessor {
    pub fn new(encoders: Arc<EncoderSet>, scaler: Arc<Scaler>) -> Self {
        Self { encoders, scaler }
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn transform(&self, record: &PatientRecord) -> Result<FeatureVector, PredictError> {
        let codes = steps::encode::apply(record, &self.encoders)?;
        let scaled = steps::scale::apply(record, &self.scaler);

        let vector = FEATURE_ORDER.map(|feature| match feature {
            Feature::Numeric(n) => scaled[n.column()],
            Feature::Categorical(c) => codes[categorical_slot(c)],
        });

        Ok(FeatureVector(vector))
    }
}

fn categorical_slot(field: Categorical) -> usize {
    match field {
        Categorical::Sex => 0,
        Categorical::ChestPainType => 1,
        Categorical::RestingEcg => 2,
        Categorical::ExerciseAngina => 3,
        Categorical::StSlope => 4,
    }
}
