//! Patient record and the fixed feature layout shared by the artifacts.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Length of the feature vector consumed by the model
pub const FEATURE_COUNT: usize = 11;

/// Categorical fields, each encoded by its own label encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Categorical {
    Sex,
    ChestPainType,
    RestingEcg,
    ExerciseAngina,
    StSlope,
}

impl Categorical {
    pub const ALL: [Self; 5] = [
        Self::Sex,
        Self::ChestPainType,
        Self::RestingEcg,
        Self::ExerciseAngina,
        Self::StSlope,
    ];

    /// Wire name, also the key in the encoder set
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sex => "Sex",
            Self::ChestPainType => "ChestPainType",
            Self::RestingEcg => "RestingECG",
            Self::ExerciseAngina => "ExerciseAngina",
            Self::StSlope => "ST_Slope",
        }
    }
}

/// Numeric fields, in the column order the scaler was fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Numeric {
    Age,
    RestingBp,
    Cholesterol,
    FastingBs,
    MaxHr,
    Oldpeak,
}

/// Accepted range and form defaults for a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSpec {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Only whole numbers are accepted
    pub integer: bool,
    /// Chosen from the integers in `min..=max` rather than typed
    pub discrete: bool,
}

impl Numeric {
    pub const ALL: [Self; 6] = [
        Self::Age,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBs,
        Self::MaxHr,
        Self::Oldpeak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::RestingBp => "RestingBP",
            Self::Cholesterol => "Cholesterol",
            Self::FastingBs => "FastingBS",
            Self::MaxHr => "MaxHR",
            Self::Oldpeak => "Oldpeak",
        }
    }

    /// Position of this field among the scaler columns
    pub fn column(&self) -> usize {
        match self {
            Self::Age => 0,
            Self::RestingBp => 1,
            Self::Cholesterol => 2,
            Self::FastingBs => 3,
            Self::MaxHr => 4,
            Self::Oldpeak => 5,
        }
    }

    pub fn spec(&self) -> NumericSpec {
        let (min, max, default, step, integer, discrete) = match self {
            Self::Age => (1.0, 120.0, 50.0, 1.0, true, false),
            Self::RestingBp => (50.0, 250.0, 120.0, 1.0, true, false),
            Self::Cholesterol => (100.0, 600.0, 200.0, 1.0, true, false),
            Self::FastingBs => (0.0, 1.0, 0.0, 1.0, true, true),
            Self::MaxHr => (60.0, 220.0, 150.0, 1.0, true, false),
            Self::Oldpeak => (0.0, 10.0, 1.0, 0.1, false, false),
        };
        NumericSpec {
            min,
            max,
            default,
            step,
            integer,
            discrete,
        }
    }
}

/// One slot of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Numeric(Numeric),
    Categorical(Categorical),
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Numeric(n) => n.name(),
            Feature::Categorical(c) => c.name(),
        }
    }
}

/// Feature vector layout. Must match the column order used when the
/// encoders, scaler and model were fitted.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Numeric(Numeric::Age),
    Feature::Categorical(Categorical::Sex),
    Feature::Categorical(Categorical::ChestPainType),
    Feature::Numeric(Numeric::RestingBp),
    Feature::Numeric(Numeric::Cholesterol),
    Feature::Numeric(Numeric::FastingBs),
    Feature::Categorical(Categorical::RestingEcg),
    Feature::Numeric(Numeric::MaxHr),
    Feature::Categorical(Categorical::ExerciseAngina),
    Feature::Numeric(Numeric::Oldpeak),
    Feature::Categorical(Categorical::StSlope),
];

/// One inference request, as submitted by the form or the JSON API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: String,
    #[serde(rename = "RestingBP")]
    pub resting_bp: f64,
    #[serde(rename = "Cholesterol")]
    pub cholesterol: f64,
    #[serde(rename = "FastingBS")]
    pub fasting_bs: f64,
    #[serde(rename = "RestingECG")]
    pub resting_ecg: String,
    #[serde(rename = "MaxHR")]
    pub max_hr: f64,
    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: String,
    #[serde(rename = "Oldpeak")]
    pub oldpeak: f64,
    #[serde(rename = "ST_Slope")]
    pub st_slope: String,
}

impl PatientRecord {
    pub fn categorical(&self, field: Categorical) -> &str {
        match field {
            Categorical::Sex => &self.sex,
            Categorical::ChestPainType => &self.chest_pain_type,
            Categorical::RestingEcg => &self.resting_ecg,
            Categorical::ExerciseAngina => &self.exercise_angina,
            Categorical::StSlope => &self.st_slope,
        }
    }

    pub fn numeric(&self, field: Numeric) -> f64 {
        match field {
            Numeric::Age => self.age,
            Numeric::RestingBp => self.resting_bp,
            Numeric::Cholesterol => self.cholesterol,
            Numeric::FastingBs => self.fasting_bs,
            Numeric::MaxHr => self.max_hr,
            Numeric::Oldpeak => self.oldpeak,
        }
    }

    /// Build a record from raw form fields.
    ///
    /// Missing fields and unparsable numbers are collected into a single
    /// invalid-input error.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, PredictError> {
        let mut errors = Vec::new();

        let mut text = |field: Categorical| match fields.get(field.name()) {
            Some(value) => value.clone(),
            None => {
                errors.push(format!("{} is missing", field.name()));
                String::new()
            }
        };
        let sex = text(Categorical::Sex);
        let chest_pain_type = text(Categorical::ChestPainType);
        let resting_ecg = text(Categorical::RestingEcg);
        let exercise_angina = text(Categorical::ExerciseAngina);
        let st_slope = text(Categorical::StSlope);

        let mut number = |field: Numeric| match fields.get(field.name()) {
            Some(raw) => raw.trim().parse::<f64>().unwrap_or_else(|_| {
                errors.push(format!("{} '{}' is not a number", field.name(), raw));
                f64::NAN
            }),
            None => {
                errors.push(format!("{} is missing", field.name()));
                f64::NAN
            }
        };
        let age = number(Numeric::Age);
        let resting_bp = number(Numeric::RestingBp);
        let cholesterol = number(Numeric::Cholesterol);
        let fasting_bs = number(Numeric::FastingBs);
        let max_hr = number(Numeric::MaxHr);
        let oldpeak = number(Numeric::Oldpeak);

        if !errors.is_empty() {
            return Err(PredictError::InvalidInput(errors.join("; ")));
        }

        Ok(Self {
            age,
            sex,
            chest_pain_type,
            resting_bp,
            cholesterol,
            fasting_bs,
            resting_ecg,
            max_hr,
            exercise_angina,
            oldpeak,
            st_slope,
        })
    }

    /// Check every numeric field against its accepted range.
    ///
    /// All violations are reported together. Categorical values are left to
    /// the encoders.
    pub fn validate(&self) -> Result<(), PredictError> {
        let mut errors = Vec::new();

        for field in Numeric::ALL {
            let value = self.numeric(field);
            let spec = field.spec();

            if !value.is_finite() {
                errors.push(format!("{} must be a finite number", field.name()));
            } else if !(spec.min..=spec.max).contains(&value) {
                errors.push(format!(
                    "{} {} out of range [{}, {}]",
                    field.name(),
                    value,
                    spec.min,
                    spec.max
                ));
            } else if spec.integer && value.fract() != 0.0 {
                errors.push(format!(
                    "{} {} must be a whole number",
                    field.name(),
                    value
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PredictError::InvalidInput(errors.join("; ")))
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> PatientRecord {
    PatientRecord {
        age: 50.0,
        sex: "M".to_string(),
        chest_pain_type: "ATA".to_string(),
        resting_bp: 120.0,
        cholesterol: 200.0,
        fasting_bs: 0.0,
        resting_ecg: "Normal".to_string(),
        max_hr: 150.0,
        exercise_angina: "N".to_string(),
        oldpeak: 1.0,
        st_slope: "Up".to_string(),
    }
}
