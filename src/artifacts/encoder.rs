use super::read_json;
use crate::error::PredictError;
use crate::record::Categorical;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LabelEncoderArtifact {
    classes: Vec<String>,
}

/// Fitted label encoder: the code of a value is its index in `classes`
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, PredictError> {
        if classes.is_empty() {
            return Err(PredictError::ArtifactError(
                "Encoder vocabulary is empty".to_string(),
            ));
        }

        let duplicate = {
            let mut seen = HashSet::new();
            classes.iter().find(|c| !seen.insert(c.as_str())).cloned()
        };
        if let Some(dup) = duplicate {
            return Err(PredictError::ArtifactError(format!(
                "Encoder vocabulary contains '{}' twice",
                dup
            )));
        }

        Ok(Self { classes })
    }

    /// Known vocabulary, in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, field: Categorical, value: &str) -> Result<f64, PredictError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|code| code as f64)
            .ok_or_else(|| PredictError::UnrecognizedValue {
                field: field.name().to_string(),
                value: value.to_string(),
                expected: self.classes.join(", "),
            })
    }
}

/// One label encoder per categorical field
#[derive(Debug, Clone)]
pub struct EncoderSet {
    encoders: HashMap<Categorical, LabelEncoder>,
}

impl EncoderSet {
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let raw: HashMap<String, LabelEncoderArtifact> = read_json(path)?;
        let set = Self::from_vocabularies(
            raw.into_iter().map(|(name, artifact)| (name, artifact.classes)),
        )
        .map_err(|e| e.context(path.display()))?;

        tracing::info!(
            "Loaded {} encoders from {}",
            set.encoders.len(),
            path.display()
        );
        Ok(set)
    }

    /// Build the set from field name -> vocabulary pairs.
    ///
    /// Every categorical field must be present; unknown names are skipped.
    pub fn from_vocabularies<I>(vocabularies: I) -> Result<Self, PredictError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut by_name: HashMap<String, Vec<String>> = vocabularies.into_iter().collect();
        let mut encoders = HashMap::new();

        for field in Categorical::ALL {
            let classes = by_name.remove(field.name()).ok_or_else(|| {
                PredictError::ArtifactError(format!("Missing encoder for {}", field.name()))
            })?;
            let encoder = LabelEncoder::new(classes)
                .map_err(|e| e.context(format_args!("{} encoder", field.name())))?;
            encoders.insert(field, encoder);
        }

        for name in by_name.keys() {
            tracing::warn!("Ignoring encoder for unknown field {}", name);
        }

        Ok(Self { encoders })
    }

    pub fn get(&self, field: Categorical) -> &LabelEncoder {
        // Every field is inserted by from_vocabularies
        &self.encoders[&field]
    }

    pub fn encode(&self, field: Categorical, value: &str) -> Result<f64, PredictError> {
        self.get(field).transform(field, value)
    }
}

#[cfg(test)]
pub(crate) fn sample_encoders() -> EncoderSet {
    let vocab = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
    EncoderSet::from_vocabularies([
        ("Sex".to_string(), vocab(&["F", "M"])),
        ("ChestPainType".to_string(), vocab(&["ASY", "ATA", "NAP", "TA"])),
        ("RestingECG".to_string(), vocab(&["LVH", "Normal", "ST"])),
        ("ExerciseAngina".to_string(), vocab(&["N", "Y"])),
        ("ST_Slope".to_string(), vocab(&["Down", "Flat", "Up"])),
    ])
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_code_is_vocabulary_index() {
        let encoders = sample_encoders();
        assert_eq!(encoders.encode(Categorical::ChestPainType, "ASY").unwrap(), 0.0);
        assert_eq!(encoders.encode(Categorical::ChestPainType, "TA").unwrap(), 3.0);
        assert_eq!(encoders.encode(Categorical::StSlope, "Up").unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_value_is_not_recognized() {
        let encoders = sample_encoders();
        let err = encoders.encode(Categorical::Sex, "m").unwrap_err();
        match err {
            PredictError::UnrecognizedValue {
                field,
                value,
                expected,
            } => {
                assert_eq!(field, "Sex");
                assert_eq!(value, "m");
                assert_eq!(expected, "F, M");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let err = LabelEncoder::new(vec!["N".to_string(), "N".to_string()]).unwrap_err();
        assert!(err.to_string().contains("'N' twice"));
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = EncoderSet::from_vocabularies([("Sex".to_string(), vec!["F".to_string()])])
            .unwrap_err();
        assert!(err.to_string().contains("Missing encoder for ChestPainType"));
    }

    #[test]
    fn test_load_from_file_ignores_extra_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "Sex": {"classes": ["F", "M"]},
                "ChestPainType": {"classes": ["ASY", "ATA", "NAP", "TA"]},
                "RestingECG": {"classes": ["LVH", "Normal", "ST"]},
                "ExerciseAngina": {"classes": ["N", "Y"]},
                "ST_Slope": {"classes": ["Down", "Flat", "Up"]},
                "HeartDisease": {"classes": ["0", "1"]}
            }"#,
        )
        .unwrap();

        let encoders = EncoderSet::load(file.path()).unwrap();
        assert_eq!(encoders.get(Categorical::RestingEcg).classes(), ["LVH", "Normal", "ST"]);
    }

    #[test]
    fn test_load_reports_empty_vocabulary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "Sex": {"classes": []},
                "ChestPainType": {"classes": ["ASY"]},
                "RestingECG": {"classes": ["LVH"]},
                "ExerciseAngina": {"classes": ["N"]},
                "ST_Slope": {"classes": ["Up"]}
            }"#,
        )
        .unwrap();

        let err = EncoderSet::load(file.path()).unwrap_err().to_string();
        assert!(err.contains("Sex encoder: Encoder vocabulary is empty"), "{}", err);
    }
}
