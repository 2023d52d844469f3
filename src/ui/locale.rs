use crate::classifier::Diagnosis;
use crate::record::{Categorical, Feature, Numeric};
use std::str::FromStr;

/// Page language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Fr,
}

/// Static page text for one language
pub struct Strings {
    pub lang: &'static str,
    pub title: &'static str,
    pub predict_button: &'static str,
    pub yes_no: [&'static str; 2],
    pub present: &'static str,
    pub absent: &'static str,
    pub error_prefix: &'static str,
}

static EN: Strings = Strings {
    lang: "en",
    title: "Heart Disease Detection",
    predict_button: "Predict",
    yes_no: ["No", "Yes"],
    present: "Result: heart disease present.",
    absent: "Result: heart disease absent.",
    error_prefix: "Error while processing data",
};

static FR: Strings = Strings {
    lang: "fr",
    title: "Détection de Maladie Cardiaque",
    predict_button: "Prédire",
    yes_no: ["Non", "Oui"],
    present: "Résultat : présence de maladie cardiaque.",
    absent: "Résultat : absence de maladie cardiaque.",
    error_prefix: "Erreur lors du traitement des données",
};

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err(format!(
                "Unsupported language '{}' (expected one of: {})",
                s,
                Self::ALL
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl Language {
    pub const ALL: [Self; 2] = [Self::En, Self::Fr];

    pub fn as_str(&self) -> &'static str {
        self.strings().lang
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Fr => &FR,
        }
    }

    pub fn diagnosis_message(&self, diagnosis: Diagnosis) -> &'static str {
        match diagnosis {
            Diagnosis::Present => self.strings().present,
            Diagnosis::Absent => self.strings().absent,
        }
    }

    pub fn error_message(&self, error: &str) -> String {
        format!("{}: {}", self.strings().error_prefix, error)
    }

    /// Input label for a field
    pub fn label(&self, feature: Feature) -> &'static str {
        match (self, feature) {
            (Self::En, Feature::Numeric(n)) => match n {
                Numeric::Age => "Age",
                Numeric::RestingBp => "Resting blood pressure",
                Numeric::Cholesterol => "Cholesterol",
                Numeric::FastingBs => "Fasting blood sugar > 120 mg/dl?",
                Numeric::MaxHr => "Maximum heart rate",
                Numeric::Oldpeak => "Oldpeak",
            },
            (Self::En, Feature::Categorical(c)) => match c {
                Categorical::Sex => "Sex",
                Categorical::ChestPainType => "Chest pain type",
                Categorical::RestingEcg => "Resting ECG",
                Categorical::ExerciseAngina => "Exercise-induced angina?",
                Categorical::StSlope => "ST slope",
            },
            (Self::Fr, Feature::Numeric(n)) => match n {
                Numeric::Age => "Âge",
                Numeric::RestingBp => "Pression artérielle au repos",
                Numeric::Cholesterol => "Cholestérol",
                Numeric::FastingBs => "Glycémie à jeun > 120 mg/dl ?",
                Numeric::MaxHr => "Fréquence cardiaque maximale",
                Numeric::Oldpeak => "Oldpeak",
            },
            (Self::Fr, Feature::Categorical(c)) => match c {
                Categorical::Sex => "Sexe",
                Categorical::ChestPainType => "Type de douleur thoracique",
                Categorical::RestingEcg => "ECG au repos",
                Categorical::ExerciseAngina => "Angine à l’effort ?",
                Categorical::StSlope => "Pente ST",
            },
        }
    }
}
