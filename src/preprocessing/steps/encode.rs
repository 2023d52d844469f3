use crate::artifacts::EncoderSet;
use crate::error::PredictError;
use crate::record::{Categorical, PatientRecord};

/// Replace each categorical value with its fitted integer code.
///
/// Codes come back in `Categorical::ALL` order. Fails on the first value
/// outside its encoder's vocabulary.
pub fn apply(record: &PatientRecord, encoders: &EncoderSet) -> Result<[f64; 5], PredictError> {
    let mut codes = [0.0; 5];
    for (slot, field) in codes.iter_mut().zip(Categorical::ALL) {
        *slot = encoders.encode(field, record.categorical(field))?;
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::encoder::sample_encoders;
    use crate::record::sample_record;

    #[test]
    fn test_encodes_in_field_order() {
        let codes = apply(&sample_record(), &sample_encoders()).unwrap();
        // Sex=M, ChestPainType=ATA, RestingECG=Normal, ExerciseAngina=N, ST_Slope=Up
        assert_eq!(codes, [1.0, 1.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_unknown_value_fails() {
        let mut record = sample_record();
        record.st_slope = "Sideways".to_string();

        let err = apply(&record, &sample_encoders()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::UnrecognizedValue { ref field, .. } if field == "ST_Slope"
        ));
    }
}
