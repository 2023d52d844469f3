use crate::artifacts::scaler::SCALED_COLUMNS;
use crate::artifacts::Scaler;
use crate::record::{Numeric, PatientRecord};

/// Apply the fitted scaler to the numeric fields.
///
/// Values come back in scaler column order (`Numeric::ALL`).
pub fn apply(record: &PatientRecord, scaler: &Scaler) -> [f64; SCALED_COLUMNS] {
    let row = Numeric::ALL.map(|field| record.numeric(field));
    scaler.transform(&row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample_record;

    #[test]
    fn test_scales_numeric_columns() {
        let scaler = Scaler::Standard {
            mean: [50.0, 120.0, 200.0, 0.0, 150.0, 1.0],
            scale: [1.0; SCALED_COLUMNS],
        };
        let scaled = apply(&sample_record(), &scaler);
        assert_eq!(scaled, [0.0; SCALED_COLUMNS]);
    }

    #[test]
    fn test_fasting_bs_is_scaled() {
        let scaler = Scaler::Standard {
            mean: [0.0, 0.0, 0.0, 0.5, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0, 0.5, 1.0, 1.0],
        };
        let scaled = apply(&sample_record(), &scaler);
        assert_eq!(scaled[Numeric::FastingBs.column()], -1.0);
    }
}
