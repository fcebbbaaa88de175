//! Raw observations captured by the assessment form.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::enums::{ChestPainType, ExerciseAngina, Gender, RestingEcg, StSlope};
use crate::error::ModelError;

/// Accepted age in years.
pub const AGE_RANGE: RangeInclusive<u16> = 18..=100;
/// Accepted resting blood pressure in mm Hg.
pub const RESTING_BP_RANGE: RangeInclusive<u16> = 80..=200;
/// Accepted serum cholesterol in mg/dL.
pub const CHOLESTEROL_RANGE: RangeInclusive<u16> = 100..=600;
/// Accepted maximum heart rate in bpm.
pub const MAX_HR_RANGE: RangeInclusive<u16> = 60..=220;
/// Accepted ST depression (oldpeak).
pub const OLDPEAK_RANGE: RangeInclusive<f64> = 0.0..=6.0;

/// One set of vital-sign inputs for a single analysis request.
///
/// Numeric fields are expected to be inside the `*_RANGE` constants. The
/// form layer enforces that with [`RawObservation::validate`]; the encoder
/// itself does not re-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub age: u16,
    pub resting_bp: u16,
    pub cholesterol: u16,
    /// Fasting blood sugar above 120 mg/dL.
    pub fasting_bs: bool,
    pub max_hr: u16,
    pub oldpeak: f64,
    pub gender: Gender,
    pub chest_pain: ChestPainType,
    pub resting_ecg: RestingEcg,
    pub exercise_angina: ExerciseAngina,
    pub st_slope: StSlope,
}

impl Default for RawObservation {
    /// The form's initial values.
    fn default() -> Self {
        Self {
            age: 40,
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: false,
            max_hr: 150,
            oldpeak: 1.0,
            gender: Gender::Male,
            chest_pain: ChestPainType::Ata,
            resting_ecg: RestingEcg::Normal,
            exercise_angina: ExerciseAngina::No,
            st_slope: StSlope::Up,
        }
    }
}

impl RawObservation {
    /// Check every numeric field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns all violations found, not just the first one.
    pub fn validate(&self) -> Result<(), Vec<ModelError>> {
        let mut errors = Vec::new();
        check_range("age", self.age, &AGE_RANGE, &mut errors);
        check_range("resting BP", self.resting_bp, &RESTING_BP_RANGE, &mut errors);
        check_range("cholesterol", self.cholesterol, &CHOLESTEROL_RANGE, &mut errors);
        check_range("max HR", self.max_hr, &MAX_HR_RANGE, &mut errors);
        if !self.oldpeak.is_finite() || !OLDPEAK_RANGE.contains(&self.oldpeak) {
            errors.push(ModelError::OutOfRange {
                field: "oldpeak",
                value: self.oldpeak,
                min: *OLDPEAK_RANGE.start(),
                max: *OLDPEAK_RANGE.end(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fasting blood sugar flag as the 0/1 value the model was trained on.
    pub fn fasting_bs_value(&self) -> u8 {
        u8::from(self.fasting_bs)
    }
}

fn check_range(
    field: &'static str,
    value: u16,
    range: &RangeInclusive<u16>,
    errors: &mut Vec<ModelError>,
) {
    if !range.contains(&value) {
        errors.push(ModelError::OutOfRange {
            field,
            value: f64::from(value),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RawObservation::default().validate().is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let observation = RawObservation {
            age: 17,
            max_hr: 221,
            oldpeak: 6.5,
            ..RawObservation::default()
        };
        let errors = observation.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].to_string(), "age 17 out of range [18, 100]");
    }

    #[test]
    fn nan_oldpeak_is_rejected() {
        let observation = RawObservation {
            oldpeak: f64::NAN,
            ..RawObservation::default()
        };
        assert!(observation.validate().is_err());
    }
}
