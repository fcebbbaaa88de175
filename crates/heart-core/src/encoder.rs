//! Feature encoder: raw observation to sparse one-hot record.
//!
//! Numeric fields pass through under their schema names. Each categorical
//! field contributes exactly one key, `<Prefix>_<Value>`, set to 1.

use heart_model::{Categorical, NUMERIC_COLUMNS, RawObservation, SparseRecord};

/// Build the one-hot column name for a categorical value.
pub fn one_hot_key(prefix: &str, value: &str) -> String {
    format!("{prefix}_{value}")
}

/// One-hot column for a typed categorical value.
pub fn one_hot_column<C: Categorical>(value: C) -> String {
    one_hot_key(C::PREFIX, value.as_str())
}

/// Every one-hot column a categorical field can produce, in form order.
pub fn known_columns<C: Categorical>() -> Vec<String> {
    C::ALL.iter().map(|value| one_hot_column(*value)).collect()
}

/// Encode an observation into a sparse record.
///
/// The result always holds the six numeric columns plus five one-hot keys.
pub fn encode(observation: &RawObservation) -> SparseRecord {
    let [age, resting_bp, cholesterol, fasting_bs, max_hr, oldpeak] = NUMERIC_COLUMNS;

    let mut record = SparseRecord::new();
    record.insert(age, f64::from(observation.age));
    record.insert(resting_bp, f64::from(observation.resting_bp));
    record.insert(cholesterol, f64::from(observation.cholesterol));
    record.insert(fasting_bs, f64::from(observation.fasting_bs_value()));
    record.insert(max_hr, f64::from(observation.max_hr));
    record.insert(oldpeak, observation.oldpeak);

    record.insert(one_hot_column(observation.gender), 1.0);
    record.insert(one_hot_column(observation.chest_pain), 1.0);
    record.insert(one_hot_column(observation.resting_ecg), 1.0);
    record.insert(one_hot_column(observation.exercise_angina), 1.0);
    record.insert(one_hot_column(observation.st_slope), 1.0);
    record
}
