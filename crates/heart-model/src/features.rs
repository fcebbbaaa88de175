//! Encoded feature containers and the classifier output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Sparse `column -> value` mapping produced by the feature encoder.
///
/// Only the active one-hot column of each categorical field is present;
/// every absent column is read as 0 downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseRecord {
    values: BTreeMap<String, f64>,
}

impl SparseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Columns in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for SparseRecord {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Dense feature vector in feature-schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignedVector {
    values: Vec<f64>,
}

impl AlignedVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl AsRef<[f64]> for AlignedVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RiskLabel {
    Low,
    High,
}

impl RiskLabel {
    /// Map the classifier's raw 0/1 output.
    ///
    /// # Errors
    ///
    /// Any other value is rejected.
    pub fn from_value(value: i64) -> Result<Self, ModelError> {
        match value {
            0 => Ok(RiskLabel::Low),
            1 => Ok(RiskLabel::High),
            other => Err(ModelError::InvalidRiskLabel(other)),
        }
    }

    pub fn value(self) -> u8 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::High => 1,
        }
    }

    pub fn is_high(self) -> bool {
        self == RiskLabel::High
    }

    /// Returns a human-readable description of the label.
    pub fn description(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk of Heart Disease",
            RiskLabel::High => "High Risk of Heart Disease",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<i64> for RiskLabel {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<RiskLabel> for i64 {
    fn from(label: RiskLabel) -> Self {
        i64::from(label.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_label_round_trips_through_integers() {
        assert_eq!(RiskLabel::from_value(1).unwrap(), RiskLabel::High);
        assert_eq!(RiskLabel::Low.value(), 0);
        assert!(RiskLabel::from_value(2).is_err());
        assert_eq!(serde_json::to_string(&RiskLabel::High).unwrap(), "1");
        assert!(serde_json::from_str::<RiskLabel>("3").is_err());
    }

    #[test]
    fn sparse_record_keys_are_sorted() {
        let mut record = SparseRecord::new();
        record.insert("Oldpeak", 1.0);
        record.insert("Age", 40.0);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Age", "Oldpeak"]);
        assert_eq!(record.get("Age"), Some(40.0));
        assert_eq!(record.get("Gender_F"), None);
    }
}
