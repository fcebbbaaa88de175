//! The ordered column list a trained model expects.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ModelError;

/// Numeric columns, in the order the encoder emits them.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "Age",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "MaxHR",
    "Oldpeak",
];

/// Ordered, duplicate-free list of feature column names.
///
/// The order is the one the scaler and classifier were fit with and must
/// never be changed after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
    #[serde(skip)]
    positions: BTreeMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from column names.
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or a column repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut positions = BTreeMap::new();
        for (index, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), index).is_some() {
                return Err(ModelError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Index of a column in the schema order.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_schema() {
        let err = FeatureSchema::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, ModelError::EmptySchema);
    }

    #[test]
    fn rejects_duplicates() {
        let err = FeatureSchema::new(["Age", "MaxHR", "Age"]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateColumn("Age".to_string()));
    }

    #[test]
    fn keeps_order_and_positions() {
        let schema = FeatureSchema::new(["MaxHR", "Age", "Gender_F"]).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("Age"), Some(1));
        assert_eq!(schema.position("Gender_M"), None);
        assert!(schema.contains("Gender_F"));
        assert_eq!(
            schema.iter().collect::<Vec<_>>(),
            vec!["MaxHR", "Age", "Gender_F"]
        );
    }
}
