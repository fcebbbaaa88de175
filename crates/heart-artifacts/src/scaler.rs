//! Fitted numeric transforms loaded from `scaler.json`.

use heart_model::{AdapterError, AlignedVector, FeatureSchema, Scaler, check_dimension};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Serialized scaler parameters.
///
/// `standard` mirrors a z-score scaler: `(x - mean) / scale` per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    /// Pass-through, for models trained on unscaled features.
    Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names seen at fit time, when the exporter recorded them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl ScalerArtifact {
    /// Check the fitted dimensions (and names, when present) against the schema.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<(), ArtifactError> {
        let Self::Standard(scaler) = self else {
            return Ok(());
        };
        let expected = schema.len();
        if scaler.mean.len() != expected || scaler.scale.len() != expected {
            return Err(ArtifactError::inconsistent(
                "scaler",
                format!(
                    "fitted on {} means / {} scales, schema has {expected} columns",
                    scaler.mean.len(),
                    scaler.scale.len()
                ),
            ));
        }
        if let Some(names) = &scaler.feature_names
            && names.as_slice() != schema.columns()
        {
            let first_diff = names
                .iter()
                .zip(schema.columns())
                .position(|(a, b)| a != b)
                .unwrap_or(names.len().min(expected));
            return Err(ArtifactError::inconsistent(
                "scaler",
                format!("feature names diverge from schema order at index {first_diff}"),
            ));
        }
        Ok(())
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, vector: &AlignedVector) -> Result<Vec<f64>, AdapterError> {
        match self {
            Self::Identity => Ok(vector.as_slice().to_vec()),
            Self::Standard(scaler) => scaler.transform_slice(vector.as_slice()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Standard(_) => "standard",
            Self::Identity => "identity",
        }
    }
}

impl StandardScaler {
    fn transform_slice(&self, values: &[f64]) -> Result<Vec<f64>, AdapterError> {
        check_dimension(self.mean.len(), values)?;
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / effective_scale(*scale))
            .collect())
    }
}

/// Constant columns were fit with a zero scale; divide by 1 instead.
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> ScalerArtifact {
        ScalerArtifact::Standard(StandardScaler {
            mean: vec![50.0, 0.5],
            scale: vec![10.0, 0.0],
            feature_names: None,
        })
    }

    #[test]
    fn standardizes_each_column() {
        let out = scaler()
            .transform(&AlignedVector::new(vec![60.0, 1.0]))
            .unwrap();
        assert_eq!(out, vec![1.0, 0.5]);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = scaler()
            .transform(&AlignedVector::new(vec![1.0]))
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn parses_tagged_json() {
        let parsed: ScalerArtifact = serde_json::from_str(
            r#"{"kind":"standard","mean":[1.0],"scale":[2.0],"feature_names":["Age"]}"#,
        )
        .unwrap();
        let schema = FeatureSchema::new(["Age"]).unwrap();
        assert!(parsed.check_schema(&schema).is_ok());

        let identity: ScalerArtifact = serde_json::from_str(r#"{"kind":"identity"}"#).unwrap();
        assert_eq!(identity, ScalerArtifact::Identity);
    }

    #[test]
    fn detects_reordered_feature_names() {
        let artifact = ScalerArtifact::Standard(StandardScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
            feature_names: Some(vec!["MaxHR".to_string(), "Age".to_string()]),
        });
        let schema = FeatureSchema::new(["Age", "MaxHR"]).unwrap();
        let err = artifact.check_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }
}
