//! Fitted binary classifiers loaded from `classifier.json`.

use std::cmp::Ordering;

use heart_model::{AdapterError, Classifier, FeatureSchema, RiskLabel, check_dimension};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Serialized classifier, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierArtifact {
    Knn(KnnClassifier),
    Logistic(LogisticClassifier),
}

/// k-nearest-neighbours vote over stored, already-scaled training rows.
///
/// Euclidean distance with uniform weights. Neighbours at equal distance
/// are taken in sample order; a tied vote resolves to the lower label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnClassifier {
    pub n_neighbors: usize,
    pub samples: Vec<Vec<f64>>,
    pub labels: Vec<RiskLabel>,
}

/// Logistic regression: `High` when `sigmoid(w . x + b) >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Knn(_) => "knn",
            Self::Logistic(_) => "logistic",
        }
    }

    /// Number of stored training rows (KNN only).
    pub fn sample_count(&self) -> Option<usize> {
        match self {
            Self::Knn(knn) => Some(knn.samples.len()),
            Self::Logistic(_) => None,
        }
    }

    /// Check the fitted dimensions against the schema.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<(), ArtifactError> {
        let expected = schema.len();
        match self {
            Self::Knn(knn) => {
                if knn.samples.is_empty() {
                    return Err(ArtifactError::inconsistent(
                        "classifier",
                        "knn has no training samples",
                    ));
                }
                if knn.labels.len() != knn.samples.len() {
                    return Err(ArtifactError::inconsistent(
                        "classifier",
                        format!(
                            "{} labels for {} samples",
                            knn.labels.len(),
                            knn.samples.len()
                        ),
                    ));
                }
                if knn.n_neighbors == 0 || knn.n_neighbors > knn.samples.len() {
                    return Err(ArtifactError::inconsistent(
                        "classifier",
                        format!(
                            "n_neighbors {} must be between 1 and {}",
                            knn.n_neighbors,
                            knn.samples.len()
                        ),
                    ));
                }
                if let Some((index, row)) = knn
                    .samples
                    .iter()
                    .enumerate()
                    .find(|(_, row)| row.len() != expected)
                {
                    return Err(ArtifactError::inconsistent(
                        "classifier",
                        format!(
                            "sample {index} has {} features, schema has {expected} columns",
                            row.len()
                        ),
                    ));
                }
            }
            Self::Logistic(logistic) => {
                if logistic.coefficients.len() != expected {
                    return Err(ArtifactError::inconsistent(
                        "classifier",
                        format!(
                            "{} coefficients, schema has {expected} columns",
                            logistic.coefficients.len()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, features: &[f64]) -> Result<RiskLabel, AdapterError> {
        match self {
            Self::Knn(knn) => knn.predict(features),
            Self::Logistic(logistic) => logistic.predict(features),
        }
    }

    fn name(&self) -> &str {
        self.kind()
    }
}

impl KnnClassifier {
    fn predict(&self, features: &[f64]) -> Result<RiskLabel, AdapterError> {
        let width = self.samples.first().map_or(0, Vec::len);
        check_dimension(width, features)?;

        let mut neighbours: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(index, row)| (squared_distance(row, features), index))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut high = 0usize;
        let mut low = 0usize;
        for (_, index) in neighbours.iter().take(self.n_neighbors) {
            match self.labels.get(*index) {
                Some(RiskLabel::High) => high += 1,
                Some(RiskLabel::Low) => low += 1,
                None => {
                    return Err(AdapterError::Message(format!(
                        "no label for training sample {index}"
                    )));
                }
            }
        }
        Ok(match high.cmp(&low) {
            Ordering::Greater => RiskLabel::High,
            Ordering::Less | Ordering::Equal => RiskLabel::Low,
        })
    }
}

impl LogisticClassifier {
    /// Probability of the `High` class.
    pub fn probability(&self, features: &[f64]) -> Result<f64, AdapterError> {
        check_dimension(self.coefficients.len(), features)?;
        let z: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn predict(&self, features: &[f64]) -> Result<RiskLabel, AdapterError> {
        let p = self.probability(features)?;
        Ok(if p >= self.threshold {
            RiskLabel::High
        } else {
            RiskLabel::Low
        })
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
