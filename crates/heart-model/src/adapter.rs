//! Ports for the pre-fit numeric transform and classifier.
//!
//! Implementations are loaded once at startup and shared read-only by every
//! request, so both traits take `&self` and require `Send + Sync`.

use crate::error::AdapterError;
use crate::features::{AlignedVector, RiskLabel};

/// A fitted numeric transform applied to an aligned vector.
pub trait Scaler: Send + Sync {
    /// Transform `vector`, returning a vector of the same length.
    fn transform(&self, vector: &AlignedVector) -> Result<Vec<f64>, AdapterError>;

    /// Human-readable name for this scaler (for logging).
    fn name(&self) -> &str;
}

/// A fitted binary classifier applied to a scaled vector.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<RiskLabel, AdapterError>;

    /// Human-readable name for this classifier (for logging).
    fn name(&self) -> &str;
}

/// Reject vectors whose length does not match the fitted dimension.
pub fn check_dimension(expected: usize, values: &[f64]) -> Result<(), AdapterError> {
    if values.len() != expected {
        return Err(AdapterError::DimensionMismatch {
            expected,
            actual: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(AdapterError::NonFinite { index });
    }
    Ok(())
}
