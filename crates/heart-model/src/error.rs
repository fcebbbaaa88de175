use thiserror::Error;

/// Errors raised while constructing model types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown {field} value: {value}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("feature schema is empty")]
    EmptySchema,

    #[error("duplicate column in feature schema: {0}")]
    DuplicateColumn(String),

    #[error("invalid risk label value: {0} (expected 0 or 1)")]
    InvalidRiskLabel(i64),

    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Errors raised by a scaler or classifier while processing a vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    #[error("expected a vector of {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite value at feature index {index}")]
    NonFinite { index: usize },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
