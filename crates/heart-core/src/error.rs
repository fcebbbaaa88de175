use heart_model::{AdapterError, ModelError};
use thiserror::Error;

use crate::stage::AnalysisStage;

/// Why a single pipeline stage failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("patient name and symptoms are required before analysis")]
    MissingProfile,

    #[error("invalid observation: {}", join_errors(.0))]
    InvalidObservation(Vec<ModelError>),

    #[error("encoded columns not in feature schema: {}", .columns.join(", "))]
    UnmatchedColumns { columns: Vec<String> },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// A failed analysis, tagged with the stage that raised.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: AnalysisStage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: AnalysisStage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

fn join_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
