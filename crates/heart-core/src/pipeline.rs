//! Per-request inference pipeline.
//!
//! Stages run strictly in order and synchronously:
//!
//! 1. **CollectingInput** - require a profile, range-check the observation
//! 2. **Encoding** - build the sparse one-hot record
//! 3. **Aligning** - fill and order against the feature schema
//! 4. **Scaling** - apply the fitted scaler
//! 5. **Classifying** - apply the fitted classifier
//!
//! The pipeline itself is immutable and can be shared across sessions; all
//! per-request state lives in the caller's [`SessionContext`].

use std::sync::Arc;

use heart_model::{AlignedVector, Classifier, FeatureSchema, RawObservation, RiskLabel, Scaler};
use tracing::{debug, info, info_span, warn};

use crate::align::{UnmatchedKeyPolicy, align_with_policy};
use crate::encoder::encode;
use crate::error::{PipelineError, StageError};
use crate::session::SessionContext;
use crate::stage::AnalysisStage;

/// Successful outcome of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: RiskLabel,
    pub observation: RawObservation,
    pub aligned: AlignedVector,
}

/// Encoder, aligner and the two fitted adapters, wired together.
#[derive(Clone)]
pub struct InferencePipeline {
    schema: Arc<FeatureSchema>,
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
    policy: UnmatchedKeyPolicy,
}

impl std::fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("columns", &self.schema.len())
            .field("scaler", &self.scaler.name())
            .field("classifier", &self.classifier.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl InferencePipeline {
    pub fn new(
        schema: Arc<FeatureSchema>,
        scaler: Arc<dyn Scaler>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            schema,
            scaler,
            classifier,
            policy: UnmatchedKeyPolicy::default(),
        }
    }

    /// Sets how encoded columns missing from the schema are handled.
    pub fn with_policy(mut self, policy: UnmatchedKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn policy(&self) -> UnmatchedKeyPolicy {
        self.policy
    }

    /// Scale and classify an already aligned vector.
    ///
    /// Neither adapter holds mutable state, so repeated calls with the same
    /// vector return the same label.
    pub fn classify(&self, aligned: &AlignedVector) -> Result<RiskLabel, PipelineError> {
        let scaled = self
            .scaler
            .transform(aligned)
            .map_err(|e| PipelineError::new(AnalysisStage::Scaling, e))?;
        self.classifier
            .predict(&scaled)
            .map_err(|e| PipelineError::new(AnalysisStage::Classifying, e))
    }

    /// Run one analysis, driving the session through every stage.
    ///
    /// The session must hold a profile from
    /// [`SessionContext::begin_analysis`]; without one the run fails while
    /// collecting input.
    ///
    /// On success the session ends in `ResultReady` holding the prediction.
    /// On failure it ends in `Idle` with the error message recorded and no
    /// prediction.
    pub fn analyze(
        &self,
        observation: &RawObservation,
        session: &mut SessionContext,
    ) -> Result<Prediction, PipelineError> {
        let span = info_span!("analyze", columns = self.schema.len());
        let _guard = span.enter();

        session.begin_run();
        match self.run_stages(observation, session) {
            Ok(prediction) => {
                info!(label = prediction.label.value(), "analysis complete");
                session.complete(prediction.clone());
                Ok(prediction)
            }
            Err(error) => {
                warn!(stage = %error.stage, error = %error.source, "analysis failed");
                session.fail(error.to_string());
                Err(error)
            }
        }
    }

    fn run_stages(
        &self,
        observation: &RawObservation,
        session: &mut SessionContext,
    ) -> Result<Prediction, PipelineError> {
        if session.profile().is_none() {
            return Err(PipelineError::new(
                AnalysisStage::CollectingInput,
                StageError::MissingProfile,
            ));
        }
        observation.validate().map_err(|errors| {
            PipelineError::new(
                AnalysisStage::CollectingInput,
                StageError::InvalidObservation(errors),
            )
        })?;

        session.enter(AnalysisStage::Encoding);
        let record = encode(observation);
        debug!(keys = record.len(), "encoded observation");

        session.enter(AnalysisStage::Aligning);
        let aligned = align_with_policy(&record, &self.schema, self.policy)
            .map_err(|e| PipelineError::new(AnalysisStage::Aligning, e))?;
        debug!(len = aligned.len(), "aligned feature vector");

        session.enter(AnalysisStage::Scaling);
        let scaled = self
            .scaler
            .transform(&aligned)
            .map_err(|e| PipelineError::new(AnalysisStage::Scaling, e))?;
        debug!(scaler = self.scaler.name(), "scaled feature vector");

        session.enter(AnalysisStage::Classifying);
        let label = self
            .classifier
            .predict(&scaled)
            .map_err(|e| PipelineError::new(AnalysisStage::Classifying, e))?;
        debug!(classifier = self.classifier.name(), "classified");

        Ok(Prediction {
            label,
            observation: observation.clone(),
            aligned,
        })
    }
}
