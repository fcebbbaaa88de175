//! Assessment driver shared by the commands: load artifacts, analyze,
//! fetch advice, and hold the follow-up conversation.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use heart_advisor::{AdvisorError, HealthAdvisor, TipsRequest};
use heart_artifacts::{ArtifactRegistry, VerifySummary};
use heart_core::{InferencePipeline, Prediction, SessionContext, UnmatchedKeyPolicy};
use heart_model::{PatientProfile, RawObservation};
use tracing::{debug, info, trace, warn};

use crate::logging::redact_value;

/// Verify the artifact bundle and wire it into a pipeline.
pub fn load_pipeline(
    artifacts_dir: &Path,
    policy: UnmatchedKeyPolicy,
) -> Result<(ArtifactRegistry, VerifySummary, InferencePipeline)> {
    let (registry, summary) = ArtifactRegistry::verify_and_load(artifacts_dir)
        .with_context(|| format!("load artifacts from {}", artifacts_dir.display()))?;
    let pipeline = InferencePipeline::new(
        registry.schema.clone(),
        registry.scaler_port(),
        registry.classifier_port(),
    )
    .with_policy(policy);
    info!(
        model = %summary.manifest_pins.model,
        columns = summary.schema_columns,
        classifier = %summary.classifier_kind,
        "artifacts verified"
    );
    Ok((registry, summary, pipeline))
}

/// Result of one assessment, including the optional AI commentary.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    pub prediction: Prediction,
    pub tips: Option<String>,
    /// Shown to the user when tips were requested but could not be fetched.
    pub advice_error: Option<String>,
}

/// Run one assessment for `profile`.
///
/// An advisor failure does not undo the prediction; it is reported through
/// [`AssessmentOutcome::advice_error`].
pub fn run_assessment(
    pipeline: &InferencePipeline,
    advisor: Option<&dyn HealthAdvisor>,
    profile: PatientProfile,
    observation: &RawObservation,
    session: &mut SessionContext,
) -> Result<AssessmentOutcome> {
    debug!(patient = redact_value(&profile.name), "starting assessment");
    session
        .begin_analysis(profile)
        .context("please enter your name and symptoms")?;
    let prediction = pipeline
        .analyze(observation, session)
        .context("heart risk analysis failed")?;
    trace!(features = ?redact_features(&prediction), "aligned features");

    let mut outcome = AssessmentOutcome {
        prediction,
        tips: None,
        advice_error: None,
    };
    if let Some(advisor) = advisor {
        let request = TipsRequest::new(observation.clone(), outcome.prediction.label);
        match advisor.health_tips(&request) {
            Ok(tips) => {
                session.set_tips(tips.clone());
                outcome.tips = Some(tips);
            }
            Err(error) => {
                warn!(%error, retryable = error.is_retryable(), "health tips unavailable");
                outcome.advice_error = Some(error.user_message().to_string());
            }
        }
    }
    Ok(outcome)
}

fn redact_features(prediction: &Prediction) -> Vec<String> {
    prediction
        .aligned
        .as_slice()
        .iter()
        .map(|value| redact_value(&value.to_string()).to_string())
        .collect()
}

/// Send one user message and record the reply in the session.
///
/// The user message stays in the history when the advisor fails.
pub fn chat_turn(
    advisor: &dyn HealthAdvisor,
    session: &mut SessionContext,
    message: &str,
) -> Result<String, AdvisorError> {
    session.push_user(message);
    let reply = advisor.chat(session.messages())?;
    session.push_assistant(reply.clone());
    Ok(reply)
}

/// Line-oriented chat until EOF, `exit` or `quit`. Returns the number of
/// answered messages.
pub fn chat_loop(
    advisor: &dyn HealthAdvisor,
    session: &mut SessionContext,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<usize> {
    let mut answered = 0;
    let mut line = String::new();
    loop {
        write!(output, "you> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line).context("read chat input")? == 0 {
            writeln!(output)?;
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        match chat_turn(advisor, session, message) {
            Ok(reply) => {
                writeln!(output, "HeartAlert> {reply}")?;
                answered += 1;
            }
            Err(error) => {
                warn!(%error, "chat request failed");
                writeln!(output, "HeartAlert> {}", error.user_message())?;
            }
        }
    }
    Ok(answered)
}
