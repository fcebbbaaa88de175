//! The assessment report assembled from a finished session.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use heart_core::{AnalysisStage, SessionContext};
use heart_model::{ChatMessage, ChatRole, PatientProfile, RawObservation, RiskLabel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub profile: PatientProfile,
    pub observation: RawObservation,
    pub label: RiskLabel,
    /// AI tips, when they were requested and succeeded.
    pub tips: Option<String>,
    /// Follow-up conversation. System messages and the assistant turn that
    /// carried `tips` are left out.
    pub transcript: Vec<ChatMessage>,
}

impl AssessmentReport {
    /// Snapshot a session whose last analysis succeeded.
    ///
    /// # Errors
    ///
    /// Fails unless the session is in `ResultReady` with a patient profile.
    pub fn from_session(session: &SessionContext, generated_at: DateTime<Utc>) -> Result<Self> {
        if session.stage() != AnalysisStage::ResultReady {
            bail!(
                "no assessment to report: session is {}, expected {}",
                session.stage(),
                AnalysisStage::ResultReady
            );
        }
        let Some(prediction) = session.prediction() else {
            bail!("no assessment to report: session holds no prediction");
        };
        let Some(profile) = session.profile() else {
            bail!("no assessment to report: patient name and symptoms are missing");
        };

        let mut transcript: Vec<ChatMessage> = session.transcript().cloned().collect();
        if let Some(tips) = session.tips()
            && let Some(index) = transcript
                .iter()
                .position(|m| m.role == ChatRole::Assistant && m.content == tips)
        {
            transcript.remove(index);
        }

        Ok(Self {
            generated_at,
            profile: profile.clone(),
            observation: prediction.observation.clone(),
            label: prediction.label,
            tips: session.tips().map(str::to_string),
            transcript,
        })
    }
}
