//! Session-scoped state for one user.
//!
//! Holds everything the assessment UI keeps between actions: the chat
//! history, patient profile, last prediction and AI tips, and where the
//! current analysis stands. It is owned by the caller and passed into each
//! operation, so nothing here is global.

use heart_model::{ChatMessage, ChatRole, ModelError, PatientProfile};

use crate::pipeline::Prediction;
use crate::stage::AnalysisStage;

/// System prompt that seeds every conversation.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a caring heart health assistant.";

#[derive(Debug, Clone)]
pub struct SessionContext {
    messages: Vec<ChatMessage>,
    profile: Option<PatientProfile>,
    prediction: Option<Prediction>,
    tips: Option<String>,
    stage: AnalysisStage,
    last_error: Option<String>,
    /// Stages entered during the most recent run, in order.
    executed_stages: Vec<AnalysisStage>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::system(ASSISTANT_SYSTEM_PROMPT)],
            profile: None,
            prediction: None,
            tips: None,
            stage: AnalysisStage::Idle,
            last_error: None,
            executed_stages: Vec::new(),
        }
    }

    pub fn stage(&self) -> AnalysisStage {
        self.stage
    }

    /// Message of the last failed run, cleared when a new run starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn prediction_made(&self) -> bool {
        self.prediction.is_some()
    }

    pub fn executed_stages(&self) -> &[AnalysisStage] {
        &self.executed_stages
    }

    pub fn profile(&self) -> Option<&PatientProfile> {
        self.profile.as_ref()
    }

    /// Record who the next analysis is for.
    ///
    /// # Errors
    ///
    /// Name and symptoms must both be non-blank; the previous profile is kept
    /// when they are not.
    pub fn begin_analysis(&mut self, profile: PatientProfile) -> Result<(), ModelError> {
        let profile = PatientProfile::new(&profile.name, &profile.symptoms)?;
        self.profile = Some(profile);
        Ok(())
    }

    pub fn tips(&self) -> Option<&str> {
        self.tips.as_deref()
    }

    /// Store AI tips for the current prediction and add them to the chat.
    pub fn set_tips(&mut self, tips: impl Into<String>) {
        let tips = tips.into();
        self.messages.push(ChatMessage::assistant(tips.clone()));
        self.tips = Some(tips);
    }

    /// Full history, including the system prompt.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// History without system messages, as shown to the user.
    pub fn transcript(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|message| message.role != ChatRole::System)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Start a new run: clear the previous outcome and enter `CollectingInput`.
    pub(crate) fn begin_run(&mut self) {
        self.prediction = None;
        self.tips = None;
        self.last_error = None;
        self.executed_stages.clear();
        self.stage = AnalysisStage::Idle;
        self.enter(AnalysisStage::CollectingInput);
    }

    pub(crate) fn enter(&mut self, stage: AnalysisStage) {
        self.stage = stage;
        self.executed_stages.push(stage);
    }

    pub(crate) fn complete(&mut self, prediction: Prediction) {
        self.prediction = Some(prediction);
        self.enter(AnalysisStage::ResultReady);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.prediction = None;
        self.last_error = Some(message);
        self.enter(AnalysisStage::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_with_system_prompt() {
        let session = SessionContext::new();
        assert_eq!(session.stage(), AnalysisStage::Idle);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.transcript().count(), 0);
        assert!(!session.prediction_made());
    }

    #[test]
    fn begin_analysis_rejects_blank_profile() {
        let mut session = SessionContext::new();
        let blank = PatientProfile {
            name: "Jane".to_string(),
            symptoms: "   ".to_string(),
        };
        assert_eq!(
            session.begin_analysis(blank),
            Err(ModelError::MissingField("symptoms"))
        );
        assert!(session.profile().is_none());

        let profile = PatientProfile::new(" Jane ", "chest pain").unwrap();
        session.begin_analysis(profile).unwrap();
        assert_eq!(session.profile().map(|p| p.name.as_str()), Some("Jane"));
    }

    #[test]
    fn tips_are_added_to_the_conversation() {
        let mut session = SessionContext::new();
        session.push_user("How do I lower cholesterol?");
        session.set_tips("Walk daily.");
        assert_eq!(session.tips(), Some("Walk daily."));
        let transcript: Vec<_> = session.transcript().collect();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
    }
}
