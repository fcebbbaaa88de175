//! The advisor port and the prompts it sends.

use heart_model::{ChatMessage, ChatRole, RawObservation, RiskLabel};

use crate::error::Result;

/// System prompt for the one-shot tips request.
pub const TIPS_SYSTEM_PROMPT: &str = "You are a caring heart health assistant. \
Give short, actionable, and friendly health tips.";

/// System prompt prepended to every follow-up chat request.
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are HeartAlert, a professional and caring heart health AI assistant.";

/// Source of AI commentary on an assessment.
///
/// Implementations must not retry on their own; a failed call is reported
/// to the user, who may ask again.
pub trait HealthAdvisor: Send + Sync {
    /// Personalised tips for a freshly classified observation.
    fn health_tips(&self, request: &TipsRequest) -> Result<String>;

    /// Reply to the conversation so far. System messages in `history` are
    /// replaced by the advisor's own.
    fn chat(&self, history: &[ChatMessage]) -> Result<String>;
}

/// Input for [`HealthAdvisor::health_tips`].
#[derive(Debug, Clone, PartialEq)]
pub struct TipsRequest {
    pub observation: RawObservation,
    pub label: RiskLabel,
}

impl TipsRequest {
    pub fn new(observation: RawObservation, label: RiskLabel) -> Self {
        Self { observation, label }
    }

    /// User prompt describing the details and the predicted risk.
    pub fn prompt(&self) -> String {
        let o = &self.observation;
        let details = format!(
            "Age: {}, Gender: {}, Chest pain type: {}, Resting BP: {}, Cholesterol: {}, \
             Fasting BS > 120 mg/dl: {}, Resting ECG: {}, Max HR: {}, Exercise angina: {}, \
             Oldpeak: {:.1}, ST slope: {}",
            o.age,
            o.gender,
            o.chest_pain,
            o.resting_bp,
            o.cholesterol,
            o.fasting_bs_value(),
            o.resting_ecg,
            o.max_hr,
            o.exercise_angina,
            o.oldpeak,
            o.st_slope,
        );

        format!(
            "The user provided the following health details today: {details}.\n\
             The predicted heart stroke risk is {label} (1 = High Risk, 0 = Low Risk).\n\
             \n\
             Suggest 3-4 personalized, practical, and motivational health tips to:\n\
             - Lower heart stroke risk\n\
             - Improve heart health through lifestyle changes\n\
             - Encourage positive habits (diet, exercise, stress management)\n\
             - Highlight any medical checkups or precautions needed\n\
             \n\
             Keep the tone friendly, supportive, and easy to understand.\n\
             Avoid medical jargon or sounding alarming; focus on encouragement and prevention.",
            label = self.label.value(),
        )
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(TIPS_SYSTEM_PROMPT),
            ChatMessage::user(self.prompt()),
        ]
    }
}

/// Full message list for a chat request: the HeartAlert prompt followed by
/// the user and assistant turns of `history`.
pub fn chat_messages(history: &[ChatMessage]) -> Vec<ChatMessage> {
    std::iter::once(ChatMessage::system(CHAT_SYSTEM_PROMPT))
        .chain(
            history
                .iter()
                .filter(|message| message.role != ChatRole::System)
                .cloned(),
        )
        .collect()
}

/// Strip Markdown emphasis markers from a chat reply.
pub fn strip_emphasis(reply: &str) -> String {
    reply.replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_details_and_label() {
        let request = TipsRequest::new(RawObservation::default(), RiskLabel::High);
        let prompt = request.prompt();
        assert!(prompt.contains("Age: 40"));
        assert!(prompt.contains("Gender: M"));
        assert!(prompt.contains("Chest pain type: ATA"));
        assert!(prompt.contains("Oldpeak: 1.0"));
        assert!(prompt.contains("risk is 1 (1 = High Risk, 0 = Low Risk)"));
        assert!(prompt.contains("3-4 personalized"));
    }

    #[test]
    fn tips_messages_start_with_system_prompt() {
        let messages = TipsRequest::new(RawObservation::default(), RiskLabel::Low).messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, TIPS_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn chat_sends_a_single_system_prompt() {
        let history = [
            ChatMessage::system("You are a caring heart health assistant."),
            ChatMessage::assistant("Walk daily."),
            ChatMessage::user("Is coffee okay?"),
        ];
        let messages = chat_messages(&history);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, CHAT_SYSTEM_PROMPT);
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.role == ChatRole::System)
                .count(),
            1
        );
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[2].content, "Is coffee okay?");
    }

    #[test]
    fn emphasis_is_removed() {
        assert_eq!(
            strip_emphasis("**Walk** daily and *rest* well"),
            "Walk daily and rest well"
        );
    }
}
