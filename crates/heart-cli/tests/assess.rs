//! Integration tests for the assessment driver against the bundled demo artifacts.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;

use heart_advisor::{AdvisorError, CHAT_SYSTEM_PROMPT, HealthAdvisor, TipsRequest, chat_messages};
use heart_cli::assess::{chat_loop, chat_turn, load_pipeline, run_assessment};
use heart_core::{AnalysisStage, SessionContext, UnmatchedKeyPolicy};
use heart_model::{
    ChatMessage, ChatRole, ChestPainType, ExerciseAngina, PatientProfile, RawObservation,
    RestingEcg, RiskLabel, StSlope,
};

fn demo_artifacts() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts")
}

fn profile() -> PatientProfile {
    PatientProfile::new("Jane Doe", "shortness of breath").unwrap()
}

fn high_risk() -> RawObservation {
    RawObservation {
        age: 65,
        resting_bp: 150,
        cholesterol: 290,
        fasting_bs: true,
        max_hr: 110,
        oldpeak: 2.5,
        chest_pain: ChestPainType::Asy,
        resting_ecg: RestingEcg::St,
        exercise_angina: ExerciseAngina::Yes,
        st_slope: StSlope::Flat,
        ..RawObservation::default()
    }
}

/// Records calls and answers from a script.
#[derive(Default)]
struct ScriptedAdvisor {
    fail: bool,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl HealthAdvisor for ScriptedAdvisor {
    fn health_tips(&self, request: &TipsRequest) -> Result<String, AdvisorError> {
        if self.fail {
            return Err(AdvisorError::Network("connection refused".to_string()));
        }
        Ok(format!("Tips for label {}", request.label))
    }

    fn chat(&self, history: &[ChatMessage]) -> Result<String, AdvisorError> {
        if self.fail {
            return Err(AdvisorError::RateLimited);
        }
        self.seen.lock().unwrap().push(chat_messages(history));
        Ok(format!("Reply {}", history.len()))
    }
}

#[test]
fn demo_bundle_verifies() {
    let (registry, summary, pipeline) =
        load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::default()).unwrap();
    assert_eq!(summary.schema_columns, 20);
    assert_eq!(summary.classifier_kind, "knn");
    assert_eq!(registry.schema.len(), pipeline.schema().len());
}

#[test]
fn default_form_is_low_risk_and_high_risk_profile_is_flagged() {
    let (_, _, pipeline) = load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::Reject).unwrap();

    let mut session = SessionContext::new();
    let low = run_assessment(
        &pipeline,
        None,
        profile(),
        &RawObservation::default(),
        &mut session,
    )
    .unwrap();
    assert_eq!(low.prediction.label, RiskLabel::Low);
    assert!(low.tips.is_none());

    let high = run_assessment(&pipeline, None, profile(), &high_risk(), &mut session).unwrap();
    assert_eq!(high.prediction.label, RiskLabel::High);
    assert_eq!(session.stage(), AnalysisStage::ResultReady);
}

#[test]
fn tips_are_stored_in_session() {
    let (_, _, pipeline) = load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::Log).unwrap();
    let advisor = ScriptedAdvisor::default();
    let mut session = SessionContext::new();

    let outcome = run_assessment(
        &pipeline,
        Some(&advisor),
        profile(),
        &high_risk(),
        &mut session,
    )
    .unwrap();

    assert_eq!(outcome.tips.as_deref(), Some("Tips for label 1"));
    assert_eq!(session.tips(), Some("Tips for label 1"));
    assert_eq!(session.profile(), Some(&profile()));
}

#[test]
fn advisor_failure_keeps_the_prediction() {
    let (_, _, pipeline) = load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::Log).unwrap();
    let advisor = ScriptedAdvisor {
        fail: true,
        ..ScriptedAdvisor::default()
    };
    let mut session = SessionContext::new();

    let outcome = run_assessment(
        &pipeline,
        Some(&advisor),
        profile(),
        &RawObservation::default(),
        &mut session,
    )
    .unwrap();

    assert!(outcome.tips.is_none());
    assert!(outcome.advice_error.unwrap().contains("internet connection"));
    assert!(session.prediction_made());
}

#[test]
fn invalid_input_is_an_error() {
    let (_, _, pipeline) = load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::Log).unwrap();
    let mut session = SessionContext::new();
    let observation = RawObservation {
        age: 12,
        ..RawObservation::default()
    };

    let err = run_assessment(&pipeline, None, profile(), &observation, &mut session).unwrap_err();
    assert!(format!("{err:#}").contains("age 12 out of range"), "{err:#}");
    assert_eq!(session.stage(), AnalysisStage::Idle);
}

#[test]
fn blank_symptoms_stop_the_assessment() {
    let (_, _, pipeline) = load_pipeline(&demo_artifacts(), UnmatchedKeyPolicy::Log).unwrap();
    let mut session = SessionContext::new();
    let profile = PatientProfile {
        name: "Jane Doe".to_string(),
        symptoms: String::new(),
    };

    let err = run_assessment(
        &pipeline,
        None,
        profile,
        &RawObservation::default(),
        &mut session,
    )
    .unwrap_err();

    assert!(format!("{err:#}").contains("symptoms"), "{err:#}");
    assert!(!session.prediction_made());
    assert_eq!(session.stage(), AnalysisStage::Idle);
}

#[test]
fn missing_bundle_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_pipeline(dir.path(), UnmatchedKeyPolicy::Log).unwrap_err();
    assert!(format!("{err:#}").contains("load artifacts"));
}

#[test]
fn chat_turn_records_both_sides() {
    let advisor = ScriptedAdvisor::default();
    let mut session = SessionContext::new();

    let reply = chat_turn(&advisor, &mut session, "Is coffee okay?").unwrap();

    assert_eq!(reply, "Reply 2");
    let roles: Vec<ChatRole> = session.transcript().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    let seen = advisor.seen.lock().unwrap();
    assert_eq!(seen[0].len(), 2);
    assert_eq!(seen[0][0].content, CHAT_SYSTEM_PROMPT);
    assert_eq!(seen[0][1].role, ChatRole::User);
}

#[test]
fn chat_loop_stops_on_exit_and_skips_blank_lines() {
    let advisor = ScriptedAdvisor::default();
    let mut session = SessionContext::new();
    let mut input = Cursor::new("hello\n\n  \nhow are you?\nexit\nignored\n");
    let mut output = Vec::new();

    let answered = chat_loop(&advisor, &mut session, &mut input, &mut output).unwrap();

    assert_eq!(answered, 2);
    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("HeartAlert> Reply 2"));
    assert!(printed.contains("HeartAlert> Reply 4"));
    assert!(!printed.contains("ignored"));
}

#[test]
fn chat_loop_reports_failures_and_continues() {
    let advisor = ScriptedAdvisor {
        fail: true,
        ..ScriptedAdvisor::default()
    };
    let mut session = SessionContext::new();
    let mut input = Cursor::new("first\nsecond\n");
    let mut output = Vec::new();

    let answered = chat_loop(&advisor, &mut session, &mut input, &mut output).unwrap();

    assert_eq!(answered, 0);
    let printed = String::from_utf8(output).unwrap();
    assert_eq!(printed.matches("busy").count(), 2);
    assert_eq!(session.transcript().count(), 2);
}
