//! Integration tests for the inference pipeline.

use std::sync::Arc;

use heart_artifacts::{ClassifierArtifact, KnnClassifier, ScalerArtifact, StandardScaler};
use heart_core::{
    AnalysisStage, InferencePipeline, SessionContext, StageError, UnmatchedKeyPolicy, align,
    encode, known_columns,
};
use heart_model::{
    AdapterError, AlignedVector, ChestPainType, Classifier, ExerciseAngina, FeatureSchema,
    Gender, PatientProfile, RawObservation, RestingEcg, RiskLabel, Scaler, StSlope,
};

const FULL_SCHEMA: [&str; 20] = [
    "Age",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "MaxHR",
    "Oldpeak",
    "Gender_M",
    "Gender_F",
    "ChestPainType_ATA",
    "ChestPainType_NAP",
    "ChestPainType_TA",
    "ChestPainType_ASY",
    "RestingECG_Normal",
    "RestingECG_ST",
    "RestingECG_LVH",
    "ExerciseAngina_N",
    "ExerciseAngina_Y",
    "ST_Slope_Up",
    "ST_Slope_Flat",
    "ST_Slope_Down",
];

fn full_schema() -> FeatureSchema {
    FeatureSchema::new(FULL_SCHEMA).unwrap()
}

fn scenario_one() -> RawObservation {
    RawObservation {
        age: 40,
        resting_bp: 120,
        cholesterol: 200,
        fasting_bs: false,
        max_hr: 150,
        oldpeak: 1.0,
        gender: Gender::Male,
        chest_pain: ChestPainType::Ata,
        resting_ecg: RestingEcg::Normal,
        exercise_angina: ExerciseAngina::No,
        st_slope: StSlope::Up,
    }
}

/// Labels every vector whose first feature is positive as high risk.
struct SignClassifier;

impl Classifier for SignClassifier {
    fn predict(&self, features: &[f64]) -> Result<RiskLabel, AdapterError> {
        Ok(if features[0] > 0.0 {
            RiskLabel::High
        } else {
            RiskLabel::Low
        })
    }

    fn name(&self) -> &str {
        "sign"
    }
}

struct BrokenScaler;

impl Scaler for BrokenScaler {
    fn transform(&self, _vector: &AlignedVector) -> Result<Vec<f64>, AdapterError> {
        Err(AdapterError::Message("scaler artifact raised".to_string()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn session() -> SessionContext {
    let mut session = SessionContext::new();
    session
        .begin_analysis(PatientProfile::new("Alex Rivera", "tightness after stairs").unwrap())
        .unwrap();
    session
}

fn age_scaler(schema_len: usize) -> ScalerArtifact {
    let mut mean = vec![0.0; schema_len];
    mean[0] = 50.0;
    ScalerArtifact::Standard(StandardScaler {
        mean,
        scale: vec![1.0; schema_len],
        feature_names: None,
    })
}

fn pipeline(schema: FeatureSchema) -> InferencePipeline {
    let scaler = age_scaler(schema.len());
    InferencePipeline::new(Arc::new(schema), Arc::new(scaler), Arc::new(SignClassifier))
}

#[test]
fn scenario_one_aligned_vector() {
    let schema = full_schema();
    let alignment = align(&encode(&scenario_one()), &schema);

    assert_eq!(
        alignment.vector.as_slice(),
        &[
            40.0, 120.0, 200.0, 0.0, 150.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 0.0
        ]
    );
    assert!(alignment.unmatched.is_empty());
}

#[test]
fn scenario_two_flips_one_hot_positions() {
    let observation = RawObservation {
        gender: Gender::Female,
        chest_pain: ChestPainType::Asy,
        resting_ecg: RestingEcg::Lvh,
        exercise_angina: ExerciseAngina::Yes,
        st_slope: StSlope::Down,
        ..scenario_one()
    };
    let alignment = align(&encode(&observation), &full_schema());

    assert_eq!(
        alignment.vector.as_slice(),
        &[
            40.0, 120.0, 200.0, 0.0, 150.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            1.0, 0.0, 0.0, 1.0
        ]
    );
}

#[test]
fn unselected_category_missing_from_schema_leaves_field_zeroed() {
    // Drop-first export: no Gender_M column.
    let columns: Vec<&str> = FULL_SCHEMA
        .iter()
        .copied()
        .filter(|c| *c != "Gender_M")
        .collect();
    let schema = FeatureSchema::new(columns).unwrap();
    let alignment = align(&encode(&scenario_one()), &schema);

    for column in known_columns::<Gender>() {
        if let Some(index) = schema.position(&column) {
            assert_eq!(alignment.vector.as_slice()[index], 0.0, "{column}");
        }
    }
    assert_eq!(alignment.vector.len(), schema.len());
    assert_eq!(alignment.unmatched, vec!["Gender_M".to_string()]);
}

#[test]
fn analyze_walks_every_stage_and_stores_prediction() {
    let pipeline = pipeline(full_schema());
    let mut session = session();
    let observation = RawObservation {
        age: 60,
        ..scenario_one()
    };

    let prediction = pipeline.analyze(&observation, &mut session).unwrap();

    assert_eq!(prediction.label, RiskLabel::High);
    assert_eq!(session.stage(), AnalysisStage::ResultReady);
    assert_eq!(
        session.executed_stages(),
        &[
            AnalysisStage::CollectingInput,
            AnalysisStage::Encoding,
            AnalysisStage::Aligning,
            AnalysisStage::Scaling,
            AnalysisStage::Classifying,
            AnalysisStage::ResultReady,
        ]
    );
    assert_eq!(session.prediction(), Some(&prediction));
    assert!(session.last_error().is_none());
}

#[test]
fn scaler_failure_returns_session_to_idle_without_label() {
    let schema = full_schema();
    let good = pipeline(schema.clone());
    let broken = InferencePipeline::new(
        Arc::new(schema),
        Arc::new(BrokenScaler),
        Arc::new(SignClassifier),
    );
    let mut session = session();

    good.analyze(&scenario_one(), &mut session).unwrap();
    assert!(session.prediction_made());

    let err = broken.analyze(&scenario_one(), &mut session).unwrap_err();
    assert_eq!(err.stage, AnalysisStage::Scaling);
    assert_eq!(session.stage(), AnalysisStage::Idle);
    assert!(!session.prediction_made());
    assert!(
        session
            .last_error()
            .unwrap()
            .contains("scaler artifact raised")
    );

    // The next attempt clears the error.
    good.analyze(&scenario_one(), &mut session).unwrap();
    assert!(session.last_error().is_none());
}

#[test]
fn analysis_without_profile_fails_while_collecting() {
    let pipeline = pipeline(full_schema());
    let mut session = SessionContext::new();

    let err = pipeline.analyze(&scenario_one(), &mut session).unwrap_err();

    assert_eq!(err.stage, AnalysisStage::CollectingInput);
    assert_eq!(err.source, StageError::MissingProfile);
    assert_eq!(session.stage(), AnalysisStage::Idle);
    assert!(!session.prediction_made());
    assert!(session.profile().is_none());
}

#[test]
fn out_of_range_input_fails_while_collecting() {
    let pipeline = pipeline(full_schema());
    let mut session = session();
    let observation = RawObservation {
        cholesterol: 700,
        ..scenario_one()
    };

    let err = pipeline.analyze(&observation, &mut session).unwrap_err();
    assert_eq!(err.stage, AnalysisStage::CollectingInput);
    assert!(matches!(err.source, StageError::InvalidObservation(ref e) if e.len() == 1));
    assert_eq!(session.executed_stages().last(), Some(&AnalysisStage::Idle));
}

#[test]
fn reject_policy_surfaces_alignment_error() {
    let columns: Vec<&str> = FULL_SCHEMA
        .iter()
        .copied()
        .filter(|c| !c.starts_with("ST_Slope"))
        .collect();
    let pipeline = pipeline(FeatureSchema::new(columns).unwrap())
        .with_policy(UnmatchedKeyPolicy::Reject);
    let mut session = session();

    let err = pipeline.analyze(&scenario_one(), &mut session).unwrap_err();
    assert_eq!(err.stage, AnalysisStage::Aligning);
    assert_eq!(
        err.source,
        StageError::UnmatchedColumns {
            columns: vec!["ST_Slope_Up".to_string()]
        }
    );
}

#[test]
fn classifying_twice_is_idempotent() {
    let schema = full_schema();
    let aligned = align(&encode(&scenario_one()), &schema).vector;
    let classifier = ClassifierArtifact::Knn(KnnClassifier {
        n_neighbors: 3,
        samples: vec![
            vec![-10.0; schema.len()],
            vec![-9.0; schema.len()],
            vec![-8.0; schema.len()],
            vec![5.0; schema.len()],
        ],
        labels: vec![
            RiskLabel::Low,
            RiskLabel::High,
            RiskLabel::High,
            RiskLabel::Low,
        ],
    });
    let pipeline = InferencePipeline::new(
        Arc::new(schema.clone()),
        Arc::new(age_scaler(schema.len())),
        Arc::new(classifier),
    );

    let first = pipeline.classify(&aligned).unwrap();
    let second = pipeline.classify(&aligned).unwrap();
    assert_eq!(first, second);
}
