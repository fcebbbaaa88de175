#![deny(unsafe_code)]

pub mod adapter;
pub mod chat;
pub mod enums;
pub mod error;
pub mod features;
pub mod observation;
pub mod profile;
pub mod schema;

pub use adapter::{Classifier, Scaler, check_dimension};
pub use chat::{ChatMessage, ChatRole};
pub use enums::{Categorical, ChestPainType, ExerciseAngina, Gender, RestingEcg, StSlope};
pub use error::{AdapterError, ModelError, Result};
pub use features::{AlignedVector, RiskLabel, SparseRecord};
pub use observation::RawObservation;
pub use profile::PatientProfile;
pub use schema::{FeatureSchema, NUMERIC_COLUMNS};
