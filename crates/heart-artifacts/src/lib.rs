#![deny(unsafe_code)]

pub mod classifier;
pub mod doctor;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod registry;
pub mod scaler;

pub use crate::classifier::{ClassifierArtifact, KnnClassifier, LogisticClassifier};
pub use crate::doctor::DoctorReport;
pub use crate::error::ArtifactError;
pub use crate::registry::{ArtifactRegistry, MANIFEST_FILE, VerifySummary};
pub use crate::scaler::{ScalerArtifact, StandardScaler};
