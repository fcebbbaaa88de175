#![deny(unsafe_code)]

use crate::manifest::{ManifestFile, Pins};
use crate::registry::{ArtifactRegistry, VerifySummary};

/// Machine-readable description of a verified artifact set.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub pins: Pins,
    pub summary: Option<String>,
    pub files: Vec<ManifestFile>,
    pub counts: DoctorCounts,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorCounts {
    pub files: usize,
    pub schema_columns: usize,
    pub training_samples: Option<usize>,
    pub scaler: String,
    pub classifier: String,
}

impl DoctorReport {
    pub fn from_registry(registry: &ArtifactRegistry, summary: &VerifySummary) -> Self {
        Self {
            schema: "heartalert.artifact-doctor".to_string(),
            schema_version: 1,
            pins: summary.manifest_pins.clone(),
            summary: registry
                .manifest
                .notes
                .as_ref()
                .and_then(|notes| notes.summary.clone()),
            files: registry.files.clone(),
            counts: DoctorCounts {
                files: summary.file_count,
                schema_columns: summary.schema_columns,
                training_samples: summary.training_samples,
                scaler: summary.scaler_kind.clone(),
                classifier: summary.classifier_kind.clone(),
            },
            columns: registry.schema.columns().to_vec(),
        }
    }
}
