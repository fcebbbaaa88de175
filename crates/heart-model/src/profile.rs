use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Personal details collected next to the vitals. Not used by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    /// Free-text description of symptoms.
    pub symptoms: String,
}

impl PatientProfile {
    /// Build a profile, trimming both fields.
    ///
    /// # Errors
    ///
    /// Name and symptoms are both required.
    pub fn new(name: &str, symptoms: &str) -> Result<Self, ModelError> {
        let name = name.trim();
        let symptoms = symptoms.trim();
        if name.is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if symptoms.is_empty() {
            return Err(ModelError::MissingField("symptoms"));
        }
        Ok(Self {
            name: name.to_string(),
            symptoms: symptoms.to_string(),
        })
    }
}
