#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use heart_model::{Classifier, FeatureSchema, Scaler};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::classifier::ClassifierArtifact;
use crate::error::ArtifactError;
use crate::hash::sha256_hex;
use crate::manifest::{Manifest, ManifestFile};
use crate::scaler::ScalerArtifact;

pub const MANIFEST_FILE: &str = "manifest.toml";

const MANIFEST_SCHEMA: &str = "heartalert.artifact-manifest";

const REQUIRED_ROLES: &[&str] = &["feature_schema", "scaler", "classifier"];

const ALLOWED_KINDS: &[&str] = &["json"];

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub artifacts_dir: PathBuf,
    pub manifest_pins: crate::manifest::Pins,
    pub file_count: usize,
    pub schema_columns: usize,
    pub scaler_kind: String,
    pub classifier_kind: String,
    pub training_samples: Option<usize>,
}

/// The verified, immutable artifact set shared by every analysis request.
#[derive(Clone)]
pub struct ArtifactRegistry {
    pub manifest: Manifest,
    pub files: Vec<ManifestFile>,
    pub schema: Arc<FeatureSchema>,
    pub scaler: Arc<ScalerArtifact>,
    pub classifier: Arc<ClassifierArtifact>,
}

impl std::fmt::Debug for ArtifactRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactRegistry")
            .field("model", &self.manifest.pins.model)
            .field("columns", &self.schema.len())
            .field("scaler", &self.scaler.name())
            .field("classifier", &self.classifier.kind())
            .finish()
    }
}

impl ArtifactRegistry {
    /// Verify every file listed in `manifest.toml` and load the artifacts.
    ///
    /// # Errors
    ///
    /// Any manifest, checksum, parse or consistency problem is fatal.
    pub fn verify_and_load(artifacts_dir: &Path) -> Result<(Self, VerifySummary), ArtifactError> {
        let manifest = load_manifest(&artifacts_dir.join(MANIFEST_FILE))?;

        validate_manifest(&manifest)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let bundle = VerifiedBundle::read(artifacts_dir, &files)?;

        let (schema_path, columns): (_, Vec<String>) = bundle.parse("feature_schema")?;
        let schema = FeatureSchema::new(columns).map_err(|source| ArtifactError::Schema {
            path: schema_path,
            source,
        })?;

        let (_, scaler): (_, ScalerArtifact) = bundle.parse("scaler")?;
        scaler.check_schema(&schema)?;

        let (_, classifier): (_, ClassifierArtifact) = bundle.parse("classifier")?;
        classifier.check_schema(&schema)?;

        let summary = VerifySummary {
            artifacts_dir: artifacts_dir.to_path_buf(),
            manifest_pins: manifest.pins.clone(),
            file_count: files.len(),
            schema_columns: schema.len(),
            scaler_kind: scaler.name().to_string(),
            classifier_kind: classifier.kind().to_string(),
            training_samples: classifier.sample_count(),
        };

        info!(
            model = %manifest.pins.model,
            columns = schema.len(),
            classifier = classifier.kind(),
            "loaded model artifacts"
        );

        Ok((
            Self {
                manifest,
                files,
                schema: Arc::new(schema),
                scaler: Arc::new(scaler),
                classifier: Arc::new(classifier),
            },
            summary,
        ))
    }

    /// The scaler as a shared port object.
    pub fn scaler_port(&self) -> Arc<dyn Scaler> {
        self.scaler.clone()
    }

    /// The classifier as a shared port object.
    pub fn classifier_port(&self) -> Arc<dyn Classifier> {
        self.classifier.clone()
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::io(path, e)
        }
    })?;
    toml::from_str(&contents).map_err(|e| ArtifactError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ArtifactError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ArtifactError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(ArtifactError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }
    if manifest.pins.model.trim().is_empty() {
        return Err(ArtifactError::InvalidManifest {
            message: "pins.model must not be empty".to_string(),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(ArtifactError::DuplicateRole {
                role: file.role.clone(),
            });
        }

        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(ArtifactError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }

        check_checksum_format(file)?;
        check_relative_path(file)?;
    }

    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(ArtifactError::MissingRole {
                role: role.to_string(),
            });
        }
    }

    Ok(())
}

/// Artifact bytes keyed by role, each checked against its manifest digest.
///
/// Files are read once and parsed from the verified bytes, so nothing on disk
/// can change between the checksum and the parse.
struct VerifiedBundle {
    by_role: BTreeMap<String, (PathBuf, Vec<u8>)>,
}

impl VerifiedBundle {
    fn read(artifacts_dir: &Path, files: &[ManifestFile]) -> Result<Self, ArtifactError> {
        let mut by_role = BTreeMap::new();
        for file in files {
            let path = artifacts_dir.join(&file.path);
            let bytes = read_artifact(&path)?;
            let digest = sha256_hex(&bytes);
            let pinned = file.sha256.to_ascii_lowercase();
            if digest != pinned {
                return Err(ArtifactError::Sha256Mismatch {
                    path,
                    expected: pinned,
                    actual: digest,
                });
            }
            debug!(
                path = %file.path,
                role = %file.role,
                bytes = bytes.len(),
                "artifact digest matches pin"
            );
            by_role.insert(file.role.clone(), (path, bytes));
        }
        Ok(Self { by_role })
    }

    fn parse<T: DeserializeOwned>(&self, role: &str) -> Result<(PathBuf, T), ArtifactError> {
        let (path, bytes) = self
            .by_role
            .get(role)
            .ok_or_else(|| ArtifactError::MissingRole {
                role: role.to_string(),
            })?;
        let value = serde_json::from_slice(bytes).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;
        Ok((path.clone(), value))
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::io(path, e),
    })
}

/// Pins are lowercase or uppercase hex SHA-256 digests.
fn check_checksum_format(file: &ManifestFile) -> Result<(), ArtifactError> {
    let valid = file.sha256.len() == 64 && file.sha256.bytes().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ArtifactError::InvalidSha256 {
            path: PathBuf::from(&file.path),
            message: format!(
                "{} pin must be a 64-character hex digest, got {} characters",
                file.role,
                file.sha256.len()
            ),
        })
    }
}

/// Artifact paths are `/`-separated and stay inside the bundle directory.
fn check_relative_path(file: &ManifestFile) -> Result<(), ArtifactError> {
    let reject = |reason: &str| ArtifactError::InvalidPath {
        path: PathBuf::from(&file.path),
        message: format!("{} artifact {reason}", file.role),
    };
    if file.path.contains('\\') {
        return Err(reject("path must use '/' separators"));
    }
    if Path::new(&file.path).is_absolute() || file.path.starts_with('/') {
        return Err(reject("path must be relative to the bundle"));
    }
    let segments_ok = file
        .path
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if !segments_ok {
        return Err(reject("path must not contain empty, '.' or '..' segments"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, sha256: &str) -> ManifestFile {
        ManifestFile {
            path: path.to_string(),
            sha256: sha256.to_string(),
            kind: "json".to_string(),
            role: "classifier".to_string(),
            notes: None,
        }
    }

    #[test]
    fn artifact_paths_stay_inside_bundle() {
        let digest = "a".repeat(64);
        for bad in [
            "../model.json",
            "/etc/model.json",
            "model\\knn.json",
            "model//knn.json",
            "./knn.json",
        ] {
            let err = check_relative_path(&entry(bad, &digest)).unwrap_err();
            assert!(matches!(err, ArtifactError::InvalidPath { .. }), "{bad}");
        }
        assert!(check_relative_path(&entry("model/knn.json", &digest)).is_ok());
    }

    #[test]
    fn checksum_pin_must_be_full_hex_digest() {
        let err = check_checksum_format(&entry("knn.json", "abc")).unwrap_err();
        assert!(err.to_string().contains("classifier pin"), "{err}");
        assert!(check_checksum_format(&entry("knn.json", &"g".repeat(64))).is_err());
        assert!(check_checksum_format(&entry("knn.json", &"A".repeat(64))).is_ok());
    }
}
