//! Explicitly loaded model context.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use super::model::{Classifier, LabelEncoder, TreeEnsemble};

/// Default classifier artifact file name.
pub const DEFAULT_CLASSIFIER_FILE: &str = "classifier.json";

/// Default label encoder artifact file name.
pub const DEFAULT_ENCODER_FILE: &str = "fertilizer.json";

/// Errors raised while loading model artifacts. Fatal to the prediction
/// pipeline.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    #[error("Model file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The artifact file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The artifact is not valid JSON for its type.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The artifact parsed but is structurally unusable.
    #[error("Invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// The classifier and label encoder used for predictions.
///
/// Built once and handed to whoever needs it; there is no global model
/// state.
pub struct ModelContext {
    classifier: Box<dyn Classifier>,
    encoder: LabelEncoder,
}

impl ModelContext {
    /// Wraps an already constructed classifier and encoder.
    pub fn new(classifier: Box<dyn Classifier>, encoder: LabelEncoder) -> Self {
        Self {
            classifier,
            encoder,
        }
    }

    /// Loads a tree ensemble and its label encoder from JSON artifacts.
    pub fn load(classifier_path: &Path, encoder_path: &Path) -> Result<Self, ArtifactError> {
        let ensemble: TreeEnsemble = read_json(classifier_path)?;
        ensemble
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: classifier_path.to_path_buf(),
                reason,
            })?;

        let encoder: LabelEncoder = read_json(encoder_path)?;
        if encoder.is_empty() {
            return Err(ArtifactError::Invalid {
                path: encoder_path.to_path_buf(),
                reason: "encoder has no classes".to_string(),
            });
        }
        if ensemble.n_classes > encoder.len() {
            return Err(ArtifactError::Invalid {
                path: encoder_path.to_path_buf(),
                reason: format!(
                    "classifier has {} classes but encoder only {}",
                    ensemble.n_classes,
                    encoder.len()
                ),
            });
        }

        info!(
            classifier = %classifier_path.display(),
            trees = ensemble.trees.len(),
            classes = encoder.len(),
            "Loaded fertilizer model"
        );

        Ok(Self::new(Box::new(ensemble), encoder))
    }

    /// Loads `classifier.json` and `fertilizer.json` from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self, ArtifactError> {
        Self::load(
            &dir.join(DEFAULT_CLASSIFIER_FILE),
            &dir.join(DEFAULT_ENCODER_FILE),
        )
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
