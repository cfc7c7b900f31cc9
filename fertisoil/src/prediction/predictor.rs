//! Fertilizer prediction with an explicit fallback policy.

use std::fmt;

use tracing::{debug, warn};

use super::context::ModelContext;
use super::features::{FeatureInput, FeatureVector, InputError};
use super::model::ModelError;

/// Label returned whenever the model cannot produce one.
pub const FALLBACK_LABEL: &str = "Urea";

/// Why a prediction fell back to [`FALLBACK_LABEL`].
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The classifier failed to produce a class index.
    Inference(ModelError),
    /// The class index could not be mapped to a label.
    Decode(ModelError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Inference(e) => write!(f, "model invocation failed: {}", e),
            FallbackReason::Decode(e) => write!(f, "label decoding failed: {}", e),
        }
    }
}

/// A predicted fertilizer label.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Set when `label` is the fallback rather than a model output.
    pub fallback: Option<FallbackReason>,
}

impl Prediction {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Runs validated features through the model context.
pub struct FertilizerPredictor {
    context: ModelContext,
}

impl FertilizerPredictor {
    pub fn new(context: ModelContext) -> Self {
        Self { context }
    }

    /// Validates raw input, then predicts.
    ///
    /// Invalid input is returned as an error and the model is not invoked.
    pub fn predict_input(&self, input: &FeatureInput) -> Result<Prediction, InputError> {
        let features = input.validate()?;
        Ok(self.predict(&features))
    }

    /// Predicts a fertilizer label.
    ///
    /// Model failures never surface as errors: the prediction degrades to
    /// [`FALLBACK_LABEL`] and the reason is logged and recorded on the
    /// result.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let sample = features.to_array();

        let index = match self.context.classifier().predict(&sample) {
            Ok(index) => index,
            Err(e) => return Self::fallback(FallbackReason::Inference(e)),
        };

        match self.context.encoder().decode(index) {
            Ok(label) => {
                debug!(index, label, "Predicted fertilizer");
                Prediction {
                    label: label.to_string(),
                    fallback: None,
                }
            }
            Err(e) => Self::fallback(FallbackReason::Decode(e)),
        }
    }

    fn fallback(reason: FallbackReason) -> Prediction {
        warn!(
            reason = %reason,
            label = FALLBACK_LABEL,
            "Prediction degraded to fallback label"
        );
        Prediction {
            label: FALLBACK_LABEL.to_string(),
            fallback: Some(reason),
        }
    }
}
