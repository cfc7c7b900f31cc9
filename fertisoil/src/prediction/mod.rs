//! Fertilizer prediction pipeline.
//!
//! ```text
//! FeatureInput ──validate──► FeatureVector ──Classifier──► index ──LabelEncoder──► label
//!      │                                          │                    │
//!      ▼                                          └───── failure ──────┴──► "Urea"
//!  InputError (fatal)
//! ```
//!
//! Model artifacts are loaded once into a [`ModelContext`] and passed to
//! the [`FertilizerPredictor`] explicitly.
//!
//! # Example
//!
//! ```ignore
//! use fertisoil::prediction::{FeatureInput, FertilizerPredictor, ModelContext};
//!
//! let context = ModelContext::load_dir(Path::new("models"))?;
//! let predictor = FertilizerPredictor::new(context);
//!
//! let prediction = predictor.predict_input(&input)?;
//! println!("{}", prediction.label);
//! ```

mod context;
mod features;
mod model;
mod predictor;

pub use context::{ArtifactError, ModelContext, DEFAULT_CLASSIFIER_FILE, DEFAULT_ENCODER_FILE};
pub use features::{
    FeatureInput, FeatureVector, InputError, CROP_TYPE_RANGE, FEATURE_COUNT, HUMIDITY_RANGE,
    MOISTURE_RANGE, SOIL_TYPE_RANGE, TEMPERATURE_RANGE,
};
pub use model::{Classifier, LabelEncoder, ModelError, Node, Tree, TreeEnsemble};
pub use predictor::{FallbackReason, FertilizerPredictor, Prediction, FALLBACK_LABEL};
