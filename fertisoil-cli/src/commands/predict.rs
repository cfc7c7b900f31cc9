//! `fertisoil predict`

use std::path::PathBuf;

use clap::Args;
use fertisoil::config::ConfigFile;
use fertisoil::prediction::{FeatureInput, FertilizerPredictor, ModelContext};
use tracing::info;

use crate::error::CliError;

/// Positional features in training order, plus artifact overrides.
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Air temperature in °C (0 to 50)
    #[arg(allow_negative_numbers = true)]
    pub temperature: f64,

    /// Relative humidity in % (0 to 100)
    #[arg(allow_negative_numbers = true)]
    pub humidity: f64,

    /// Soil moisture in % (0 to 100)
    #[arg(allow_negative_numbers = true)]
    pub moisture: f64,

    /// Encoded soil type (0 to 4)
    #[arg(allow_negative_numbers = true)]
    pub soil_type: i64,

    /// Encoded crop type (0 to 16)
    #[arg(allow_negative_numbers = true)]
    pub crop_type: i64,

    /// Nitrogen content
    #[arg(allow_negative_numbers = true)]
    pub nitrogen: f64,

    /// Potassium content
    #[arg(allow_negative_numbers = true)]
    pub potassium: f64,

    /// Phosphorus content
    #[arg(allow_negative_numbers = true)]
    pub phosphorus: f64,

    /// Classifier artifact (overrides model.classifier)
    #[arg(long)]
    pub classifier: Option<PathBuf>,

    /// Label encoder artifact (overrides model.encoder)
    #[arg(long)]
    pub encoder: Option<PathBuf>,
}

impl PredictArgs {
    fn input(&self) -> FeatureInput {
        FeatureInput {
            temperature: self.temperature,
            humidity: self.humidity,
            moisture: self.moisture,
            soil_type: self.soil_type,
            crop_type: self.crop_type,
            nitrogen: self.nitrogen,
            potassium: self.potassium,
            phosphorus: self.phosphorus,
        }
    }
}

pub fn run(args: PredictArgs, config: &ConfigFile) -> Result<(), CliError> {
    // Reject bad input before touching the artifacts.
    let features = args.input().validate()?;

    let classifier = args
        .classifier
        .clone()
        .unwrap_or_else(|| config.model.classifier.clone());
    let encoder = args
        .encoder
        .clone()
        .unwrap_or_else(|| config.model.encoder.clone());

    info!(
        classifier = %classifier.display(),
        encoder = %encoder.display(),
        "Loading model artifacts"
    );
    let predictor = FertilizerPredictor::new(ModelContext::load(&classifier, &encoder)?);

    println!("{}", predictor.predict(&features));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(temperature: f64, dir: &TempDir) -> PredictArgs {
        PredictArgs {
            temperature,
            humidity: 52.0,
            moisture: 38.0,
            soil_type: 2,
            crop_type: 3,
            nitrogen: 37.0,
            potassium: 0.0,
            phosphorus: 0.0,
            classifier: Some(dir.path().join("classifier.json")),
            encoder: Some(dir.path().join("fertilizer.json")),
        }
    }

    #[test]
    fn test_predict_with_artifact_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("classifier.json"),
            r#"{"n_classes": 1, "trees": [{"nodes": [{"leaf": {"class": 0}}]}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("fertilizer.json"), r#"{"classes": ["DAP"]}"#).unwrap();

        assert!(run(args(26.0, &dir), &ConfigFile::default()).is_ok());
    }

    #[test]
    fn test_invalid_input_reported_before_artifacts() {
        let dir = TempDir::new().unwrap();
        let err = run(args(55.0, &dir), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
    }

    #[test]
    fn test_missing_artifacts_reported() {
        let dir = TempDir::new().unwrap();
        let err = run(args(26.0, &dir), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, CliError::Artifact(_)));
    }
}
