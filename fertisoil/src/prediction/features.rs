//! Model input features and their validation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of features the fertilizer model consumes.
pub const FEATURE_COUNT: usize = 8;

/// Valid temperature range, °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=50.0;

/// Valid relative humidity range, %.
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Valid soil moisture range, %.
pub const MOISTURE_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Valid encoded soil type range.
pub const SOIL_TYPE_RANGE: RangeInclusive<i64> = 0..=4;

/// Valid encoded crop type range.
pub const CROP_TYPE_RANGE: RangeInclusive<i64> = 0..=16;

/// Input validation errors. Always fatal to the run that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A numeric feature is outside its accepted range.
    #[error("{field} must be between {min} and {max}{unit} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
        unit: &'static str,
    },

    /// A numeric feature is NaN or infinite.
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
}

/// Unvalidated prediction inputs, as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureInput {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub soil_type: i64,
    pub crop_type: i64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorus: f64,
}

impl FeatureInput {
    /// Checks every field against its range.
    pub fn validate(&self) -> Result<FeatureVector, InputError> {
        check_range("Temperature", self.temperature, &TEMPERATURE_RANGE, "°C")?;
        check_range("Humidity", self.humidity, &HUMIDITY_RANGE, "%")?;
        check_range("Moisture", self.moisture, &MOISTURE_RANGE, "%")?;
        check_code("Soil type", self.soil_type, &SOIL_TYPE_RANGE)?;
        check_code("Crop type", self.crop_type, &CROP_TYPE_RANGE)?;
        check_finite("Nitrogen", self.nitrogen)?;
        check_finite("Potassium", self.potassium)?;
        check_finite("Phosphorus", self.phosphorus)?;

        Ok(FeatureVector { input: *self })
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field, value })
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
    unit: &'static str,
) -> Result<(), InputError> {
    check_finite(field, value)?;
    if range.contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
            unit,
        })
    }
}

fn check_code(
    field: &'static str,
    value: i64,
    range: &RangeInclusive<i64>,
) -> Result<(), InputError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
            unit: "",
        })
    }
}

/// Validated model input.
///
/// Only obtainable through [`FeatureInput::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    input: FeatureInput,
}

impl FeatureVector {
    /// Features in model order: temperature, humidity, moisture, soil type,
    /// crop type, nitrogen, potassium, phosphorus.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let i = &self.input;
        [
            i.temperature,
            i.humidity,
            i.moisture,
            i.soil_type as f64,
            i.crop_type as f64,
            i.nitrogen,
            i.potassium,
            i.phosphorus,
        ]
    }

    pub fn input(&self) -> &FeatureInput {
        &self.input
    }
}
