//! Soil texture classification.
//!
//! Maps clay/sand/silt proportions onto the twelve textbook texture
//! classes using an ordered rule list, in the spirit of the USDA texture
//! triangle.
//!
//! # Rule order
//!
//! The rule ranges overlap. Rules are evaluated top to bottom and the first
//! match wins, so a composition that satisfies several rules always gets
//! the class of the earliest one:
//!
//! ```text
//! clay >= 40  ─► Sandy Clay | Silty Clay | Clay
//! clay >= 27  ─► Clay Loam | Sandy Clay Loam | Silty Clay Loam
//! clay >= 20  ─► Sandy Clay Loam | Silty Clay Loam | Clay Loam
//! sand >= 85  ─► Sand
//! sand >= 70  ─► Sandy Clay Loam | Loamy Sand
//! sand >= 43  ─► Sandy Loam | Loamy Sand
//! silt >= 80  ─► Silt
//! silt >= 50  ─► Silty Clay Loam | Silt Loam
//! silt >= 28  ─► Loam | Silt Loam
//! otherwise   ─► Loam
//! ```
//!
//! # Fallback
//!
//! When the input cannot be turned into a composition the classifier
//! returns [`TextureClass::Loamy`]. This label is deliberately distinct from
//! [`TextureClass::Loam`], which is a regular classification outcome.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use super::properties::{SoilProperties, SoilProperty};

/// Raw clay value assumed when a source does not report clay.
pub const DEFAULT_RAW_CLAY: f64 = 200.0;

/// Raw sand value assumed when a source does not report sand.
pub const DEFAULT_RAW_SAND: f64 = 400.0;

/// Raw silt value assumed when a source does not report silt.
pub const DEFAULT_RAW_SILT: f64 = 400.0;

/// Raw source units are g/kg; percentages are g/kg divided by ten.
const RAW_SCALE: f64 = 10.0;

/// Soil texture class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureClass {
    #[serde(rename = "Sandy Clay")]
    SandyClay,
    #[serde(rename = "Silty Clay")]
    SiltyClay,
    #[serde(rename = "Clay")]
    Clay,
    #[serde(rename = "Clay Loam")]
    ClayLoam,
    #[serde(rename = "Sandy Clay Loam")]
    SandyClayLoam,
    #[serde(rename = "Silty Clay Loam")]
    SiltyClayLoam,
    #[serde(rename = "Sand")]
    Sand,
    #[serde(rename = "Loamy Sand")]
    LoamySand,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
    #[serde(rename = "Silt")]
    Silt,
    #[serde(rename = "Silt Loam")]
    SiltLoam,
    #[serde(rename = "Loam")]
    Loam,
    /// Fallback label for results that could not be classified.
    #[serde(rename = "Loamy")]
    Loamy,
}

impl TextureClass {
    /// The twelve classes the decision rules can produce.
    pub const ALL: [TextureClass; 12] = [
        TextureClass::SandyClay,
        TextureClass::SiltyClay,
        TextureClass::Clay,
        TextureClass::ClayLoam,
        TextureClass::SandyClayLoam,
        TextureClass::SiltyClayLoam,
        TextureClass::Sand,
        TextureClass::LoamySand,
        TextureClass::SandyLoam,
        TextureClass::Silt,
        TextureClass::SiltLoam,
        TextureClass::Loam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextureClass::SandyClay => "Sandy Clay",
            TextureClass::SiltyClay => "Silty Clay",
            TextureClass::Clay => "Clay",
            TextureClass::ClayLoam => "Clay Loam",
            TextureClass::SandyClayLoam => "Sandy Clay Loam",
            TextureClass::SiltyClayLoam => "Silty Clay Loam",
            TextureClass::Sand => "Sand",
            TextureClass::LoamySand => "Loamy Sand",
            TextureClass::SandyLoam => "Sandy Loam",
            TextureClass::Silt => "Silt",
            TextureClass::SiltLoam => "Silt Loam",
            TextureClass::Loam => "Loam",
            TextureClass::Loamy => "Loamy",
        }
    }

    /// True for the fallback label.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TextureClass::Loamy)
    }
}

impl fmt::Display for TextureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building a texture composition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextureError {
    /// A raw value is NaN or infinite.
    #[error("{property} is not a finite number: {value}")]
    NonFinite { property: SoilProperty, value: f64 },

    /// A raw value is negative.
    #[error("{property} is negative: {value}")]
    Negative { property: SoilProperty, value: f64 },
}

/// Clay/sand/silt percentages.
///
/// Built from raw masses, the triple sums to 100 whenever the total raw
/// mass is positive. With zero total mass the triple is left at zero and
/// is not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureComposition {
    pub clay: f64,
    pub sand: f64,
    pub silt: f64,
}

impl TextureComposition {
    /// Builds a composition from raw source masses (g/kg).
    pub fn from_raw(clay: f64, sand: f64, silt: f64) -> Result<Self, TextureError> {
        let clay = scale(SoilProperty::Clay, clay)?;
        let sand = scale(SoilProperty::Sand, sand)?;
        let silt = scale(SoilProperty::Silt, silt)?;

        let total = clay + sand + silt;
        if total > 0.0 {
            Ok(Self {
                clay: clay / total * 100.0,
                sand: sand / total * 100.0,
                silt: silt / total * 100.0,
            })
        } else {
            Ok(Self { clay, sand, silt })
        }
    }

    /// Builds a composition from fetched properties, substituting the
    /// reference masses for anything missing.
    pub fn from_properties(properties: &SoilProperties) -> Result<Self, TextureError> {
        Self::from_raw(
            properties
                .get(SoilProperty::Clay)
                .unwrap_or(DEFAULT_RAW_CLAY),
            properties
                .get(SoilProperty::Sand)
                .unwrap_or(DEFAULT_RAW_SAND),
            properties
                .get(SoilProperty::Silt)
                .unwrap_or(DEFAULT_RAW_SILT),
        )
    }

    pub fn total(&self) -> f64 {
        self.clay + self.sand + self.silt
    }

    /// Runs the texture rules over this composition.
    pub fn classify(&self) -> TextureClass {
        classify_composition(self)
    }
}

fn scale(property: SoilProperty, raw: f64) -> Result<f64, TextureError> {
    if !raw.is_finite() {
        return Err(TextureError::NonFinite {
            property,
            value: raw,
        });
    }
    if raw < 0.0 {
        return Err(TextureError::Negative {
            property,
            value: raw,
        });
    }
    Ok(raw / RAW_SCALE)
}

/// Classifies fetched soil properties into a texture class.
///
/// Never fails: malformed input is logged and mapped to
/// [`TextureClass::Loamy`].
pub fn classify(properties: &SoilProperties) -> TextureClass {
    match TextureComposition::from_properties(properties) {
        Ok(composition) => {
            debug!(
                clay = composition.clay,
                sand = composition.sand,
                silt = composition.silt,
                "Soil texture composition"
            );
            composition.classify()
        }
        Err(e) => {
            error!(error = %e, "Error classifying soil type");
            TextureClass::Loamy
        }
    }
}

/// Applies the ordered texture rules. First match wins.
pub fn classify_composition(c: &TextureComposition) -> TextureClass {
    let (clay, sand, silt) = (c.clay, c.sand, c.silt);

    if clay >= 40.0 {
        if sand >= 45.0 {
            TextureClass::SandyClay
        } else if silt >= 40.0 {
            TextureClass::SiltyClay
        } else {
            TextureClass::Clay
        }
    } else if clay >= 27.0 {
        if (20.0..45.0).contains(&sand) {
            TextureClass::ClayLoam
        } else if sand >= 45.0 {
            TextureClass::SandyClayLoam
        } else {
            TextureClass::SiltyClayLoam
        }
    } else if clay >= 20.0 {
        if sand >= 45.0 {
            TextureClass::SandyClayLoam
        } else if silt >= 28.0 {
            TextureClass::SiltyClayLoam
        } else {
            TextureClass::ClayLoam
        }
    } else if sand >= 85.0 {
        TextureClass::Sand
    } else if sand >= 70.0 {
        if clay >= 15.0 {
            TextureClass::SandyClayLoam
        } else {
            TextureClass::LoamySand
        }
    } else if sand >= 43.0 {
        if (7.0..20.0).contains(&clay) {
            TextureClass::SandyLoam
        } else if clay < 7.0 {
            TextureClass::LoamySand
        } else {
            TextureClass::SandyLoam
        }
    } else if silt >= 80.0 {
        TextureClass::Silt
    } else if silt >= 50.0 {
        if (12.0..27.0).contains(&clay) {
            TextureClass::SiltyClayLoam
        } else if clay < 12.0 {
            TextureClass::SiltLoam
        } else {
            TextureClass::SiltyClayLoam
        }
    } else if silt >= 28.0 {
        if (7.0..27.0).contains(&clay) {
            TextureClass::Loam
        } else {
            TextureClass::SiltLoam
        }
    } else {
        TextureClass::Loam
    }
}
