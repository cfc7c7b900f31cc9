//! Raw soil properties as reported by a soil data source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Properties requested from soil data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilProperty {
    /// Clay content, g/kg.
    Clay,
    /// Sand content, g/kg.
    Sand,
    /// Silt content, g/kg.
    Silt,
    /// pH in water, pH×10.
    PhWater,
    /// Cation exchange capacity, mmol(c)/kg.
    Cec,
    /// Total nitrogen, cg/kg.
    Nitrogen,
    /// Soil organic carbon, dg/kg.
    OrganicCarbon,
}

impl SoilProperty {
    /// Every property, in request order.
    pub const ALL: [SoilProperty; 7] = [
        SoilProperty::Clay,
        SoilProperty::Sand,
        SoilProperty::Silt,
        SoilProperty::PhWater,
        SoilProperty::Cec,
        SoilProperty::Nitrogen,
        SoilProperty::OrganicCarbon,
    ];

    /// Wire name used by SoilGrids.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilProperty::Clay => "clay",
            SoilProperty::Sand => "sand",
            SoilProperty::Silt => "silt",
            SoilProperty::PhWater => "phh2o",
            SoilProperty::Cec => "cec",
            SoilProperty::Nitrogen => "nitrogen",
            SoilProperty::OrganicCarbon => "soc",
        }
    }
}

impl fmt::Display for SoilProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean property values at the shallowest depth band.
///
/// May be partial or empty. A missing property means "not reported",
/// which is different from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilProperties(BTreeMap<String, f64>);

impl SoilProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a known property.
    pub fn get(&self, property: SoilProperty) -> Option<f64> {
        self.0.get(property.as_str()).copied()
    }

    /// Looks up a property by wire name.
    pub fn get_named(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Sets a known property, replacing any previous value.
    pub fn set(&mut self, property: SoilProperty, value: f64) {
        self.0.insert(property.as_str().to_string(), value);
    }

    /// Sets a property by wire name. Unknown names are kept as-is.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Merges `other` into `self`; values from `other` win.
    pub fn merge(&mut self, other: SoilProperties) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(SoilProperty, f64)> for SoilProperties {
    fn from_iter<I: IntoIterator<Item = (SoilProperty, f64)>>(iter: I) -> Self {
        let mut props = SoilProperties::new();
        for (property, value) in iter {
            props.set(property, value);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let names: Vec<&str> = SoilProperty::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            names,
            vec!["clay", "sand", "silt", "phh2o", "cec", "nitrogen", "soc"]
        );
    }

    #[test]
    fn test_missing_is_not_zero() {
        let mut props = SoilProperties::new();
        props.set(SoilProperty::Clay, 0.0);
        assert_eq!(props.get(SoilProperty::Clay), Some(0.0));
        assert_eq!(props.get(SoilProperty::Sand), None);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut a: SoilProperties = [(SoilProperty::Clay, 100.0), (SoilProperty::Sand, 200.0)]
            .into_iter()
            .collect();
        let b: SoilProperties = [(SoilProperty::Clay, 150.0)].into_iter().collect();
        a.merge(b);
        assert_eq!(a.get(SoilProperty::Clay), Some(150.0));
        assert_eq!(a.get(SoilProperty::Sand), Some(200.0));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_unknown_names_are_kept() {
        let mut props = SoilProperties::new();
        props.insert("bdod", 130.0);
        assert_eq!(props.get_named("bdod"), Some(130.0));
        assert!(!props.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let props: SoilProperties = [(SoilProperty::PhWater, 65.0)].into_iter().collect();
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"phh2o":65.0}"#);
    }
}
