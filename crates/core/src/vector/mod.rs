//! Vector data structures: features, feature collections and clip boundaries
//!
//! Every container carries the CRS of its coordinates; nothing here relies on
//! an ambient projection.

mod boundary;

pub use boundary::{repair_polygon, union_polygons, Boundary};

use crate::crs::{reproject, CRS};
use crate::error::Result;
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry; `None` is a null geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// True when attribute `key` renders as `value` (`"AL"`, `"42"`, ...).
    pub fn property_matches(&self, key: &str, value: &str) -> bool {
        self.get_property(key)
            .map(|v| v.to_string() == value)
            .unwrap_or(false)
    }
}

/// Collection of features sharing one CRS
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    crs: CRS,
}

impl FeatureCollection {
    pub fn new(crs: CRS) -> Self {
        Self {
            features: Vec::new(),
            crs,
        }
    }

    pub fn with_features(features: Vec<Feature>, crs: CRS) -> Self {
        Self { features, crs }
    }

    /// Build a collection from bare geometries.
    pub fn from_geometries(geometries: impl IntoIterator<Item = Geometry<f64>>, crs: CRS) -> Self {
        Self {
            features: geometries.into_iter().map(Feature::new).collect(),
            crs,
        }
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Keep only the features whose attribute `key` equals `value`.
    pub fn filter_by_property(&self, key: &str, value: &str) -> Self {
        Self {
            features: self
                .features
                .iter()
                .filter(|f| f.property_matches(key, value))
                .cloned()
                .collect(),
            crs: self.crs.clone(),
        }
    }

    /// Reproject every geometry into `target`. Null geometries stay null.
    pub fn reproject(&self, target: &CRS) -> Result<Self> {
        let features = self
            .features
            .iter()
            .map(|f| {
                let geometry = match &f.geometry {
                    Some(g) => Some(reproject(g, &self.crs, target)?),
                    None => None,
                };
                Ok(Feature {
                    geometry,
                    properties: f.properties.clone(),
                    id: f.id.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            features,
            crs: target.clone(),
        })
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
