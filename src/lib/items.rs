use super::geo::{Bounds, Containment, Geometry, Location, OuterBounds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Placeholder rendered for metadata a feature does not carry.
pub const NOT_AVAILABLE: &str = "N/D";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Null,
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => write!(f, "{}", text),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Null => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.into())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue::Text(text)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// Stringly lookup into a property bag. Numbers are rendered, nulls and
/// missing keys are `None`.
pub trait PropertyLookup {
    fn text(&self, key: &str) -> Option<String>;
    fn value(&self, key: &str) -> PropertyValue;
}

impl PropertyLookup for Properties {
    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            PropertyValue::Null => None,
            value => Some(value.to_string()),
        }
    }

    fn value(&self, key: &str) -> PropertyValue {
        self.get(key).cloned().unwrap_or(PropertyValue::Null)
    }
}

#[derive(Debug, Clone)]
pub struct Feature {
    geometry: Geometry,
    pub properties: Properties,
    bounds: OnceLock<Option<Bounds>>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry>, properties: Properties) -> Self {
        Feature {
            geometry: geometry.into(),
            properties,
            bounds: OnceLock::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Computed on first access. Concurrent first accesses compute the same
    /// value and only one of them is stored.
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| self.geometry.outer_bounds())
    }

    pub fn replace_geometry(&mut self, geometry: impl Into<Geometry>) {
        self.geometry = geometry.into();
        self.bounds = OnceLock::new();
    }

    /// Bounding box rejection followed by the exact ring test.
    pub fn contains(&self, loc: &Location) -> bool {
        match self.bounds() {
            Some(bounds) if bounds.contains(loc) => self.geometry.contains_location(loc),
            _ => false,
        }
    }
}
