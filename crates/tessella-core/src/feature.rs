//! Decoded vector-tile feature data.
//!
//! A [`Feature`] is immutable input to the tessellation and paint-binding
//! pipeline: the core only ever reads it.

use ahash::HashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Geometric type of a tile feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Line,
    Polygon,
}

/// A feature property value as decoded from the tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// One decoded vector-tile feature.
///
/// Geometry is a sequence of rings (or lines), each an ordered sequence of
/// tile-local 2D points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Vec<Vec<Vec2>>,
    pub properties: HashMap<String, PropertyValue>,
    pub geometry_type: GeometryType,
    pub id: Option<u64>,
}

impl Feature {
    /// Create a feature with the given type and geometry and no properties.
    pub fn new(geometry_type: GeometryType, geometry: Vec<Vec<Vec2>>) -> Self {
        Self {
            geometry,
            properties: HashMap::default(),
            geometry_type,
            id: None,
        }
    }

    /// A feature with no geometry and no properties, used when evaluating
    /// expressions that do not depend on feature data.
    pub fn empty() -> Self {
        Self::new(GeometryType::Point, Vec::new())
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Look up a property value by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Numeric property lookup, `None` for missing or non-numeric values.
    pub fn number_property(&self, name: &str) -> Option<f64> {
        match self.properties.get(name) {
            Some(PropertyValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lookup() {
        let feature = Feature::new(GeometryType::Polygon, Vec::new())
            .with_property("height", PropertyValue::Number(12.5))
            .with_property("name", PropertyValue::String("plaza".into()));

        assert_eq!(feature.number_property("height"), Some(12.5));
        assert_eq!(feature.number_property("name"), None);
        assert_eq!(feature.number_property("missing"), None);
    }

    #[test]
    fn test_empty_feature() {
        let feature = Feature::empty();
        assert!(feature.geometry.is_empty());
        assert!(feature.id.is_none());
    }
}
