//! Feature and property bag

use super::types::{Geometry, GeometryKind};
use crate::dialect::ServerDialect;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One feature as delivered by a WFS page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Decoded geometry; `None` when the server sent none or it was unusable
    pub geometry: Option<Geometry>,
    /// Raw server-specific properties with namespace prefixes stripped
    pub properties: Properties,
    /// Dialect the feature was decoded with
    pub dialect: ServerDialect,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties, dialect: ServerDialect) -> Self {
        Self {
            geometry,
            properties,
            dialect,
        }
    }

    /// Type label of the geometry, [`GeometryKind::Unknown`] when absent.
    pub fn geometry_kind(&self) -> GeometryKind {
        self.geometry
            .as_ref()
            .map(Geometry::kind)
            .unwrap_or(GeometryKind::Unknown)
    }
}

/// String property bag that remembers insertion order.
///
/// Re-inserting an existing key replaces the value in place, so the key
/// keeps its first position. Name fallbacks scan properties in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (k, v) in iter {
            properties.insert(k, v);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut props = Properties::new();
        props.insert("a", "1");
        props.insert("b", "2");
        props.insert("a", "3");

        let keys: Vec<_> = props.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some("3"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_serializes_as_object_in_order() {
        let props: Properties = [("z", "last"), ("a", "first")].into_iter().collect();
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"z":"last","a":"first"}"#);
    }

    #[test]
    fn test_feature_without_geometry_is_unknown_kind() {
        let feature = Feature::new(None, Properties::new(), ServerDialect::GeoJson);
        assert_eq!(feature.geometry_kind(), GeometryKind::Unknown);
    }
}
