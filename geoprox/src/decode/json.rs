//! GeoJSON feature collection decoding.

use super::DecodeError;
use crate::dialect::ServerDialect;
use crate::geometry::{Feature, Geometry, Properties};
use serde_json::Value;
use tracing::debug;

/// Decodes a GeoJSON FeatureCollection page.
///
/// Features are kept even when their geometry is missing or unusable so
/// they still count toward the total; the geometry is then `None`.
pub fn decode_json(payload: &str, dialect: ServerDialect) -> Result<Vec<Feature>, DecodeError> {
    let document: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::Json(e.to_string()))?;

    let Value::Object(root) = document else {
        return Err(DecodeError::Shape(
            "expected a FeatureCollection object".to_string(),
        ));
    };

    let features = match root.get("features") {
        Some(Value::Array(features)) => features,
        Some(_) => {
            return Err(DecodeError::Shape(
                "\"features\" is not an array".to_string(),
            ))
        }
        None => {
            debug!("JSON page without a features array, treating as empty");
            return Ok(Vec::new());
        }
    };

    Ok(features
        .iter()
        .map(|feature| {
            Feature::new(
                decode_geometry(feature.get("geometry")),
                decode_properties(feature.get("properties")),
                dialect,
            )
        })
        .collect())
}

fn decode_geometry(value: Option<&Value>) -> Option<Geometry> {
    let value = value.filter(|v| !v.is_null())?;
    match serde_json::from_value::<Geometry>(value.clone()) {
        Ok(geometry) if !geometry.is_empty() => Some(geometry),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Skipping unsupported GeoJSON geometry");
            None
        }
    }
}

/// Scalars become their string form; nested values are kept as compact JSON.
fn decode_properties(value: Option<&Value>) -> Properties {
    let Some(Value::Object(map)) = value else {
        return Properties::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => value.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
