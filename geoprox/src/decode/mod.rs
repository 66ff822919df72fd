//! Feature collection decoding.
//!
//! Turns one page of raw server output into normalized [`Feature`]s. GeoJSON
//! pages pass through almost unchanged; GML pages are walked as a DOM and
//! matched by local element name, so namespace prefixes never matter.
//!
//! # Example
//!
//! ```
//! use geoprox::decode::decode;
//! use geoprox::dialect::ServerDialect;
//!
//! let page = r#"{"type":"FeatureCollection","features":[
//!     {"type":"Feature","geometry":{"type":"Point","coordinates":[13.7,51.05]},
//!      "properties":{"name":"Dresden Hbf"}}]}"#;
//! let features = decode(page, ServerDialect::GeoJson).unwrap();
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].properties.get("name"), Some("Dresden Hbf"));
//! ```

mod coords;
mod gml;
mod json;
mod properties;

use crate::dialect::{PayloadFormat, ServerDialect};
use crate::geometry::Feature;
use thiserror::Error;

pub use gml::decode_gml;
pub use json::decode_json;

/// Errors raised while decoding a page payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The payload is not well-formed XML
    #[error("Failed to parse XML response: {0}")]
    Xml(String),

    /// The payload is not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Json(String),

    /// Valid JSON that is not shaped like a feature collection
    #[error("Unexpected JSON structure: {0}")]
    Shape(String),

    /// The server answered with an OGC exception report
    #[error("Server reported an exception: {0}")]
    ServerException(String),
}

/// Decodes a page payload using the format of the given dialect.
///
/// A payload without any usable geometry decodes to an empty list rather
/// than an error.
pub fn decode(payload: &str, dialect: ServerDialect) -> Result<Vec<Feature>, DecodeError> {
    match dialect.profile().payload {
        PayloadFormat::Json => decode_json(payload, dialect),
        PayloadFormat::Gml => decode_gml(payload, dialect),
    }
}

/// Extracts the OGC `ExceptionText` of an XML payload, if it is one.
pub fn exception_text(payload: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(payload).ok()?;
    gml::exception_text(&doc).filter(|text| !text.is_empty())
}
