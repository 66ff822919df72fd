//! Server dialects.
//!
//! Every supported WFS server family differs in payload format, axis order,
//! property nesting and whether it honours a bbox filter. Those quirks are
//! captured once in a [`DialectProfile`] and threaded through the decoder
//! and the request builder instead of being re-detected per call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format requested from GML servers when none is configured.
pub const DEFAULT_GML_OUTPUT_FORMAT: &str = "application/gml+xml; version=3.2";

/// Output format requested from GeoJSON servers.
pub const JSON_OUTPUT_FORMAT: &str = "application/json";

/// The closed set of server families the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerDialect {
    /// GeoJSON FeatureCollections (e.g. BKG administrative areas)
    GeoJson,
    /// Latitude-first GML with flat properties (e.g. BfN protected areas)
    LatLonGml,
    /// INSPIRE GML with nested properties and geometry containers
    InspireGml,
}

/// Payload encoding returned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Gml,
}

/// Order of the two numbers in each coordinate tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    LonLat,
    LatLon,
}

/// How GML member properties are flattened into a property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyMode {
    /// Direct children only, text content as value
    Flat,
    /// Recursive walk with `parent_child` compound keys
    Recursive,
}

/// Where geometry elements may live inside a GML member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryNesting {
    /// Anywhere in the member, searched once
    Direct,
    /// Outside geometry wrapper elements first, inside them as a fallback
    Containers,
}

/// Decoding and request conventions of one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    pub payload: PayloadFormat,
    pub axis_order: AxisOrder,
    pub property_mode: PropertyMode,
    pub geometry_nesting: GeometryNesting,
    /// Whether a bbox filter is sent with GetFeature requests
    pub bbox_filter: bool,
}

impl ServerDialect {
    pub const ALL: [ServerDialect; 3] = [
        ServerDialect::GeoJson,
        ServerDialect::LatLonGml,
        ServerDialect::InspireGml,
    ];

    pub fn profile(&self) -> DialectProfile {
        match self {
            ServerDialect::GeoJson => DialectProfile {
                payload: PayloadFormat::Json,
                axis_order: AxisOrder::LonLat,
                property_mode: PropertyMode::Flat,
                geometry_nesting: GeometryNesting::Direct,
                bbox_filter: true,
            },
            // The BfN server returns nothing for bbox-filtered requests
            ServerDialect::LatLonGml => DialectProfile {
                payload: PayloadFormat::Gml,
                axis_order: AxisOrder::LatLon,
                property_mode: PropertyMode::Flat,
                geometry_nesting: GeometryNesting::Direct,
                bbox_filter: false,
            },
            ServerDialect::InspireGml => DialectProfile {
                payload: PayloadFormat::Gml,
                axis_order: AxisOrder::LonLat,
                property_mode: PropertyMode::Recursive,
                geometry_nesting: GeometryNesting::Containers,
                bbox_filter: true,
            },
        }
    }

    /// Identifier used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerDialect::GeoJson => "json",
            ServerDialect::LatLonGml => "latlon-gml",
            ServerDialect::InspireGml => "inspire-gml",
        }
    }

    /// Picks the `outputFormat` parameter, honouring a configured override
    /// for GML servers.
    pub fn output_format<'a>(&self, configured: Option<&'a str>) -> &'a str {
        match self.profile().payload {
            PayloadFormat::Json => JSON_OUTPUT_FORMAT,
            PayloadFormat::Gml => configured
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(DEFAULT_GML_OUTPUT_FORMAT),
        }
    }

    /// Human readable name of the content type the decoder expects.
    pub fn expected_content(&self) -> &'static str {
        match self.profile().payload {
            PayloadFormat::Json => "JSON",
            PayloadFormat::Gml => "XML/GML",
        }
    }

    /// Checks a response `Content-Type` header against the payload format.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let ct = content_type.to_ascii_lowercase();
        match self.profile().payload {
            PayloadFormat::Json => ct.contains("application/json"),
            PayloadFormat::Gml => {
                ct.contains("text/xml")
                    || ct.contains("application/xml")
                    || ct.contains("application/gml+xml")
            }
        }
    }
}

impl fmt::Display for ServerDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "geojson" => Ok(ServerDialect::GeoJson),
            "latlon-gml" | "bfn" => Ok(ServerDialect::LatLonGml),
            "inspire-gml" | "inspire" => Ok(ServerDialect::InspireGml),
            other => Err(format!(
                "unknown dialect '{}' (expected json, latlon-gml or inspire-gml)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latlon_dialect_swaps_axes() {
        for dialect in ServerDialect::ALL {
            let swapped = dialect.profile().axis_order == AxisOrder::LatLon;
            assert_eq!(swapped, dialect == ServerDialect::LatLonGml);
        }
    }

    #[test]
    fn test_output_format_selection() {
        assert_eq!(
            ServerDialect::GeoJson.output_format(Some("GML32")),
            JSON_OUTPUT_FORMAT
        );
        assert_eq!(
            ServerDialect::InspireGml.output_format(None),
            DEFAULT_GML_OUTPUT_FORMAT
        );
        assert_eq!(
            ServerDialect::LatLonGml.output_format(Some("text/xml; subtype=gml/3.2.1")),
            "text/xml; subtype=gml/3.2.1"
        );
        assert_eq!(
            ServerDialect::LatLonGml.output_format(Some("  ")),
            DEFAULT_GML_OUTPUT_FORMAT
        );
    }

    #[test]
    fn test_content_type_acceptance() {
        assert!(ServerDialect::GeoJson.accepts_content_type("application/json;charset=UTF-8"));
        assert!(!ServerDialect::GeoJson.accepts_content_type("text/xml"));
        assert!(ServerDialect::InspireGml
            .accepts_content_type("application/gml+xml; version=3.2"));
        assert!(ServerDialect::LatLonGml.accepts_content_type("Text/XML"));
        assert!(!ServerDialect::LatLonGml.accepts_content_type("text/html"));
    }

    #[test]
    fn test_parse_roundtrips_identifier() {
        for dialect in ServerDialect::ALL {
            assert_eq!(dialect.as_str().parse::<ServerDialect>(), Ok(dialect));
        }
        assert!("wkt".parse::<ServerDialect>().is_err());
    }
}
