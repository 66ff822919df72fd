//! Geometry types

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature geometry in longitude/latitude degrees.
///
/// Rings and lines are plain coordinate sequences. The first ring of a
/// polygon is its exterior; any further rings are holes. Ring closure is not
/// enforced, the coordinates are kept as the server sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    Polygon(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
}

impl Geometry {
    /// Returns the type tag of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Total number of coordinate pairs.
    pub fn coordinate_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(points) | Geometry::LineString(points) => points.len(),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Vec::len)
                .sum(),
        }
    }

    /// True when the geometry holds no coordinate pairs at all.
    pub fn is_empty(&self) -> bool {
        self.coordinate_count() == 0
    }

    /// True for area geometries, the only ones that can contain a point.
    pub fn is_areal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }
}

/// Geometry type label reported alongside scored features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    /// Feature arrived without a usable geometry
    Unknown,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat)
    }

    #[test]
    fn test_polygon_serializes_as_geojson() {
        let polygon = Geometry::Polygon(vec![vec![
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(1.0, 1.0),
            c(0.0, 0.0),
        ]]);
        let json = serde_json::to_value(&polygon).unwrap();

        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0][1][0], 1.0);
    }

    #[test]
    fn test_point_deserializes_with_elevation() {
        let json = r#"{"type":"Point","coordinates":[13.7,51.05,112.0]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();

        assert_eq!(geometry, Geometry::Point(c(13.7, 51.05)));
    }

    #[test]
    fn test_short_position_is_rejected() {
        let json = r#"{"type":"Point","coordinates":[13.7]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"type":"GeometryCollection","geometries":[]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }

    #[test]
    fn test_coordinate_count_and_emptiness() {
        let multi = Geometry::MultiPolygon(vec![
            vec![vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)]],
            vec![],
        ]);
        assert_eq!(multi.coordinate_count(), 3);
        assert!(!multi.is_empty());
        assert!(Geometry::LineString(vec![]).is_empty());
        assert!(multi.is_areal());
        assert_eq!(multi.kind(), GeometryKind::MultiPolygon);
    }
}
