//! Distance and containment scoring.
//!
//! A feature is scored against the reference point once: areal geometries
//! are tested for containment first (boundary counts as inside, holes do
//! not), everything else gets the minimum great-circle distance to its
//! vertices or segments.

mod haversine;

pub use haversine::{haversine_distance, path_distance, point_segment_distance, EARTH_RADIUS_M};

use crate::coord::Coordinate;
use crate::geometry::{Feature, Geometry};
use geo::Intersects;
use serde::Serialize;

/// Distance score of one feature relative to the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// Metres to the nearest part of the geometry, 0 when containing
    pub distance_m: f64,
    /// The geometry is areal and encloses the reference point
    pub is_containing: bool,
}

impl Score {
    pub fn containing() -> Self {
        Self {
            distance_m: 0.0,
            is_containing: true,
        }
    }

    pub fn at(distance_m: f64) -> Self {
        Self {
            distance_m,
            is_containing: false,
        }
    }
}

/// Scores a feature, `None` when it has no usable geometry.
pub fn score(reference: &Coordinate, feature: &Feature) -> Option<Score> {
    feature
        .geometry
        .as_ref()
        .and_then(|geometry| score_geometry(reference, geometry))
}

/// Scores a bare geometry.
pub fn score_geometry(reference: &Coordinate, geometry: &Geometry) -> Option<Score> {
    match geometry {
        Geometry::Point(point) => Some(Score::at(haversine_distance(reference, point))),
        Geometry::MultiPoint(points) => points
            .iter()
            .map(|p| haversine_distance(reference, p))
            .reduce(f64::min)
            .map(Score::at),
        Geometry::LineString(line) => path_distance(reference, line).map(Score::at),
        Geometry::MultiLineString(lines) => min_over(reference, lines.iter()).map(Score::at),
        Geometry::Polygon(rings) => {
            if polygon_contains(reference, rings) {
                Some(Score::containing())
            } else {
                min_over(reference, rings.iter()).map(Score::at)
            }
        }
        Geometry::MultiPolygon(polygons) => {
            if polygons.iter().any(|rings| polygon_contains(reference, rings)) {
                Some(Score::containing())
            } else {
                min_over(reference, polygons.iter().flatten()).map(Score::at)
            }
        }
    }
}

fn min_over<'a>(
    reference: &Coordinate,
    paths: impl Iterator<Item = &'a Vec<Coordinate>>,
) -> Option<f64> {
    paths
        .filter_map(|path| path_distance(reference, path))
        .reduce(f64::min)
}

/// Point-in-polygon with the first ring as exterior and the rest as holes.
fn polygon_contains(reference: &Coordinate, rings: &[Vec<Coordinate>]) -> bool {
    let Some((exterior, holes)) = rings.split_first() else {
        return false;
    };
    if exterior.len() < 3 {
        return false;
    }

    let polygon = geo::Polygon::new(
        to_line_string(exterior),
        holes.iter().map(|ring| to_line_string(ring)).collect(),
    );
    geo::Point::new(reference.lon, reference.lat).intersects(&polygon)
}

fn to_line_string(ring: &[Coordinate]) -> geo::LineString<f64> {
    ring.iter()
        .map(|c| geo::Coord { x: c.lon, y: c.lat })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ServerDialect;
    use crate::geometry::Properties;

    fn square(min: f64, max: f64) -> Vec<Coordinate> {
        vec![
            Coordinate::new(min, min),
            Coordinate::new(max, min),
            Coordinate::new(max, max),
            Coordinate::new(min, max),
            Coordinate::new(min, min),
        ]
    }

    fn feature(geometry: Option<Geometry>) -> Feature {
        Feature::new(geometry, Properties::new(), ServerDialect::GeoJson)
    }

    #[test]
    fn test_inside_polygon_is_containing() {
        let polygon = Geometry::Polygon(vec![square(0.0, 1.0)]);
        let score = score_geometry(&Coordinate::new(0.5, 0.5), &polygon).unwrap();
        assert_eq!(score, Score::containing());
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let polygon = Geometry::Polygon(vec![square(0.0, 1.0)]);
        let score = score_geometry(&Coordinate::new(1.0, 0.5), &polygon).unwrap();
        assert!(score.is_containing);
    }

    #[test]
    fn test_hole_is_outside() {
        let polygon = Geometry::Polygon(vec![square(0.0, 1.0), square(0.4, 0.6)]);
        let score = score_geometry(&Coordinate::new(0.5, 0.5), &polygon).unwrap();
        assert!(!score.is_containing);
        let expected = haversine_distance(&Coordinate::new(0.5, 0.5), &Coordinate::new(0.5, 0.4));
        assert!((score.distance_m - expected).abs() < 1.0);
    }

    #[test]
    fn test_outside_polygon_distance_to_edge() {
        let polygon = Geometry::Polygon(vec![square(13.0, 13.01)]);
        let reference = Coordinate::new(13.005, 12.99);
        let score = score_geometry(&reference, &polygon).unwrap();
        assert!(!score.is_containing);
        let expected = haversine_distance(&reference, &Coordinate::new(13.005, 13.0));
        assert!((score.distance_m - expected).abs() < 1.0);
    }

    #[test]
    fn test_multipolygon_any_part_contains() {
        let geometry = Geometry::MultiPolygon(vec![vec![square(0.0, 1.0)], vec![square(5.0, 6.0)]]);
        let score = score_geometry(&Coordinate::new(5.5, 5.5), &geometry).unwrap();
        assert!(score.is_containing);
    }

    #[test]
    fn test_lines_never_contain() {
        let line = Geometry::LineString(square(0.0, 1.0));
        let score = score_geometry(&Coordinate::new(0.5, 0.5), &line).unwrap();
        assert!(!score.is_containing);
        assert!(score.distance_m > 50_000.0);
    }

    #[test]
    fn test_point_distance() {
        let point = Geometry::Point(Coordinate::new(13.0, 51.001));
        let score = score_geometry(&Coordinate::new(13.0, 51.0), &point).unwrap();
        assert!((score.distance_m - 111.2).abs() < 0.5);
    }

    #[test]
    fn test_feature_without_geometry() {
        assert_eq!(score(&Coordinate::new(0.0, 0.0), &feature(None)), None);
    }
}
