//! Geographic coordinates and search window helpers.
//!
//! Positions are WGS84 degrees in longitude/latitude order. The search
//! window around a reference point uses a flat degrees-per-kilometre
//! approximation, which is adequate at the scale of a single country.

mod types;

pub use types::{BoundingBox, CoordError, Coordinate, KM_PER_DEGREE, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Derives the bounding box that covers `radius_m` metres around `center`.
///
/// One degree of latitude is taken as 111 km and one degree of longitude as
/// 111 km scaled by the cosine of the latitude. The result is clamped to
/// valid longitude/latitude ranges.
pub fn search_bbox(center: &Coordinate, radius_m: f64) -> Result<BoundingBox, CoordError> {
    center.validate()?;
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(CoordError::InvalidRadius(radius_m));
    }

    let radius_km = radius_m / 1000.0;
    let lat_degrees = radius_km / KM_PER_DEGREE;
    let lon_degrees = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

    Ok(BoundingBox {
        min_lon: (center.lon - lon_degrees).max(MIN_LON),
        min_lat: (center.lat - lat_degrees).max(MIN_LAT),
        max_lon: (center.lon + lon_degrees).min(MAX_LON),
        max_lat: (center.lat + lat_degrees).min(MAX_LAT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_around_dresden() {
        let center = Coordinate::new(13.8713, 51.0036);
        let bbox = search_bbox(&center, 1000.0).unwrap();

        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 2.0 / 111.0).abs() < 1e-9);

        // Longitude degrees are wider than latitude degrees at 51°N
        let lon_span = bbox.max_lon - bbox.min_lon;
        assert!(lon_span > lat_span);
        assert!(bbox.contains(&center));
    }

    #[test]
    fn test_bbox_is_clamped() {
        let center = Coordinate::new(179.99, 89.99);
        let bbox = search_bbox(&center, 50_000.0).unwrap();

        assert_eq!(bbox.max_lon, MAX_LON);
        assert_eq!(bbox.max_lat, MAX_LAT);
    }

    #[test]
    fn test_bbox_rejects_bad_radius() {
        let center = Coordinate::new(10.0, 50.0);
        assert!(matches!(
            search_bbox(&center, 0.0),
            Err(CoordError::InvalidRadius(_))
        ));
        assert!(matches!(
            search_bbox(&center, f64::NAN),
            Err(CoordError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_bbox_rejects_bad_center() {
        let center = Coordinate::new(10.0, 95.0);
        assert!(matches!(
            search_bbox(&center, 100.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_wfs_param_format() {
        let bbox = BoundingBox {
            min_lon: 13.5,
            min_lat: 51.0,
            max_lon: 14.0,
            max_lat: 51.5,
        };
        assert_eq!(bbox.to_wfs_param("EPSG:4326"), "13.5,51,14,51.5,EPSG:4326");
    }

    #[test]
    fn test_axis_pair_order() {
        assert_eq!(
            Coordinate::from_axis_pair(1.0, 2.0, false),
            Coordinate::new(1.0, 2.0)
        );
        assert_eq!(
            Coordinate::from_axis_pair(1.0, 2.0, true),
            Coordinate::new(2.0, 1.0)
        );
    }

    #[test]
    fn test_display_picks_hemisphere() {
        assert_eq!(
            Coordinate::new(13.8713, 51.0036).to_string(),
            "51.003600°N, 13.871300°E"
        );
        assert_eq!(
            Coordinate::new(-70.5, -33.0).to_string(),
            "33.000000°S, 70.500000°W"
        );
    }

    #[test]
    fn test_coordinate_serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(13.5, 51.0)).unwrap();
        assert_eq!(json, "[13.5,51.0]");
    }
}
